use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use listing_maint::{
    Category, CleanupReport, CollectionCensus, JsonFileStore, Maintainer, MaintenanceConfig,
    RunResult, SeedReport, Verification,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "listing-maint")]
#[command(about = "Batched cleanup and reseeding for a listings collection")]
struct Cli {
    /// JSON file holding the collection
    #[arg(long)]
    store: PathBuf,

    /// JSON file with maintenance settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Delete every listing not on the keep-list
    Cleanup {
        #[arg(long = "keep")]
        keep: Vec<String>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Replace the collection with generated listings
    Seed {
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Report per-category counts and which kept listings are present
    Census {
        #[arg(long = "keep")]
        keep: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(cli.store, config, cli.command))
}

fn load_config(path: Option<&Path>) -> Result<MaintenanceConfig> {
    match path {
        Some(path) => MaintenanceConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None => Ok(MaintenanceConfig::default()),
    }
}

async fn run(store_path: PathBuf, mut config: MaintenanceConfig, command: Command) -> Result<()> {
    let store = JsonFileStore::open(&store_path, &config.collection)
        .await
        .with_context(|| format!("Failed to open store '{}'", store_path.display()))?;

    match command {
        Command::Cleanup {
            keep,
            batch_size,
            dry_run,
        } => {
            if !keep.is_empty() {
                config.keep_list = keep;
            }
            if let Some(size) = batch_size {
                config.max_batch_size = size;
            }
            config.dry_run |= dry_run;
            let max_batch_size = config.max_batch_size;

            let report = maintainer(store, config)?.cleanup().await?;
            print_cleanup(&report);
            check_run(report.run.as_ref(), max_batch_size)
        }
        Command::Seed {
            categories,
            count,
            seed,
            batch_size,
            dry_run,
        } => {
            if !categories.is_empty() {
                config.categories = categories
                    .iter()
                    .map(|tag| tag.parse::<Category>())
                    .collect::<listing_maint::Result<Vec<Category>>>()?;
            }
            if let Some(count) = count {
                config.count_per_category = count;
            }
            if seed.is_some() {
                config.rng_seed = seed;
            }
            if let Some(size) = batch_size {
                config.max_batch_size = size;
            }
            config.dry_run |= dry_run;
            let max_batch_size = config.max_batch_size;

            let report = maintainer(store, config)?.seed().await?;
            print_seed(&report);
            check_run(report.run.as_ref(), max_batch_size)
        }
        Command::Census { keep } => {
            if !keep.is_empty() {
                config.keep_list = keep;
            }

            let census = maintainer(store, config)?.census().await?;
            print_census(&census);
            Ok(())
        }
    }
}

fn maintainer(store: JsonFileStore, config: MaintenanceConfig) -> Result<Maintainer<JsonFileStore>> {
    let progress = listing_maint::TracingProgress::new(config.collection.clone());
    Ok(Maintainer::new(store, config)?.with_progress(Arc::new(progress)))
}

/// A halted or aborted run exits non-zero with the resume point.
fn check_run(run: Option<&RunResult>, max_batch_size: usize) -> Result<()> {
    match run.and_then(|run| stopped_run_message(run, max_batch_size)) {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

fn stopped_run_message(run: &RunResult, max_batch_size: usize) -> Option<String> {
    let offset = run.resume_offset(max_batch_size)?;
    let failure = run
        .failure
        .as_ref()
        .map(|err| err.to_string())
        .unwrap_or_else(|| "aborted".to_string());
    Some(format!(
        "Run stopped after {}/{} chunks ({}); {} intents applied, resume from intent {}",
        run.committed_chunks, run.total_chunks, failure, run.mutated_count, offset
    ))
}

fn print_cleanup(report: &CleanupReport) {
    let plan = &report.plan;
    println!("Total listings: {}", plan.total);
    println!("Keeping: {}", plan.reconciliation.keep_ids.len());
    println!("Deleting: {}", plan.reconciliation.delete_ids.len());
    for id in &plan.absent_keep_ids {
        println!("  keep-list id not found: {}", id);
    }
    match &report.run {
        Some(run) => print_run(run),
        None => println!("No deletions submitted"),
    }
    print_verification(report.verification.as_ref());
}

fn print_seed(report: &SeedReport) {
    println!("Cleared: {}", report.cleared);
    for (category, count) in &report.generated {
        println!("Generated {}: {}", category, count);
    }
    println!("Generated total: {}", report.generated_total());
    match &report.run {
        Some(run) => print_run(run),
        None => println!("No mutations submitted"),
    }
    print_verification(report.verification.as_ref());
}

fn print_run(run: &RunResult) {
    println!(
        "Committed {}/{} chunks, {} intents applied",
        run.committed_chunks, run.total_chunks, run.mutated_count
    );
    if let Some(chunk) = run.failed_chunk {
        println!("Failed at chunk {}", chunk);
    }
}

fn print_verification(verification: Option<&Verification>) {
    if let Some(v) = verification {
        println!(
            "Final count: {} (expected {}, {})",
            v.observed, v.expected, v.outcome
        );
    }
}

fn print_census(census: &CollectionCensus) {
    println!("Total listings: {}", census.total);
    for (category, count) in &census.per_category {
        println!("  {}: {}", category, count);
    }
    if !census.preserved.is_empty() {
        println!("Preserved listings:");
        for listing in &census.preserved {
            println!("  {} [{}] {}", listing.id, listing.category, listing.title);
        }
    }
}
