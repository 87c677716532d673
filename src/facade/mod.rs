pub mod maintainer;

pub use maintainer::{CleanupPlan, CleanupReport, Maintainer, SeedReport, Verification};
