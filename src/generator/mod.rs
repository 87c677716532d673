//! Synthetic listing generator
//!
//! Produces category-specific listing records from fixed schema tables.
//! A seeded generator yields the same listings for the same seed and anchor
//! time, which keeps seeding runs reproducible.

mod tables;

use crate::core::{Document, MaintError, Result};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use tables::*;
use uuid::Uuid;

/// Listing category, identified on the wire by its kebab-case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Vehicles,
    PropertyRentals,
    Electronics,
    Apparel,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Vehicles,
        Category::PropertyRentals,
        Category::Electronics,
        Category::Apparel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vehicles => "vehicles",
            Category::PropertyRentals => "property-rentals",
            Category::Electronics => "electronics",
            Category::Apparel => "apparel",
        }
    }

    fn image_folder(&self) -> &'static str {
        match self {
            Category::Vehicles => "vehicles",
            Category::PropertyRentals => "property",
            Category::Electronics => "electronics",
            Category::Apparel => "apparel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MaintError;

    fn from_str(tag: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| MaintError::config(format!("unknown category '{}'", tag)))
    }
}

/// Category-specific part of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedListing {
    pub title: String,
    pub description: String,
    pub price: u32,
    pub category_fields: Document,
    pub images: Vec<String>,
}

pub struct ListingGenerator {
    rng: StdRng,
    anchor: DateTime<Utc>,
}

impl ListingGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            anchor: Utc::now(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            anchor: Utc::now(),
        }
    }

    /// Fix the "now" that generated dates are relative to.
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn generate(&mut self, category: Category) -> GeneratedListing {
        let mut listing = match category {
            Category::Vehicles => self.vehicle(),
            Category::PropertyRentals => self.property_rental(),
            Category::Electronics => self.electronics(),
            Category::Apparel => self.apparel(),
        };
        listing.images = (0..IMAGES_PER_LISTING)
            .map(|_| self.image_url(category))
            .collect();
        listing
    }

    pub fn generate_by_tag(&mut self, tag: &str) -> Result<GeneratedListing> {
        let category = tag.parse::<Category>()?;
        Ok(self.generate(category))
    }

    /// A complete listing document keyed by a fresh id.
    pub fn listing_document(&mut self, category: Category) -> (String, Document) {
        let listing = self.generate(category);
        let id = self.uuid().to_string();
        let user_id = self.uuid().to_string();
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let (city, state) = CITIES[self.rng.gen_range(0..CITIES.len())];
        let domain = self.pick(EMAIL_DOMAINS);
        let phone = format!(
            "({}) 555-{:04}",
            self.rng.gen_range(200..=989),
            self.rng.gen_range(0..10_000)
        );
        let date_posted = self.recent(30);
        let created_at = self.recent(30);

        let document = object(json!({
            "id": id,
            "title": listing.title,
            "description": listing.description,
            "price": listing.price,
            "category": category.as_str(),
            "userId": user_id,
            "sellerName": format!("{} {}", first, last),
            "datePosted": date_posted.to_rfc3339(),
            "createdAt": created_at.to_rfc3339(),
            "images": listing.images,
            "location": format!("{}, {}", city, state),
            "isActive": true,
            "contactEmail": format!("{}.{}@{}", first.to_lowercase(), last.to_lowercase(), domain),
            "contactPhone": phone,
            "categoryFields": listing.category_fields,
        }));

        (id, document)
    }

    // ==================== Category Generators ====================

    fn vehicle(&mut self) -> GeneratedListing {
        let make = &VEHICLE_MAKES[self.rng.gen_range(0..VEHICLE_MAKES.len())];
        let model = self.pick(make.models);
        let year: u32 = self.rng.gen_range(2000..=2024);
        let mileage: u32 = self.rng.gen_range(0..=200_000);
        let condition = self.pick(VEHICLE_CONDITIONS);
        let price = self.rng.gen_range(3_000..=65_000);

        let title = format!("{} {} {}", year, make.name, model);
        let description = format!(
            "{} {} {} in {} condition. This reliable vehicle has {} miles and has been \
             well-maintained. Great for daily commuting or family trips. Clean title, no \
             accidents reported. Contact for more details or to schedule a test drive.",
            year,
            make.name,
            model,
            condition,
            group_thousands(mileage)
        );

        let category_fields = object(json!({
            "make": make.name,
            "model": model,
            "year": year.to_string(),
            "mileage": mileage.to_string(),
            "condition": condition,
            "transmission": self.pick(TRANSMISSIONS),
            "engine_size": self.pick(ENGINE_SIZES),
            "fuel_type": self.pick(FUEL_TYPES),
            "exterior_color": self.pick(VEHICLE_COLORS),
            "interior_color": self.pick(VEHICLE_COLORS),
            "vehicle_type": self.pick(VEHICLE_TYPES),
            "vin": self.vin(),
        }));

        GeneratedListing {
            title,
            description,
            price,
            category_fields,
            images: Vec::new(),
        }
    }

    fn property_rental(&mut self) -> GeneratedListing {
        let property_type = self.pick(PROPERTY_TYPES);
        let bedrooms: u32 = self.rng.gen_range(1..=4);
        let bathrooms = self.rng.gen_range(2..=6) as f64 / 2.0;
        let sqft: u32 = self.rng.gen_range(500..=2500);
        let rent = self.rng.gen_range(800..=4000);
        let (city, _) = CITIES[self.rng.gen_range(0..CITIES.len())];
        let available = self.anchor + Duration::days(self.rng.gen_range(1..=180));

        let title = format!("{}BR {} for Rent in {}", bedrooms, property_type, city);
        let audience = if bedrooms == 1 {
            "individuals or couples"
        } else {
            "families"
        };
        let description = format!(
            "Spacious {} bedroom, {} bathroom {} available for rent. {} square feet of living \
             space with modern amenities. Great location with easy access to shopping, dining, \
             and public transportation. Perfect for {}. Contact us to schedule a viewing!",
            bedrooms,
            format_half(bathrooms),
            property_type.to_lowercase(),
            sqft,
            audience
        );

        let category_fields = object(json!({
            "property_type": property_type.to_lowercase(),
            "bedrooms": bedrooms.to_string(),
            "bathrooms": format_half(bathrooms),
            "sqft": sqft.to_string(),
            "pet_policy": self.pick(PET_POLICIES),
            "lease_term": self.pick(LEASE_TERMS),
            "availability_date": available.format("%Y-%m-%d").to_string(),
            "parking": self.pick(PARKING),
            "laundry": self.pick(LAUNDRY),
        }));

        GeneratedListing {
            title,
            description,
            price: rent,
            category_fields,
            images: Vec::new(),
        }
    }

    fn electronics(&mut self) -> GeneratedListing {
        let line = &ELECTRONICS_LINES[self.rng.gen_range(0..ELECTRONICS_LINES.len())];
        let brand = self.pick(line.brands);
        let model = self.pick(line.models);
        let condition = self.pick(ELECTRONICS_CONDITIONS);
        let price = self.rng.gen_range(line.price_range.0..=line.price_range.1);
        let condition_text = condition.replace('_', " ");

        let title = format!("{} {} - {} condition", brand, model, condition_text);
        let state = if condition == "new" {
            "Still in original packaging with warranty."
        } else {
            "Well-maintained and fully functional."
        };
        let purpose = match line.usage {
            Usage::Phone => "everyday use, photos, and staying connected",
            Usage::Computer => "work, school, or creative projects",
            Usage::Entertainment => "gaming and entertainment",
        };
        let description = format!(
            "{} {} in {} condition. {} Perfect for {}. Comes with original accessories where \
             available.",
            brand, model, condition_text, state, purpose
        );

        let category_fields = object(json!({
            "type": line.kind.to_lowercase().replacen(' ', "_", 1),
            "brand": brand.to_lowercase(),
            "model": model,
            "condition": condition,
            "warranty": self.pick(WARRANTY),
            "storage": self.pick(STORAGE_SIZES),
        }));

        GeneratedListing {
            title,
            description,
            price,
            category_fields,
            images: Vec::new(),
        }
    }

    fn apparel(&mut self) -> GeneratedListing {
        let line = &APPAREL_LINES[self.rng.gen_range(0..APPAREL_LINES.len())];
        let brand = self.pick(line.brands);
        let size = self.pick(APPAREL_SIZES);
        let condition = self.pick(APPAREL_CONDITIONS);
        let price = self.rng.gen_range(line.price_range.0..=line.price_range.1);
        let color = self.pick(APPAREL_COLORS);

        let title = format!("{} {} - Size {}", brand, line.kind, size);
        let wear = if condition.contains("new") {
            "Never worn, still has tags."
        } else {
            "Gently used and well-maintained."
        };
        let description = format!(
            "{} {} in {} color, size {}. Condition: {}. {} Perfect for {}. Smoke-free home.",
            brand,
            line.kind,
            color.to_lowercase(),
            size,
            condition.replace('_', " "),
            wear,
            line.occasion
        );

        let category_fields = object(json!({
            "type": line.kind.to_lowercase().replacen(' ', "_", 1),
            "size": size,
            "brand": brand.to_lowercase(),
            "condition": condition,
            "color": color.to_lowercase(),
            "material": self.pick(MATERIALS),
            "gender": self.pick(GENDERS),
        }));

        GeneratedListing {
            title,
            description,
            price,
            category_fields,
            images: Vec::new(),
        }
    }

    // ==================== Field Pickers ====================

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.gen_range(0..items.len())]
    }

    fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.r#gen()).into_uuid()
    }

    fn recent(&mut self, days: i64) -> DateTime<Utc> {
        self.anchor - Duration::seconds(self.rng.gen_range(0..days * 86_400))
    }

    fn image_url(&mut self, category: Category) -> String {
        let file = format!("{}-{}.jpg", self.uuid(), self.pick(IMAGE_NOUNS));
        format!(
            "{}/{}%2F{}?alt=media&token={}",
            STORAGE_BASE_URL,
            category.image_folder(),
            file,
            self.uuid()
        )
    }

    fn vin(&mut self) -> String {
        // VINs never contain I, O or Q.
        const VIN_CHARS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";
        (0..17)
            .map(|_| VIN_CHARS[self.rng.gen_range(0..VIN_CHARS.len())] as char)
            .collect()
    }
}

impl Default for ListingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn format_half(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_category_tags() {
        assert_eq!("property-rentals".parse::<Category>().unwrap(), Category::PropertyRentals);
        assert_eq!(Category::Apparel.to_string(), "apparel");
        assert!("furniture".parse::<Category>().unwrap_err().is_config());
    }

    #[test]
    fn test_category_serde_uses_tags() {
        let encoded = serde_json::to_string(&Category::PropertyRentals).unwrap();
        assert_eq!(encoded, "\"property-rentals\"");
    }

    #[test]
    fn test_unknown_tag_is_config_error() {
        let mut generator = ListingGenerator::seeded(1);
        assert!(generator.generate_by_tag("boats").unwrap_err().is_config());
    }

    #[test]
    fn test_same_seed_same_listings() {
        let mut a = ListingGenerator::seeded(42).with_anchor(anchor());
        let mut b = ListingGenerator::seeded(42).with_anchor(anchor());
        for category in Category::ALL {
            assert_eq!(a.listing_document(category), b.listing_document(category));
        }
    }

    #[test]
    fn test_vehicle_shape() {
        let mut generator = ListingGenerator::seeded(7).with_anchor(anchor());
        let listing = generator.generate(Category::Vehicles);

        assert_eq!(listing.images.len(), 3);
        assert!((3_000..=65_000).contains(&listing.price));
        let vin = listing.category_fields["vin"].as_str().unwrap();
        assert_eq!(vin.len(), 17);
        assert!(!vin.contains(['I', 'O', 'Q']));
        assert!(listing.images[0].contains("vehicles%2F"));
    }

    #[test]
    fn test_price_ranges_follow_product_lines() {
        let mut generator = ListingGenerator::seeded(3);
        for _ in 0..50 {
            let listing = generator.generate(Category::Apparel);
            assert!((10..=300).contains(&listing.price));
            let listing = generator.generate(Category::PropertyRentals);
            assert!((800..=4000).contains(&listing.price));
        }
    }

    #[test]
    fn test_listing_document_fields() {
        let mut generator = ListingGenerator::seeded(11).with_anchor(anchor());
        let (id, doc) = generator.listing_document(Category::Electronics);

        assert_eq!(doc["id"], json!(id));
        assert_eq!(doc["category"], json!("electronics"));
        assert_eq!(doc["isActive"], json!(true));
        assert!(doc["categoryFields"].is_object());
        assert!(Uuid::parse_str(&id).is_ok());

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(&keys[..3], &["id", "title", "description"]);
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(200_000), "200,000");
        assert_eq!(format_half(2.0), "2");
        assert_eq!(format_half(1.5), "1.5");
    }
}
