// Category schema tables for synthetic listings.

pub(crate) struct VehicleMake {
    pub name: &'static str,
    pub models: &'static [&'static str],
}

pub(crate) const VEHICLE_MAKES: &[VehicleMake] = &[
    VehicleMake { name: "Honda", models: &["Civic", "Accord", "CR-V", "Pilot", "Odyssey"] },
    VehicleMake { name: "Toyota", models: &["Corolla", "Camry", "RAV4", "Highlander", "Prius"] },
    VehicleMake { name: "Ford", models: &["F-150", "Mustang", "Explorer", "Edge", "Escape"] },
    VehicleMake { name: "Chevrolet", models: &["Silverado", "Equinox", "Malibu", "Traverse", "Camaro"] },
    VehicleMake { name: "BMW", models: &["3 Series", "5 Series", "X3", "X5", "i3"] },
    VehicleMake { name: "Mercedes-Benz", models: &["C-Class", "E-Class", "GLC", "GLE", "A-Class"] },
    VehicleMake { name: "Volkswagen", models: &["Jetta", "Passat", "Tiguan", "Atlas", "Golf"] },
    VehicleMake { name: "Nissan", models: &["Altima", "Sentra", "Rogue", "Pathfinder", "370Z"] },
    VehicleMake { name: "Hyundai", models: &["Elantra", "Sonata", "Tucson", "Santa Fe", "Genesis"] },
    VehicleMake { name: "Kia", models: &["Forte", "Optima", "Sorento", "Sportage", "Soul"] },
];

pub(crate) const VEHICLE_CONDITIONS: &[&str] = &["excellent", "good", "fair", "poor"];
pub(crate) const TRANSMISSIONS: &[&str] = &["automatic", "manual"];
pub(crate) const ENGINE_SIZES: &[&str] = &["1.6L", "2.0L", "2.4L", "3.0L", "3.5L", "4.0L"];
pub(crate) const FUEL_TYPES: &[&str] = &["gasoline", "diesel", "electric", "hybrid"];
pub(crate) const VEHICLE_TYPES: &[&str] = &["sedan", "suv", "truck", "coupe", "wagon"];
pub(crate) const VEHICLE_COLORS: &[&str] = &[
    "black", "white", "silver", "gray", "red", "blue", "green", "beige",
];

pub(crate) const PROPERTY_TYPES: &[&str] = &["Apartment", "House", "Condo", "Townhouse", "Studio"];
pub(crate) const PET_POLICIES: &[&str] = &["dogs_allowed", "cats_allowed", "no_pets", "pets_negotiable"];
pub(crate) const LEASE_TERMS: &[&str] = &["12_months", "6_months", "month_to_month"];
pub(crate) const PARKING: &[&str] = &["garage", "driveway", "street", "none"];
pub(crate) const LAUNDRY: &[&str] = &["in_unit", "in_building", "nearby", "none"];

/// What a product line is good for, used in descriptions.
#[derive(Clone, Copy)]
pub(crate) enum Usage {
    Phone,
    Computer,
    Entertainment,
}

pub(crate) struct ElectronicsLine {
    pub kind: &'static str,
    pub brands: &'static [&'static str],
    pub models: &'static [&'static str],
    pub price_range: (u32, u32),
    pub usage: Usage,
}

pub(crate) const ELECTRONICS_LINES: &[ElectronicsLine] = &[
    ElectronicsLine {
        kind: "iPhone",
        brands: &["Apple"],
        models: &["iPhone 14", "iPhone 13", "iPhone 12", "iPhone SE"],
        price_range: (200, 1200),
        usage: Usage::Phone,
    },
    ElectronicsLine {
        kind: "MacBook",
        brands: &["Apple"],
        models: &["MacBook Air", "MacBook Pro 13\"", "MacBook Pro 16\""],
        price_range: (600, 2500),
        usage: Usage::Computer,
    },
    ElectronicsLine {
        kind: "Samsung Galaxy",
        brands: &["Samsung"],
        models: &["Galaxy S23", "Galaxy S22", "Galaxy Note 20", "Galaxy A54"],
        price_range: (150, 1000),
        usage: Usage::Phone,
    },
    ElectronicsLine {
        kind: "Gaming Console",
        brands: &["Sony", "Microsoft", "Nintendo"],
        models: &["PlayStation 5", "Xbox Series X", "Nintendo Switch"],
        price_range: (200, 600),
        usage: Usage::Entertainment,
    },
    ElectronicsLine {
        kind: "Laptop",
        brands: &["Dell", "HP", "Lenovo", "ASUS"],
        models: &["XPS 13", "Pavilion", "ThinkPad", "ZenBook"],
        price_range: (300, 1800),
        usage: Usage::Computer,
    },
];

pub(crate) const ELECTRONICS_CONDITIONS: &[&str] = &["new", "like_new", "excellent", "good", "fair"];
pub(crate) const WARRANTY: &[&str] = &["yes", "no"];
pub(crate) const STORAGE_SIZES: &[&str] = &["64GB", "128GB", "256GB", "512GB", "1TB"];

pub(crate) struct ApparelLine {
    pub kind: &'static str,
    pub brands: &'static [&'static str],
    pub price_range: (u32, u32),
    pub occasion: &'static str,
}

pub(crate) const APPAREL_LINES: &[ApparelLine] = &[
    ApparelLine {
        kind: "Designer Jacket",
        brands: &["Nike", "Adidas", "North Face", "Patagonia"],
        price_range: (30, 200),
        occasion: "outdoor activities or casual wear",
    },
    ApparelLine {
        kind: "Jeans",
        brands: &["Levi's", "Wrangler", "Lucky Brand", "AG"],
        price_range: (20, 150),
        occasion: "everyday casual wear",
    },
    ApparelLine {
        kind: "Sneakers",
        brands: &["Nike", "Adidas", "Jordan", "Vans"],
        price_range: (40, 300),
        occasion: "sports, gym, or casual outings",
    },
    ApparelLine {
        kind: "Dress",
        brands: &["Zara", "H&M", "Calvin Klein", "Tommy Hilfiger"],
        price_range: (25, 180),
        occasion: "special occasions or professional settings",
    },
    ApparelLine {
        kind: "T-Shirt",
        brands: &["Gap", "Uniqlo", "Ralph Lauren", "Champion"],
        price_range: (10, 80),
        occasion: "casual everyday wear",
    },
];

pub(crate) const APPAREL_SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];
pub(crate) const APPAREL_CONDITIONS: &[&str] = &[
    "new_with_tags",
    "new_without_tags",
    "like_new",
    "excellent",
    "good",
];
pub(crate) const APPAREL_COLORS: &[&str] = &[
    "Black", "White", "Navy", "Red", "Olive", "Gray", "Maroon", "Teal",
];
pub(crate) const MATERIALS: &[&str] = &["cotton", "polyester", "wool", "leather", "denim", "silk"];
pub(crate) const GENDERS: &[&str] = &["mens", "womens", "unisex"];

pub(crate) const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Mike", "Sarah", "David", "Lisa", "Chris", "Emma", "Ryan", "Amanda",
];
pub(crate) const LAST_NAMES: &[&str] = &[
    "Doe", "Smith", "Johnson", "Wilson", "Brown", "Davis", "Garcia", "Taylor", "Martinez",
    "Anderson",
];
pub(crate) const CITIES: &[(&str, &str)] = &[
    ("San Francisco", "CA"),
    ("Oakland", "CA"),
    ("Portland", "OR"),
    ("Seattle", "WA"),
    ("Austin", "TX"),
    ("Denver", "CO"),
    ("Chicago", "IL"),
    ("Boston", "MA"),
];
pub(crate) const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "inbox.test"];
pub(crate) const IMAGE_NOUNS: &[&str] = &["front", "side", "detail", "interior", "closeup", "overview"];

pub(crate) const STORAGE_BASE_URL: &str =
    "https://firebasestorage.googleapis.com/v0/b/stan-s-list.firebasestorage.app/o";
pub(crate) const IMAGES_PER_LISTING: usize = 3;
