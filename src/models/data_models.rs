use serde::{Deserialize, Serialize};

pub const DISCOUNTED_PRICE: &str = "discounted_price";
pub const RETAIL_PRICE: &str = "retail_price";
pub const DISCOUNT_PERCENT: &str = "discount_percent";
pub const PRODUCT_RATING: &str = "product_rating";
pub const PRODUCT_CATEGORY_TREE: &str = "product_category_tree";
pub const BRAND: &str = "brand";

/// Columns every catalog export must carry. `brand` is optional.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    DISCOUNTED_PRICE,
    RETAIL_PRICE,
    PRODUCT_RATING,
    PRODUCT_CATEGORY_TREE,
];

/// Row accounting for one cleaning pass over the product table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows_loaded: usize,
    pub rows_missing_price: usize,
    pub rows_unparseable_price: usize,
    pub rows_retained: usize,
    pub undefined_discounts: usize,
}

impl CleaningSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_missing_price + self.rows_unparseable_price
    }
}

/// Five-number summary of one box in the price-by-category chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}
