//! Aggregate report rows computed over a single month of transactions.

use serde::{Deserialize, Serialize};

/// Sale totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  /// Sum of `price` over sold rows; `0.0` when nothing was sold.
  pub total_sale_amount:    f64,
  pub total_sold_items:     u64,
  pub total_not_sold_items: u64,
}

/// Row count for one category (pie chart slice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
  pub category:   Option<String>,
  pub item_count: u64,
}

/// Row count for one price band (bar chart bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCount {
  pub price_range: String,
  pub item_count:  u64,
}

/// The three month reports merged into one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
  pub statistics: Statistics,
  pub bar_chart:  Vec<PriceRangeCount>,
  pub pie_chart:  Vec<CategoryCount>,
}

/// Inclusive `(lower, upper, label)` price bands. A price in none of them
/// (negative, null, above 900, or in a gap such as `100.5`) falls into
/// [`OVERFLOW_PRICE_BAND`].
pub const PRICE_BANDS: [(u32, u32, &str); 9] = [
  (0, 100, "0 - 100"),
  (101, 200, "101 - 200"),
  (201, 300, "201 - 300"),
  (301, 400, "301 - 400"),
  (401, 500, "401 - 500"),
  (501, 600, "501 - 600"),
  (601, 700, "601 - 700"),
  (701, 800, "701 - 800"),
  (801, 900, "801 - 900"),
];

pub const OVERFLOW_PRICE_BAND: &str = "901-above";
