//! Transaction — one product sale record.
//!
//! Records arrive from the upstream dataset unvalidated and are stored as-is,
//! so every attribute except the store-assigned `id` may be null or hold a
//! value of an unexpected JSON type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored product sale record.
///
/// `price` and `sold` carry whatever the store holds for them: normally a
/// number and `0`/`1`, but an unvalidated upstream record may have left text
/// there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
  /// Assigned by the store; unique and stable once assigned.
  pub id:           i64,
  pub title:        Option<String>,
  pub price:        Value,
  pub description:  Option<String>,
  pub category:     Option<String>,
  pub image:        Option<String>,
  pub sold:         Value,
  /// Sale date exactly as delivered upstream, e.g.
  /// `2021-11-27T20:29:54+05:30`.
  pub date_of_sale: Option<String>,
}

impl Transaction {
  pub fn price_f64(&self) -> Option<f64> { self.price.as_f64() }

  /// `true` only for a stored `1`.
  pub fn is_sold(&self) -> bool { self.sold.as_i64() == Some(1) }
}

/// Input for a single insert: the raw upstream value of each column, `Null`
/// when the upstream element lacks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTransaction {
  pub title:        Value,
  pub price:        Value,
  pub description:  Value,
  pub category:     Value,
  pub image:        Value,
  pub sold:         Value,
  pub date_of_sale: Value,
}

impl NewTransaction {
  /// Take the known columns out of one upstream array element.
  ///
  /// Never fails: other keys (including an upstream `id`) are ignored, and an
  /// element that is not an object yields an all-null row.
  pub fn from_upstream(element: Value) -> Self {
    let Value::Object(mut map) = element else {
      return Self::default();
    };
    let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);
    Self {
      title:        take("title"),
      price:        take("price"),
      description:  take("description"),
      category:     take("category"),
      image:        take("image"),
      sold:         take("sold"),
      date_of_sale: take("dateOfSale"),
    }
  }
}
