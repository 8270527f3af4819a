//! JSON read API for Tally.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tally_core::store::TransactionStore`]. CORS, tracing, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = tally_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http());
//! ```

pub mod error;
pub mod reports;
pub mod transactions;

use std::sync::Arc;

use axum::{Router, routing::get};
use tally_core::store::TransactionStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TransactionStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Rows
    .route("/all", get(transactions::list::<S>))
    .route("/search", get(transactions::search::<S>))
    .route("/search/month", get(transactions::search_month::<S>))
    .route("/search/pagination", get(transactions::paginate::<S>))
    // Reports
    .route("/statistics", get(reports::statistics::<S>))
    .route("/pie-chart-category", get(reports::pie_chart::<S>))
    .route("/bar-chart-price-range", get(reports::bar_chart::<S>))
    .route("/combined-data", get(reports::combined::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use serde_json::{Value, json};
  use tally_core::{
    report::{CategoryCount, PriceRangeCount, Statistics},
    store::TransactionQuery,
    transaction::{NewTransaction, Transaction},
  };
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  fn tx(title: &str, price: f64, category: &str, sold: bool, date: &str) -> NewTransaction {
    NewTransaction {
      title:        json!(title),
      price:        json!(price),
      description:  json!(format!("{title} description")),
      category:     json!(category),
      image:        Value::Null,
      sold:         json!(sold),
      date_of_sale: json!(date),
    }
  }

  async fn make_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let mut rows = vec![
      tx("Backpack", 109.95, "men's clothing", true, "2022-03-10T20:29:54+05:30"),
      tx("T-Shirt", 22.3, "men's clothing", false, "2022-03-12T20:29:54+05:30"),
      tx("Ring", 695.0, "jewelery", true, "2022-03-20T20:29:54+05:30"),
      tx("Monitor", 999.99, "electronics", true, "2022-07-27T20:29:54+05:30"),
    ];
    rows.extend(
      (0..21).map(|i| tx(&format!("filler-{i:02}"), 5.0, "misc", false, "2022-01-15T12:00:00Z")),
    );
    store.insert_many(rows).await.unwrap();
    Arc::new(store)
  }

  async fn get_raw<S>(store: Arc<S>, uri: &str) -> (StatusCode, Vec<u8>)
  where
    S: TransactionStore + Send + Sync + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
  {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
  }

  async fn get_json(store: Arc<SqliteStore>, uri: &str) -> Value {
    let (status, body) = get_raw(store, uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}: {}", String::from_utf8_lossy(&body));
    serde_json::from_slice(&body).unwrap()
  }

  fn titles(v: &Value) -> Vec<String> {
    v.as_array()
      .unwrap()
      .iter()
      .map(|t| t["title"].as_str().unwrap().to_owned())
      .collect()
  }

  // ── Rows ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn all_returns_every_row() {
    let v = get_json(make_store().await, "/all").await;
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 25);
    assert_eq!(rows[0]["title"], "Backpack");
    assert_eq!(rows[0]["dateOfSale"], "2022-03-10T20:29:54+05:30");
    assert_eq!(rows[0]["sold"], 1);
    assert!(rows[0]["id"].is_i64());
  }

  #[tokio::test]
  async fn search_without_input_returns_full_table() {
    let store = make_store().await;
    let all = get_json(store.clone(), "/all").await;
    let searched = get_json(store, "/search").await;
    assert_eq!(all, searched);
  }

  #[tokio::test]
  async fn search_matches_substring() {
    let v = get_json(make_store().await, "/search?searchInput=Ring").await;
    assert_eq!(titles(&v), ["Ring"]);
  }

  #[tokio::test]
  async fn search_month_defaults_to_march() {
    let v = get_json(make_store().await, "/search/month?searchInput=description").await;
    assert_eq!(titles(&v), ["Backpack", "T-Shirt", "Ring"]);
  }

  #[tokio::test]
  async fn search_month_without_input_matches_nothing() {
    let v = get_json(make_store().await, "/search/month").await;
    assert_eq!(v, json!([]));

    let v = get_json(make_store().await, "/search/month?dropDownInput=07").await;
    assert_eq!(v, json!([]));
  }

  #[tokio::test]
  async fn search_month_with_empty_input_matches_month() {
    let v = get_json(make_store().await, "/search/month?searchInput=&dropDownInput=07").await;
    assert_eq!(titles(&v), ["Monitor"]);
  }

  #[tokio::test]
  async fn search_month_with_explicit_month() {
    let v = get_json(
      make_store().await,
      "/search/month?searchInput=Mon&dropDownInput=07",
    )
    .await;
    assert_eq!(titles(&v), ["Monitor"]);
  }

  // ── Pagination ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn pagination_defaults_to_first_ten() {
    let store = make_store().await;
    let all = get_json(store.clone(), "/all").await;
    let page = get_json(store, "/search/pagination").await;
    assert_eq!(page.as_array().unwrap()[..], all.as_array().unwrap()[..10]);
  }

  #[tokio::test]
  async fn pagination_pages_are_contiguous() {
    let store = make_store().await;
    let all = get_json(store.clone(), "/all").await;
    let p1 = get_json(store.clone(), "/search/pagination?page=1&perPage=10").await;
    let p2 = get_json(store, "/search/pagination?page=2&perPage=10").await;

    let joined: Vec<Value> = p1
      .as_array()
      .unwrap()
      .iter()
      .chain(p2.as_array().unwrap())
      .cloned()
      .collect();
    assert_eq!(joined[..], all.as_array().unwrap()[..20]);
  }

  #[tokio::test]
  async fn pagination_with_search_input() {
    let v = get_json(
      make_store().await,
      "/search/pagination?searchInput=filler&page=2&perPage=5",
    )
    .await;
    assert_eq!(
      titles(&v),
      ["filler-05", "filler-06", "filler-07", "filler-08", "filler-09"]
    );
  }

  #[tokio::test]
  async fn pagination_rejects_non_numeric_page() {
    let (status, body) = get_raw(make_store().await, "/search/pagination?page=two").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.is_empty());
  }

  #[tokio::test]
  async fn pagination_input_is_never_sql() {
    let store = make_store().await;
    let (status, body) = get_raw(
      store.clone(),
      "/search/pagination?searchInput=%27%20OR%201%3D1%20--",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert!(v.as_array().unwrap().is_empty());
  }

  // ── Reports ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn statistics_defaults_to_march() {
    let v = get_json(make_store().await, "/statistics").await;
    let amount = v["totalSaleAmount"].as_f64().unwrap();
    assert!((amount - (109.95 + 695.0)).abs() < 1e-9);
    assert_eq!(v["totalSoldItems"], 2);
    assert_eq!(v["totalNotSoldItems"], 1);
  }

  #[tokio::test]
  async fn statistics_counts_are_non_negative_every_month() {
    let store = make_store().await;
    for m in 1..=12 {
      let v = get_json(store.clone(), &format!("/statistics?dropDownInput={m:02}")).await;
      assert!(v["totalSoldItems"].as_u64().is_some());
      assert!(v["totalNotSoldItems"].as_u64().is_some());
      assert!(v["totalSaleAmount"].as_f64().unwrap() >= 0.0);
    }
  }

  #[tokio::test]
  async fn pie_chart_counts_sum_to_month_rows() {
    let v = get_json(make_store().await, "/pie-chart-category?dropDownInput=01").await;
    let slices = v.as_array().unwrap();
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0]["category"], "misc");
    assert_eq!(slices[0]["itemCount"], 21);
  }

  #[tokio::test]
  async fn bar_chart_is_ordered_by_price() {
    let v = get_json(make_store().await, "/bar-chart-price-range").await;
    let bars: Vec<(&str, u64)> = v
      .as_array()
      .unwrap()
      .iter()
      .map(|b| (b["priceRange"].as_str().unwrap(), b["itemCount"].as_u64().unwrap()))
      .collect();
    assert_eq!(bars, [("0 - 100", 1), ("101 - 200", 1), ("601 - 700", 1)]);
  }

  #[tokio::test]
  async fn combined_matches_individual_endpoints() {
    let store = make_store().await;
    let (status, combined) = get_raw(store.clone(), "/combined-data?dropDownInput=03").await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = get_raw(store.clone(), "/statistics?dropDownInput=03").await;
    let (_, bars) = get_raw(store.clone(), "/bar-chart-price-range?dropDownInput=03").await;
    let (_, pie) = get_raw(store, "/pie-chart-category?dropDownInput=03").await;

    let expected = format!(
      r#"{{"statistics":{},"barChart":{},"pieChart":{}}}"#,
      String::from_utf8(stats).unwrap(),
      String::from_utf8(bars).unwrap(),
      String::from_utf8(pie).unwrap(),
    );
    assert_eq!(String::from_utf8(combined).unwrap(), expected);
  }

  #[tokio::test]
  async fn combined_defaults_to_march() {
    let store = make_store().await;
    let explicit = get_json(store.clone(), "/combined-data?dropDownInput=03").await;
    let default = get_json(store, "/combined-data").await;
    assert_eq!(explicit, default);
  }

  #[tokio::test]
  async fn reads_never_duplicate_rows() {
    let store = make_store().await;
    let first = get_json(store.clone(), "/all").await;
    let second = get_json(store, "/all").await;
    assert_eq!(first, second);
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  /// A store whose operations fail, either all of them or only the named one.
  struct FailingStore {
    only: Option<&'static str>,
  }

  impl FailingStore {
    fn check(&self, op: &str) -> std::io::Result<()> {
      match self.only {
        Some(only) if only != op => Ok(()),
        _ => Err(std::io::Error::other(format!("{op} failed"))),
      }
    }
  }

  impl TransactionStore for FailingStore {
    type Error = std::io::Error;

    async fn insert_many(&self, rows: Vec<NewTransaction>) -> std::io::Result<usize> {
      self.check("insert_many")?;
      Ok(rows.len())
    }

    async fn count(&self) -> std::io::Result<u64> {
      self.check("count")?;
      Ok(0)
    }

    async fn list_all(&self) -> std::io::Result<Vec<Transaction>> {
      self.check("list_all")?;
      Ok(vec![])
    }

    async fn search(&self, _query: TransactionQuery) -> std::io::Result<Vec<Transaction>> {
      self.check("search")?;
      Ok(vec![])
    }

    async fn statistics(&self, _month: String) -> std::io::Result<Statistics> {
      self.check("statistics")?;
      Ok(Statistics {
        total_sale_amount:    0.0,
        total_sold_items:     0,
        total_not_sold_items: 0,
      })
    }

    async fn category_distribution(&self, _month: String) -> std::io::Result<Vec<CategoryCount>> {
      self.check("category_distribution")?;
      Ok(vec![])
    }

    async fn price_ranges(&self, _month: String) -> std::io::Result<Vec<PriceRangeCount>> {
      self.check("price_ranges")?;
      Ok(vec![])
    }
  }

  async fn assert_internal_error(store: FailingStore, uri: &str) {
    let (status, body) = get_raw(Arc::new(store), uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
    assert_eq!(body, b"Internal server error", "{uri}");
  }

  #[tokio::test]
  async fn store_failure_is_plain_500() {
    for uri in [
      "/all",
      "/search?searchInput=x",
      "/search/pagination",
      "/statistics",
      "/pie-chart-category",
      "/bar-chart-price-range",
      "/combined-data",
    ] {
      assert_internal_error(FailingStore { only: None }, uri).await;
    }
  }

  #[tokio::test]
  async fn combined_fails_when_any_report_fails() {
    for op in ["statistics", "price_ranges", "category_distribution"] {
      assert_internal_error(FailingStore { only: Some(op) }, "/combined-data").await;
    }
  }

  #[tokio::test]
  async fn combined_succeeds_when_unrelated_operation_fails() {
    let (status, _) =
      get_raw(Arc::new(FailingStore { only: Some("list_all") }), "/combined-data").await;
    assert_eq!(status, StatusCode::OK);
  }
}
