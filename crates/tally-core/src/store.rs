//! The `TransactionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! The HTTP layer and the seeder depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  report::{CategoryCount, PriceRangeCount, Statistics},
  transaction::{NewTransaction, Transaction},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`TransactionStore::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
  /// Case-sensitive substring matched against title, description or the
  /// textual form of price. `None` disables the text predicate entirely.
  pub text:   Option<String>,
  /// Two-digit month code compared against the month of `dateOfSale`.
  pub month:  Option<String>,
  /// Passed to SQL `LIMIT` unchanged; negative means unbounded.
  pub limit:  Option<i64>,
  pub offset: Option<i64>,
}

impl TransactionQuery {
  /// Query for one page of results, 1-based. Values are not bounds-checked;
  /// the arithmetic saturates instead of overflowing.
  pub fn page(text: Option<String>, page: i64, per_page: i64) -> Self {
    Self {
      text,
      month: None,
      limit: Some(per_page),
      offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a transaction store backend.
///
/// Rows are append-only: there is no update or delete operation.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TransactionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert all rows atomically, returning how many were written.
  fn insert_many(
    &self,
    rows: Vec<NewTransaction>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Total number of stored rows.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Every row in storage order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Transaction>, Self::Error>> + Send + '_;

  /// Rows matching `query`, in storage order.
  fn search(
    &self,
    query: TransactionQuery,
  ) -> impl Future<Output = Result<Vec<Transaction>, Self::Error>> + Send + '_;

  // ── Month reports ─────────────────────────────────────────────────────

  fn statistics(
    &self,
    month: String,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;

  /// Row counts per distinct category present in `month`.
  fn category_distribution(
    &self,
    month: String,
  ) -> impl Future<Output = Result<Vec<CategoryCount>, Self::Error>> + Send + '_;

  /// Row counts per non-empty price band in `month`, ordered ascending by the
  /// minimum price observed in each band.
  fn price_ranges(
    &self,
    month: String,
  ) -> impl Future<Output = Result<Vec<PriceRangeCount>, Self::Error>> + Send + '_;
}
