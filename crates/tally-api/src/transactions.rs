//! Handlers returning transaction rows.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/all` | Every row |
//! | `GET`  | `/search` | `?searchInput` (default empty, matches all) |
//! | `GET`  | `/search/month` | `?searchInput` (missing matches nothing), `?dropDownInput` (default `03`) |
//! | `GET`  | `/search/pagination` | `?searchInput`, `?page` (default 1), `?perPage` (default 10) |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tally_core::{
  DEFAULT_MONTH,
  store::{TransactionQuery, TransactionStore},
  transaction::Transaction,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /all`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = store
    .list_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub search_input: Option<String>,
}

/// `GET /search[?searchInput=...]`
///
/// An empty or missing `searchInput` returns every row with a non-null
/// title, description or price; a row where all three are null never matches.
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = TransactionQuery {
    text: Some(params.search_input.unwrap_or_default()),
    ..Default::default()
  };
  let rows = store
    .search(query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthSearchParams {
  pub search_input:    Option<String>,
  /// Two-digit month code, compared verbatim.
  pub drop_down_input: Option<String>,
}

/// `GET /search/month[?searchInput=...][&dropDownInput=MM]`
///
/// Unlike `/search`, a missing `searchInput` matches nothing.
pub async fn search_month<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MonthSearchParams>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Some(text) = params.search_input else {
    return Ok(Json(Vec::new()));
  };
  let query = TransactionQuery {
    text:  Some(text),
    month: Some(
      params
        .drop_down_input
        .unwrap_or_else(|| DEFAULT_MONTH.to_owned()),
    ),
    ..Default::default()
  };
  let rows = store
    .search(query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

// ─── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
  pub search_input: Option<String>,
  /// 1-based. Not bounds-checked.
  pub page:         Option<i64>,
  pub per_page:     Option<i64>,
}

/// `GET /search/pagination[?searchInput=...][&page=N][&perPage=N]`
///
/// A non-integer `page` or `perPage` is a 400.
pub async fn paginate<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Query(params) = params?;
  let text = params.search_input.filter(|s| !s.is_empty());
  let query = TransactionQuery::page(
    text,
    params.page.unwrap_or(1),
    params.per_page.unwrap_or(10),
  );

  let rows = store
    .search(query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
