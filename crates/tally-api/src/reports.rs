//! Handlers for the month reports and the combined dashboard payload.
//!
//! Every endpoint takes `?dropDownInput=MM`, defaulting to `03`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use tally_core::{
  DEFAULT_MONTH,
  report::{CategoryCount, CombinedReport, PriceRangeCount, Statistics},
  store::TransactionStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthParams {
  pub drop_down_input: Option<String>,
}

impl MonthParams {
  fn month(self) -> String {
    self
      .drop_down_input
      .unwrap_or_else(|| DEFAULT_MONTH.to_owned())
  }
}

/// `GET /statistics`
pub async fn statistics<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MonthParams>,
) -> Result<Json<Statistics>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = store
    .statistics(params.month())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}

/// `GET /pie-chart-category`
pub async fn pie_chart<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MonthParams>,
) -> Result<Json<Vec<CategoryCount>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let slices = store
    .category_distribution(params.month())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(slices))
}

/// `GET /bar-chart-price-range`
pub async fn bar_chart<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MonthParams>,
) -> Result<Json<Vec<PriceRangeCount>>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bars = store
    .price_ranges(params.month())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(bars))
}

/// `GET /combined-data`
///
/// Runs the three reports concurrently against the same store. Any failure
/// fails the whole response; there are no partial results.
pub async fn combined<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MonthParams>,
) -> Result<Json<CombinedReport>, ApiError>
where
  S: TransactionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let month = params.month();
  let (statistics, bar_chart, pie_chart) = tokio::try_join!(
    store.statistics(month.clone()),
    store.price_ranges(month.clone()),
    store.category_distribution(month),
  )
  .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(CombinedReport { statistics, bar_chart, pie_chart }))
}
