//! One-shot population of the store from the upstream product dataset.
//!
//! The upstream document is a JSON array of product objects. Every element is
//! inserted as it arrives, unvalidated, in a single store transaction: a
//! mistyped field is stored with whatever value it has, and a non-object
//! element becomes an all-null row.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tally_core::{store::TransactionStore, transaction::NewTransaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("upstream returned {0}")]
  Status(StatusCode),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("upstream document is not a JSON array")]
  NotAnArray,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Where and how to fetch the dataset.
#[derive(Debug, Clone)]
pub struct SeedConfig {
  pub url:     String,
  pub timeout: Duration,
}

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  /// The store was empty and has been populated.
  Inserted { rows: usize },
  /// The store already held rows; nothing was fetched.
  AlreadySeeded { rows: u64 },
}

/// Populate `store` from `config.url` unless it already holds rows.
///
/// Never retries. The caller decides whether a failure is fatal.
pub async fn seed<S>(store: &S, config: &SeedConfig) -> Result<SeedOutcome, SeedError>
where
  S: TransactionStore,
{
  let existing = store
    .count()
    .await
    .map_err(|e| SeedError::Store(Box::new(e)))?;
  if existing > 0 {
    return Ok(SeedOutcome::AlreadySeeded { rows: existing });
  }

  let client = Client::builder().timeout(config.timeout).build()?;
  let records = fetch_records(&client, &config.url).await?;

  let rows = store
    .insert_many(records)
    .await
    .map_err(|e| SeedError::Store(Box::new(e)))?;

  Ok(SeedOutcome::Inserted { rows })
}

/// `GET url` and split the array into one insert per element.
pub async fn fetch_records(
  client: &Client,
  url: &str,
) -> Result<Vec<NewTransaction>, SeedError> {
  tracing::info!(%url, "fetching seed data");
  let resp = client.get(url).send().await?;

  if !resp.status().is_success() {
    return Err(SeedError::Status(resp.status()));
  }

  let body = resp.bytes().await?;
  let serde_json::Value::Array(items) = serde_json::from_slice::<serde_json::Value>(&body)? else {
    return Err(SeedError::NotAnArray);
  };

  Ok(items.into_iter().map(NewTransaction::from_upstream).collect())
}
