//! HTTP server wiring for Tally.
//!
//! Layers CORS and request tracing over [`tally_api::api_router`] and owns the
//! runtime configuration and the startup seeder.

pub mod seed;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use serde::Deserialize;
use tally_core::store::TransactionStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use seed::SeedConfig;

/// Upstream product dataset loaded on first start.
pub const DEFAULT_SEED_URL: &str =
  "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Built from defaults, then an optional TOML file, then `TALLY_*`
/// environment variables (e.g. `TALLY_PORT=8080`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub seed_url:          String,
  pub seed_enabled:      bool,
  pub seed_timeout_secs: u64,
}

impl ServerConfig {
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 7575_i64)?
      .set_default("store_path", "database.db")?
      .set_default("seed_url", DEFAULT_SEED_URL)?
      .set_default("seed_enabled", true)?
      .set_default("seed_timeout_secs", 30_i64)?
      .add_source(config::File::from(path.into()).required(false))
      .add_source(config::Environment::with_prefix("TALLY").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn seed_config(&self) -> SeedConfig {
    SeedConfig {
      url:     self.seed_url.clone(),
      timeout: Duration::from_secs(self.seed_timeout_secs),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: API routes plus CORS and tracing layers.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: TransactionStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  tally_api::api_router(store)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}
