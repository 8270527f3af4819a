//! [`SqliteStore`] — the SQLite implementation of [`TransactionStore`].

use std::path::Path;

use tally_core::{
  report::{CategoryCount, PriceRangeCount, Statistics},
  store::{TransactionQuery, TransactionStore},
  transaction::{NewTransaction, Transaction},
};

use crate::{
  encode::{
    TEXT_MATCH, TRANSACTION_COLUMNS, encode_json, month_match, price_band_case,
    transaction_from_row,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A transaction store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TransactionStore impl ───────────────────────────────────────────────────

impl TransactionStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_many(&self, rows: Vec<NewTransaction>) -> Result<usize> {
    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO transactions (
               title, price, description, category, image, sold, dateOfSale
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for row in rows {
            inserted += stmt.execute(rusqlite::params![
              encode_json(row.title),
              encode_json(row.price),
              encode_json(row.description),
              encode_json(row.category),
              encode_json(row.image),
              encode_json(row.sold),
              encode_json(row.date_of_sale),
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(inserted, "inserted transactions");
    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn count(&self) -> Result<u64> {
    let n: u64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
      })
      .await?;
    Ok(n)
  }

  async fn list_all(&self) -> Result<Vec<Transaction>> {
    let rows: Vec<Transaction> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], transaction_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn search(&self, query: TransactionQuery) -> Result<Vec<Transaction>> {
    let TransactionQuery { text, month, limit, offset } = query;
    let limit_val  = limit.unwrap_or(-1);
    let offset_val = offset.unwrap_or(0);

    let rows: Vec<Transaction> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; parameter slots stay fixed.
        let mut conds: Vec<String> = vec![];
        if text.is_some() {
          conds.push(TEXT_MATCH.to_owned());
        }
        if month.is_some() {
          conds.push(month_match(2));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {TRANSACTION_COLUMNS}
           FROM transactions
           {where_clause}
           ORDER BY id
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![text.as_deref(), month.as_deref(), limit_val, offset_val],
            transaction_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Month reports ─────────────────────────────────────────────────────────

  async fn statistics(&self, month: String) -> Result<Statistics> {
    let stats: Statistics = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT
             COALESCE(SUM(CASE WHEN sold = 1 THEN price ELSE 0.0 END), 0.0),
             COUNT(CASE WHEN sold = 1 THEN 1 END),
             COUNT(CASE WHEN sold = 0 THEN 1 END)
           FROM transactions
           WHERE {}",
          month_match(1),
        );
        Ok(conn.query_row(&sql, rusqlite::params![month], |row| {
          Ok(Statistics {
            total_sale_amount:    row.get(0)?,
            total_sold_items:     row.get(1)?,
            total_not_sold_items: row.get(2)?,
          })
        })?)
      })
      .await?;
    Ok(stats)
  }

  async fn category_distribution(&self, month: String) -> Result<Vec<CategoryCount>> {
    let rows: Vec<CategoryCount> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT category, COUNT(*)
           FROM transactions
           WHERE {}
           GROUP BY category
           ORDER BY category",
          month_match(1),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![month], |row| {
            Ok(CategoryCount {
              category:   row.get(0)?,
              item_count: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn price_ranges(&self, month: String) -> Result<Vec<PriceRangeCount>> {
    let rows: Vec<PriceRangeCount> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} AS priceRange, COUNT(*)
           FROM transactions
           WHERE {}
           GROUP BY priceRange
           ORDER BY MIN(price)",
          price_band_case(),
          month_match(1),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![month], |row| {
            Ok(PriceRangeCount {
              price_range: row.get(0)?,
              item_count:  row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}
