//! SQL fragments shared by the store queries, and the conversions between
//! JSON values and SQLite values in both directions.

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::Value;
use tally_core::{
  report::{OVERFLOW_PRICE_BAND, PRICE_BANDS},
  transaction::Transaction,
};

/// Column list in the order [`transaction_from_row`] expects.
pub const TRANSACTION_COLUMNS: &str =
  "id, title, price, description, category, image, sold, dateOfSale";

/// Case-sensitive substring match of `?1` against title, description or
/// price. `instr` gives `%` and `_` no special meaning, unlike `LIKE`.
pub const TEXT_MATCH: &str = "(instr(title, ?1) > 0
       OR instr(description, ?1) > 0
       OR instr(CAST(price AS TEXT), ?1) > 0)";

/// Month of `dateOfSale` as a two-digit string, compared against `?N`.
pub fn month_match(param: u8) -> String {
  format!("strftime('%m', dateOfSale) = ?{param}")
}

/// `CASE` expression assigning each row its price band label.
///
/// Labels and bounds are compile-time constants from [`PRICE_BANDS`], never
/// user input.
pub fn price_band_case() -> String {
  let arms: String = PRICE_BANDS
    .iter()
    .map(|(lower, upper, label)| {
      format!("WHEN price >= {lower} AND price <= {upper} THEN '{label}' ")
    })
    .collect();
  format!("CASE {arms}ELSE '{OVERFLOW_PRICE_BAND}' END")
}

// ─── JSON → SQLite ───────────────────────────────────────────────────────────

/// Bind a raw upstream value as-is. Booleans become `0`/`1`; arrays and
/// objects are stored as their JSON text.
pub fn encode_json(value: Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Bool(b) => SqlValue::Integer(i64::from(b)),
    Value::Number(n) => match n.as_i64() {
      Some(i) => SqlValue::Integer(i),
      None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
    },
    Value::String(s) => SqlValue::Text(s),
    other @ (Value::Array(_) | Value::Object(_)) => SqlValue::Text(other.to_string()),
  }
}

// ─── SQLite → JSON ───────────────────────────────────────────────────────────

/// Read a column of any storage class. Used for columns whose declared
/// affinity cannot coerce every value an unvalidated insert may have bound.
pub fn decode_json(value: ValueRef<'_>) -> Value {
  match value {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::from(i),
    ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
    ValueRef::Text(t) | ValueRef::Blob(t) => {
      Value::String(String::from_utf8_lossy(t).into_owned())
    }
  }
}

/// Text columns have TEXT affinity, so anything bound to them other than
/// NULL or a blob reads back as text.
fn decode_text(value: ValueRef<'_>) -> Option<String> {
  match decode_json(value) {
    Value::Null => None,
    Value::String(s) => Some(s),
    other => Some(other.to_string()),
  }
}

pub fn transaction_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
  Ok(Transaction {
    id:           row.get(0)?,
    title:        decode_text(row.get_ref(1)?),
    price:        decode_json(row.get_ref(2)?),
    description:  decode_text(row.get_ref(3)?),
    category:     decode_text(row.get_ref(4)?),
    image:        decode_text(row.get_ref(5)?),
    sold:         decode_json(row.get_ref(6)?),
    date_of_sale: decode_text(row.get_ref(7)?),
  })
}
