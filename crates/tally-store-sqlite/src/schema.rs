//! SQL schema for the Tally SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Column names match the upstream JSON keys so rows serialise back out
/// under the same names.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY,
    title       TEXT,
    price       FLOAT,
    description TEXT,
    category    TEXT,
    image       TEXT,
    sold        INT,     -- 0 | 1, NULL when upstream omitted it
    dateOfSale  TEXT     -- stored verbatim, e.g. 2021-11-27T20:29:54+05:30
);
";
