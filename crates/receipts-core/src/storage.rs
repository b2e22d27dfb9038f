//! SQLite-backed receipt store with (vendor, date, amount) deduplication.

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::models::receipt::{Category, NewReceipt, StoredReceipt};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Receipt store on a single SQLite connection.
pub struct ReceiptStore {
    conn: Connection,
}

impl ReceiptStore {
    /// Open (or create) a store at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    /// Open a throwaway store in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS receipts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vendor TEXT NOT NULL,
                date TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_date ON receipts (date)",
            [],
        )?;

        info!("Database initialized successfully");
        Ok(Self { conn })
    }

    /// Whether a receipt with the same vendor, date and amount is stored.
    pub fn receipt_exists(&self, vendor: &str, date: NaiveDate, amount: Decimal) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM receipts WHERE vendor = ?1 AND date = ?2 AND amount = ?3",
            params![vendor, date, amount_key(amount)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Store a receipt unless an identical (vendor, date, amount) row exists.
    ///
    /// Returns `true` if a row was inserted, `false` for a duplicate.
    pub fn add_receipt(&self, receipt: &NewReceipt) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO receipts (vendor, date, amount, category)
             SELECT ?1, ?2, ?3, ?4
             WHERE NOT EXISTS (
                 SELECT 1 FROM receipts WHERE vendor = ?1 AND date = ?2 AND amount = ?3
             )",
            params![
                receipt.vendor,
                receipt.date,
                amount_key(receipt.amount),
                receipt.category.label()
            ],
        )?;

        if inserted == 0 {
            warn!(
                "Duplicate skipped: {}, {}, {}",
                receipt.vendor, receipt.date, receipt.amount
            );
            return Ok(false);
        }

        info!(
            "Receipt added to DB: {}, {}, {}",
            receipt.vendor, receipt.amount, receipt.date
        );
        Ok(true)
    }

    /// All receipts, newest first.
    pub fn all_receipts(&self) -> Result<Vec<StoredReceipt>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, vendor, date, amount, category FROM receipts ORDER BY date DESC, id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RawReceipt {
                    id: row.get(0)?,
                    vendor: row.get(1)?,
                    date: row.get(2)?,
                    amount: row.get(3)?,
                    category: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawReceipt::into_receipt).collect()
    }

    /// Number of stored receipts.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM receipts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every stored receipt. Returns the number of rows removed.
    pub fn delete_all(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM receipts", [])?;
        warn!("Deleted all receipts ({} rows)", deleted);
        Ok(deleted)
    }
}

/// Canonical text form of an amount; `120.50` and `120.5` share a key.
fn amount_key(amount: Decimal) -> String {
    amount.normalize().to_string()
}

struct RawReceipt {
    id: i64,
    vendor: String,
    date: NaiveDate,
    amount: String,
    category: Option<String>,
}

impl RawReceipt {
    fn into_receipt(self) -> Result<StoredReceipt> {
        let amount = Decimal::from_str(&self.amount).map_err(|e| StorageError::CorruptRow {
            id: self.id,
            reason: format!("amount {:?}: {}", self.amount, e),
        })?;

        let category = match self.category.as_deref() {
            None => Category::Uncategorized,
            Some(label) => Category::from_label(label).ok_or_else(|| StorageError::CorruptRow {
                id: self.id,
                reason: format!("unknown category {:?}", label),
            })?,
        };

        Ok(StoredReceipt {
            id: self.id,
            vendor: self.vendor,
            date: self.date,
            amount,
            category,
        })
    }
}
