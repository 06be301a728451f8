use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::amount::Amount;
use crate::change::Sale;

pub const DEFAULT_CURRENCY: &str = "EUR";

/// One stored sale
/// Amounts live in the table as integer cents
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,

    /// Stable identity (UUID), independent of the row id
    pub tx_uuid: String,

    pub timestamp: DateTime<Utc>,

    pub total: Amount,
    pub received: Amount,
    pub change: Amount,

    pub currency: String,
}

/// CSV export row - amounts written as "7.50"
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "UUID")]
    tx_uuid: &'a str,
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Total")]
    total: String,
    #[serde(rename = "Received")]
    received: String,
    #[serde(rename = "Change")]
    change: String,
    #[serde(rename = "Currency")]
    currency: &'a str,
}

impl<'a> From<&'a TransactionRecord> for CsvRow<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        CsvRow {
            id: record.id,
            tx_uuid: &record.tx_uuid,
            timestamp: record.timestamp.to_rfc3339(),
            total: record.total.to_string(),
            received: record.received.to_string(),
            change: record.change.to_string(),
            currency: &record.currency,
        }
    }
}

/// Open (or create) the history database and make sure the schema exists
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tx_uuid TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            total_cents INTEGER NOT NULL,
            received_cents INTEGER NOT NULL,
            change_cents INTEGER NOT NULL,
            currency TEXT NOT NULL DEFAULT 'EUR'
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp)",
        [],
    )?;

    Ok(())
}

/// Append a sale to the history
pub fn insert_record(conn: &Connection, sale: &Sale) -> Result<TransactionRecord> {
    let tx_uuid = uuid::Uuid::new_v4().to_string();
    let timestamp = Utc::now();

    conn.execute(
        "INSERT INTO history (
            tx_uuid, timestamp, total_cents, received_cents, change_cents, currency
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx_uuid,
            timestamp.to_rfc3339(),
            sale.total.cents(),
            sale.received.cents(),
            sale.change.cents(),
            DEFAULT_CURRENCY,
        ],
    )
    .context("Failed to insert history record")?;

    let record = TransactionRecord {
        id: conn.last_insert_rowid(),
        tx_uuid,
        timestamp,
        total: sale.total,
        received: sale.received,
        change: sale.change,
        currency: DEFAULT_CURRENCY.to_string(),
    };

    tracing::info!(
        id = record.id,
        total = %record.total,
        received = %record.received,
        change = %record.change,
        "history record stored"
    );

    Ok(record)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    let timestamp_str: String = row.get(2)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(TransactionRecord {
        id: row.get(0)?,
        tx_uuid: row.get(1)?,
        timestamp,
        total: Amount::from_cents(row.get(3)?),
        received: Amount::from_cents(row.get(4)?),
        change: Amount::from_cents(row.get(5)?),
        currency: row.get(6)?,
    })
}

/// Full history, newest first
pub fn get_history(conn: &Connection) -> Result<Vec<TransactionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, tx_uuid, timestamp, total_cents, received_cents, change_cents, currency
         FROM history
         ORDER BY timestamp DESC, id DESC",
    )?;

    let records = stmt
        .query_map([], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;

    Ok(count)
}

/// Delete every record, returning how many were removed
pub fn clear_history(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM history", [])?;
    tracing::info!(removed, "history cleared");
    Ok(removed)
}

/// Write the history (newest first) to a CSV file
pub fn export_history_csv(conn: &Connection, csv_path: &Path) -> Result<usize> {
    let records = get_history(conn)?;

    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create CSV file: {}", csv_path.display()))?;

    for record in &records {
        writer
            .serialize(CsvRow::from(record))
            .context("Failed to write CSV row")?;
    }
    writer.flush()?;

    Ok(records.len())
}
