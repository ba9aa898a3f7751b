//! Defines the core data model and database functions for product-sale
//! transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// A product sale recorded by the upstream storefront.
///
/// Rows are created only in bulk by [replace_all_transactions] and are never
/// updated individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction row.
    pub id: TransactionId,
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The sale price in currency units.
    pub price: f64,
    /// The free-form product category label.
    pub category: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the sale happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

/// A record in the upstream seed dataset.
///
/// Field names mirror the upstream JSON. Fields the table does not carry
/// (the upstream `id` and `image`) are ignored on deserialisation, the same
/// way the original schema dropped them on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The sale price in currency units.
    pub price: f64,
    /// The free-form product category label.
    pub category: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the sale happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Replace the entire transaction table with `records`.
///
/// The delete and the inserts run in a single SQL transaction: a failure
/// part-way through rolls back to the previous contents. Row IDs restart at
/// one on each replace, so reseeding from the same dataset yields identical
/// rows.
///
/// # Errors
/// Returns an [Error::Sql] if the replace cannot be committed.
pub fn replace_all_transactions(
    records: &[TransactionRecord],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    tx.execute("DELETE FROM \"transaction\"", ())?;
    tx.execute(
        "UPDATE sqlite_sequence SET seq = 0 WHERE name = 'transaction'",
        (),
    )?;

    // Prepare the insert statement once for reuse
    let mut stmt = tx.prepare(
        "INSERT INTO \"transaction\" (title, description, price, category, sold, date_of_sale)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for record in records {
        stmt.execute((
            &record.title,
            &record.description,
            record.price,
            &record.category,
            record.sold,
            record.date_of_sale,
        ))?;
    }

    drop(stmt);

    tx.commit()?;
    Ok(records.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::Sql] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Every read endpoint filters on the sale date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let sold = row.get(5)?;
    let date_of_sale = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        category,
        sold,
        date_of_sale,
    })
}

// ============================================================================
// TESTS
// ============================================================================
