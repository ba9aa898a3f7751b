//! Product-sale transactions.
//!
//! This module contains everything related to the transaction records:
//! - The `Transaction` model and the `TransactionRecord` seed shape
//! - Database functions for creating, replacing and querying records
//! - The route handler for the month-scoped transaction listing

mod core;
mod list_endpoint;

pub use core::{
    Transaction, TransactionRecord, create_transaction_table, map_transaction_row,
    replace_all_transactions,
};
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub use core::count_transactions;
