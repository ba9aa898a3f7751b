//! Defines the route handler that lists a month's transactions with search
//! and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::{Connection, named_params};
use serde::Deserialize;
use time::Month;

use crate::{
    AppState, Error,
    month::month_param,
    pagination::PaginationConfig,
    transaction::{Transaction, map_transaction_row},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
    /// Defaults for the page number and page size.
    pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters accepted by the transaction listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// The month name to filter by, e.g. "March" or "mar".
    pub month: Option<String>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The maximum number of transactions to return.
    #[serde(rename = "perPage")]
    pub per_page: Option<u64>,
    /// Case-insensitive text to match against the title, description or price.
    pub search: Option<String>,
}

/// A route handler for listing one page of a month's transactions.
///
/// Responds with a JSON array of the matching records, which may be empty.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let month = month_param(query.month.as_deref())?;
    // Page numbers start at 1.
    let page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let per_page = query
        .per_page
        .unwrap_or(state.pagination_config.default_page_size);
    let search = query.search.unwrap_or_default();

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLock)?;

    let transactions = list_transactions_in_month(
        month,
        &search,
        per_page,
        (page - 1) * per_page,
        &connection,
    )?;

    Ok(Json(transactions))
}

/// Get one page of a month's transactions, optionally filtered by a search
/// term.
///
/// The month filter is year-agnostic: a row matches when the month-of-year of
/// its sale date equals `month`. The search term matches case-insensitively
/// against the title, the description, or the decimal string form of the
/// price. Rows come back in storage (row id) order so pages stay stable.
///
/// # Errors
/// Returns an [Error::Sql] if the query fails.
fn list_transactions_in_month(
    month: Month,
    search: &str,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, description, price, category, sold, date_of_sale \
             FROM \"transaction\" \
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month \
               AND (:search = '' \
                    OR title LIKE '%' || :search || '%' \
                    OR description LIKE '%' || :search || '%' \
                    OR CAST(price AS TEXT) LIKE '%' || :search || '%') \
             ORDER BY id \
             LIMIT :limit OFFSET :offset",
        )?
        .query_map(
            named_params! {
                ":month": u8::from(month),
                ":search": search,
                ":limit": limit as i64,
                ":offset": offset as i64,
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::Sql))
        .collect()
}
