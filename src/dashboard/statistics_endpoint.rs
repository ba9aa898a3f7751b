//! Defines the route handler that reports a month's summary statistics.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, named_params};
use serde::Serialize;
use time::Month;

use crate::{Error, month::month_param};

use super::{DashboardState, MonthQuery};

/// The summary statistics for one month of sales.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatistics {
    /// The total sale amount over the month's sold transactions.
    pub total_sales: f64,
    /// The number of sold transactions in the month.
    pub sold_items: u32,
    /// The number of unsold transactions in the month.
    pub not_sold_items: u32,
}

/// A route handler for a month's summary statistics.
pub async fn get_statistics_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthStatistics>, Error> {
    let month = month_param(query.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLock)?;
    let statistics = get_month_statistics(month, &connection)?;

    Ok(Json(statistics))
}

/// Compute the sale total and sold/unsold counts for a month.
///
/// The total and the sold count cover only transactions with `sold` set;
/// unsold transactions contribute to `not_sold_items` alone.
///
/// # Errors
/// Returns an [Error::Sql] if the aggregate query fails.
fn get_month_statistics(month: Month, connection: &Connection) -> Result<MonthStatistics, Error> {
    connection
        .query_one(
            "SELECT COALESCE(SUM(CASE WHEN sold THEN price END), 0.0), \
                    COUNT(CASE WHEN sold THEN 1 END), \
                    COUNT(CASE WHEN NOT sold THEN 1 END) \
             FROM \"transaction\" \
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month",
            named_params! { ":month": u8::from(month) },
            |row| {
                Ok(MonthStatistics {
                    total_sales: row.get(0)?,
                    sold_items: row.get(1)?,
                    not_sold_items: row.get(2)?,
                })
            },
        )
        .map_err(|error| error.into())
}
