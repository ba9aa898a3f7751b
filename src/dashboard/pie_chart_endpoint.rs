//! Defines the route handler that reports a month's category breakdown.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, named_params};
use serde::Serialize;
use time::Month;

use crate::{Error, month::month_param};

use super::{DashboardState, MonthQuery};

/// One slice of the category breakdown.
#[derive(Debug, PartialEq, Serialize)]
pub struct PieChartEntry {
    /// The category label the count applies to.
    ///
    /// Reported as `_id` on the wire, matching the grouping key of the
    /// original API.
    #[serde(rename = "_id")]
    pub category: String,
    /// The number of the month's transactions in the category.
    pub count: u32,
}

/// A route handler for a month's per-category transaction counts.
///
/// One entry per distinct category observed in the month; the order of the
/// entries is whatever the grouping yields.
pub async fn get_pie_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PieChartEntry>>, Error> {
    let month = month_param(query.month.as_deref())?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLock)?;
    let chart = count_transactions_by_category(month, &connection)?;

    Ok(Json(chart))
}

/// Count a month's transactions grouped by their category label.
///
/// # Errors
/// Returns an [Error::Sql] if the grouping query fails.
fn count_transactions_by_category(
    month: Month,
    connection: &Connection,
) -> Result<Vec<PieChartEntry>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(id) FROM \"transaction\" \
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month \
             GROUP BY category",
        )?
        .query_map(named_params! { ":month": u8::from(month) }, |row| {
            Ok(PieChartEntry {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(Error::Sql))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use time::{Month, macros::datetime};

    use crate::{
        Error,
        dashboard::{DashboardState, MonthQuery},
        db::initialize,
        transaction::{TransactionRecord, replace_all_transactions},
    };

    use super::{PieChartEntry, count_transactions_by_category, get_pie_chart_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn record(category: &str, date_of_sale: time::OffsetDateTime) -> TransactionRecord {
        TransactionRecord {
            title: "Item".to_owned(),
            description: String::new(),
            price: 10.0,
            category: category.to_owned(),
            sold: true,
            date_of_sale,
        }
    }

    #[test]
    fn groups_the_month_by_category() {
        let conn = get_test_connection();
        let records = vec![
            record("Furniture", datetime!(2021-03-15 0:00 UTC)),
            record("Furniture", datetime!(2022-03-02 0:00 UTC)),
            record("Lighting", datetime!(2021-03-20 0:00 UTC)),
            // Different month: must not be counted.
            record("Furniture", datetime!(2021-05-01 0:00 UTC)),
        ];
        replace_all_transactions(&records, &conn).unwrap();

        let mut got =
            count_transactions_by_category(Month::March, &conn).expect("Could not get counts");
        got.sort_by(|a, b| a.category.cmp(&b.category));

        let total: u32 = got.iter().map(|entry| entry.count).sum();
        assert_eq!(total, 3, "counts should cover every March transaction");
        assert_eq!(
            got,
            vec![
                PieChartEntry {
                    category: "Furniture".to_owned(),
                    count: 2,
                },
                PieChartEntry {
                    category: "Lighting".to_owned(),
                    count: 1,
                },
            ],
        );
    }

    #[test]
    fn empty_month_yields_no_entries() {
        let conn = get_test_connection();
        replace_all_transactions(
            &[record("Furniture", datetime!(2021-05-01 0:00 UTC))],
            &conn,
        )
        .unwrap();

        let got =
            count_transactions_by_category(Month::March, &conn).expect("Could not get counts");

        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn endpoint_reports_the_requested_month() {
        let conn = get_test_connection();
        replace_all_transactions(
            &[record("Furniture", datetime!(2021-03-15 0:00 UTC))],
            &conn,
        )
        .unwrap();
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let query = MonthQuery {
            month: Some("March".to_owned()),
        };

        let Json(got) = get_pie_chart_endpoint(State(state), Query(query))
            .await
            .expect("Could not get pie chart");

        assert_eq!(
            got,
            vec![PieChartEntry {
                category: "Furniture".to_owned(),
                count: 1,
            }],
        );
    }

    #[tokio::test]
    async fn endpoint_rejects_unknown_month_names() {
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let query = MonthQuery {
            month: Some("Janutober".to_owned()),
        };

        let result = get_pie_chart_endpoint(State(state), Query(query)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidMonth("Janutober".to_owned())
        );
    }
}
