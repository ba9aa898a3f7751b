//! Defines the route handler that reports a month's price histogram.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, named_params};
use serde::Serialize;
use time::Month;

use crate::{Error, month::month_param};

use super::{DashboardState, MonthQuery};

/// A fixed price interval of the histogram.
#[derive(Debug, Clone, Copy)]
struct PriceBucket {
    /// The label reported to the client, e.g. "101-200".
    label: &'static str,
    /// The lowest price included in the bucket.
    min: f64,
    /// The highest price included in the bucket. `None` leaves the bucket
    /// unbounded above.
    max: Option<f64>,
}

/// The ten price buckets, in the order they are reported.
const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket { label: "0-100", min: 0.0, max: Some(100.0) },
    PriceBucket { label: "101-200", min: 101.0, max: Some(200.0) },
    PriceBucket { label: "201-300", min: 201.0, max: Some(300.0) },
    PriceBucket { label: "301-400", min: 301.0, max: Some(400.0) },
    PriceBucket { label: "401-500", min: 401.0, max: Some(500.0) },
    PriceBucket { label: "501-600", min: 501.0, max: Some(600.0) },
    PriceBucket { label: "601-700", min: 601.0, max: Some(700.0) },
    PriceBucket { label: "701-800", min: 701.0, max: Some(800.0) },
    PriceBucket { label: "801-900", min: 801.0, max: Some(900.0) },
    PriceBucket { label: "901-above", min: 901.0, max: None },
];

/// One bar of the price histogram.
#[derive(Debug, PartialEq, Serialize)]
pub struct BarChartEntry {
    /// The bucket label, e.g. "101-200".
    pub range: &'static str,
    /// The number of the month's transactions priced within the bucket.
    pub count: u32,
}

/// A route handler for a month's price histogram.
///
/// Always responds with exactly ten entries in bucket order, zero counts
/// included. The ten bucket counts are issued as concurrent tasks; if any
/// one of them fails, the whole request fails with no partial result.
pub async fn get_bar_chart_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BarChartEntry>>, Error> {
    let month = month_param(query.month.as_deref())?;

    let handles: Vec<_> = PRICE_BUCKETS
        .iter()
        .map(|&bucket| {
            let db_connection = state.db_connection.clone();
            tokio::spawn(async move {
                let connection = db_connection.lock().map_err(|_| Error::DatabaseLock)?;
                count_transactions_in_bucket(month, bucket, &connection)
            })
        })
        .collect();

    let mut chart = Vec::with_capacity(PRICE_BUCKETS.len());
    for (bucket, handle) in PRICE_BUCKETS.iter().zip(handles) {
        let count = handle
            .await
            .map_err(|error| Error::QueryTask(error.to_string()))??;
        chart.push(BarChartEntry {
            range: bucket.label,
            count,
        });
    }

    Ok(Json(chart))
}

/// Count a month's transactions whose price falls within `bucket`.
///
/// # Errors
/// Returns an [Error::Sql] if the count query fails.
fn count_transactions_in_bucket(
    month: Month,
    bucket: PriceBucket,
    connection: &Connection,
) -> Result<u32, Error> {
    let result = match bucket.max {
        Some(max) => connection.query_one(
            "SELECT COUNT(id) FROM \"transaction\" \
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month \
               AND price BETWEEN :min AND :max",
            named_params! { ":month": u8::from(month), ":min": bucket.min, ":max": max },
            |row| row.get(0),
        ),
        None => connection.query_one(
            "SELECT COUNT(id) FROM \"transaction\" \
             WHERE CAST(strftime('%m', date_of_sale) AS INTEGER) = :month \
               AND price >= :min",
            named_params! { ":month": u8::from(month), ":min": bucket.min },
            |row| row.get(0),
        ),
    };

    result.map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        dashboard::{DashboardState, MonthQuery},
        db::initialize,
        transaction::{TransactionRecord, replace_all_transactions},
    };

    use super::get_bar_chart_endpoint;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn record(price: f64, date_of_sale: time::OffsetDateTime) -> TransactionRecord {
        TransactionRecord {
            title: "Item".to_owned(),
            description: String::new(),
            price,
            category: "Misc".to_owned(),
            sold: true,
            date_of_sale,
        }
    }

    fn get_march_state(records: &[TransactionRecord]) -> DashboardState {
        let conn = get_test_connection();
        replace_all_transactions(records, &conn).expect("Could not seed records");
        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn get_march_chart(state: DashboardState) -> Vec<(&'static str, u32)> {
        let query = MonthQuery {
            month: Some("March".to_owned()),
        };
        let Json(chart) = get_bar_chart_endpoint(State(state), Query(query))
            .await
            .expect("Could not get bar chart");

        chart.into_iter().map(|entry| (entry.range, entry.count)).collect()
    }

    #[tokio::test]
    async fn empty_store_yields_ten_zero_buckets() {
        let state = get_march_state(&[]);

        let got = get_march_chart(state).await;

        assert_eq!(got.len(), 10);
        assert!(got.iter().all(|(_, count)| *count == 0));
        let labels: Vec<&str> = got.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec![
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901-above",
            ],
        );
    }

    #[tokio::test]
    async fn counts_land_in_the_matching_bucket() {
        let state = get_march_state(&[record(150.0, datetime!(2021-03-15 0:00 UTC))]);

        let got = get_march_chart(state).await;

        for (label, count) in got {
            let want = if label == "101-200" { 1 } else { 0 };
            assert_eq!(count, want, "bucket {label} should have count {want}");
        }
    }

    #[tokio::test]
    async fn the_last_bucket_is_unbounded_above() {
        let state = get_march_state(&[
            record(901.0, datetime!(2021-03-01 0:00 UTC)),
            record(12_000.0, datetime!(2021-03-02 0:00 UTC)),
            // Different month: must not be counted.
            record(950.0, datetime!(2021-06-01 0:00 UTC)),
        ]);

        let got = get_march_chart(state).await;

        assert_eq!(got[9], ("901-above", 2));
    }

    #[tokio::test]
    async fn bucket_bounds_are_inclusive() {
        let state = get_march_state(&[
            record(0.0, datetime!(2021-03-01 0:00 UTC)),
            record(100.0, datetime!(2021-03-02 0:00 UTC)),
            record(101.0, datetime!(2021-03-03 0:00 UTC)),
            record(200.0, datetime!(2021-03-04 0:00 UTC)),
        ]);

        let got = get_march_chart(state).await;

        assert_eq!(got[0], ("0-100", 2));
        assert_eq!(got[1], ("101-200", 2));
    }

    #[tokio::test]
    async fn endpoint_requires_a_month() {
        let state = get_march_state(&[]);

        let result = get_bar_chart_endpoint(State(state), Query(MonthQuery::default())).await;

        assert_eq!(result.unwrap_err(), Error::MissingMonth);
    }
}
