//! Month-scoped dashboard aggregations.
//!
//! This module contains the route handlers for the dashboard's summary
//! statistics, price histogram and category breakdown.

mod bar_chart_endpoint;
mod pie_chart_endpoint;
mod statistics_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Deserialize;

use crate::AppState;

pub use bar_chart_endpoint::get_bar_chart_endpoint;
pub use pie_chart_endpoint::get_pie_chart_endpoint;
pub use statistics_endpoint::get_statistics_endpoint;

/// The state needed by the dashboard aggregation handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard aggregation endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month name to aggregate over, e.g. "March" or "mar".
    pub month: Option<String>,
}
