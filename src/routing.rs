//! Application router configuration wiring the API endpoints and the static
//! frontend fallback.

use std::path::PathBuf;

use axum::{Router, routing::get};
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    AppState,
    dashboard::{get_bar_chart_endpoint, get_pie_chart_endpoint, get_statistics_endpoint},
    endpoints,
    seed::seed_database_endpoint,
    transaction::list_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// Requests outside the API fall back to the static frontend bundle; paths
/// that match no file serve its `index.html`.
pub fn build_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.static_dir);
    let index_file = static_dir.join("index.html");

    Router::new()
        .route(endpoints::INITIALIZE, get(seed_database_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .fallback_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)))
        .with_state(state)
}
