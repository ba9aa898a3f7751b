//! Salesboard is a web service for exploring a product-sales dataset.
//!
//! This library provides a JSON REST API that seeds a transactions table from
//! a remote dataset and answers month-scoped queries over it: a searchable,
//! paginated listing, summary statistics, a price histogram and a per-category
//! breakdown.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod month;
mod pagination;
mod routing;
mod seed;
mod state;
mod transaction;

pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The seed dataset could not be fetched from the upstream source.
    ///
    /// Covers transport failures as well as non-success HTTP statuses; the
    /// string carries the underlying failure message.
    #[error("could not fetch the seed dataset: {0}")]
    SeedFetch(String),

    /// The seed dataset was fetched but is not a JSON array of records.
    #[error("could not decode the seed dataset: {0}")]
    SeedDecode(String),

    /// The HTTP client for the seed source could not be constructed.
    #[error("could not build the seed HTTP client: {0}")]
    HttpClient(String),

    /// A month-scoped endpoint was called without a month query parameter.
    #[error("a month query parameter is required")]
    MissingMonth,

    /// The month query parameter is not a recognisable month name.
    #[error("\"{0}\" is not a valid month name")]
    InvalidMonth(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// A concurrently spawned query task was cancelled or panicked.
    #[error("a concurrent query task failed: {0}")]
    QueryTask(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::Sql(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingMonth | Error::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        // Clients get the raw error message as plain text.
        (status, self.to_string()).into_response()
    }
}
