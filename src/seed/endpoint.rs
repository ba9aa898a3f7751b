//! Defines the route handler that reseeds the database from the remote
//! dataset.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;

use crate::{AppState, Error, seed::SeedClient, transaction::replace_all_transactions};

/// The state needed to reseed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection that receives the fetched records.
    db_connection: Arc<Mutex<Connection>>,
    /// The URL of the remote seed dataset.
    seed_url: String,
    /// The HTTP client used to fetch the dataset.
    seed_client: SeedClient,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_url: state.seed_url.clone(),
            seed_client: state.seed_client.clone(),
        }
    }
}

/// A route handler that replaces the transaction table with the remote
/// dataset.
///
/// The fetch completes before the database lock is taken, and the replace
/// itself runs in one SQL transaction, so a failure at any point leaves the
/// previous contents in place.
pub async fn seed_database_endpoint(State(state): State<SeedState>) -> Result<String, Error> {
    let records = state.seed_client.fetch_records(&state.seed_url).await?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLock)?;
    let inserted = replace_all_transactions(&records, &connection)?;

    tracing::info!("replaced the transaction table with {inserted} seed records");

    Ok("Database initialized successfully".to_owned())
}
