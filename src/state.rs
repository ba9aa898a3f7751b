//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    pagination::PaginationConfig,
    seed::{DEFAULT_SEED_TIMEOUT, SeedClient},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The URL of the remote seed dataset.
    pub seed_url: String,

    /// The HTTP client used to fetch the seed dataset.
    pub seed_client: SeedClient,

    /// The directory holding the static frontend bundle.
    pub static_dir: String,

    /// The config that controls how listing results are paged.
    pub pagination_config: PaginationConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the table for the
    /// transaction records.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the seed
    /// HTTP client cannot be constructed.
    pub fn new(
        db_connection: Connection,
        seed_url: &str,
        static_dir: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let seed_client = SeedClient::new(DEFAULT_SEED_TIMEOUT)
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            seed_url: seed_url.to_owned(),
            seed_client,
            static_dir: static_dir.to_owned(),
            pagination_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
