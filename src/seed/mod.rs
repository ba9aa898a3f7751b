//! Bulk database seeding from the remote dataset.
//!
//! This module contains:
//! - The HTTP client that downloads and decodes the seed dataset
//! - The route handler that replaces the transaction table with it

mod client;
mod endpoint;

pub use client::{DEFAULT_SEED_TIMEOUT, SeedClient};
pub use endpoint::seed_database_endpoint;
