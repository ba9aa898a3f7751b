//! The API endpoint URIs.

/// The route that reseeds the database from the remote dataset.
pub const INITIALIZE: &str = "/api/initialize";
/// The route that lists a month's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route that reports a month's summary statistics.
pub const STATISTICS: &str = "/api/statistics";
/// The route that reports a month's price histogram.
pub const BAR_CHART: &str = "/api/bar-chart";
/// The route that reports a month's category breakdown.
pub const PIE_CHART: &str = "/api/pie-chart";
