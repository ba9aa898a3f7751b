//! Reqwest-backed client for the remote seed dataset.
//!
//! The client owns transport details only: the request timeout, HTTP error
//! mapping, and JSON decoding into seed records.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::{Error, transaction::TransactionRecord};

/// How long a seed fetch may take before the request is abandoned.
pub const DEFAULT_SEED_TIMEOUT: Duration = Duration::from_secs(30);

const BODY_PREVIEW_CHAR_LIMIT: usize = 160;

/// Downloads the seed dataset over HTTP.
#[derive(Debug, Clone)]
pub struct SeedClient {
    client: Client,
}

impl SeedClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch the dataset at `url` and decode it as a JSON array of records.
    ///
    /// # Errors
    /// - [Error::SeedFetch] if the source is unreachable or responds with a
    ///   non-success status.
    /// - [Error::SeedDecode] if the payload is not a JSON array of records.
    pub async fn fetch_records(&self, url: &str) -> Result<Vec<TransactionRecord>, Error> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| Error::SeedFetch(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| Error::SeedFetch(error.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, body.as_ref()));
        }

        parse_records(body.as_ref())
    }
}

fn parse_records(body: &[u8]) -> Result<Vec<TransactionRecord>, Error> {
    serde_json::from_slice(body)
        .map_err(|error| Error::SeedDecode(format!("invalid seed JSON payload: {error}")))
}

fn status_error(status: StatusCode, body: &[u8]) -> Error {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    Error::SeedFetch(message)
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact
        .chars()
        .take(BODY_PREVIEW_CHAR_LIMIT)
        .collect::<String>();

    if compact.chars().count() > BODY_PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use time::macros::datetime;

    use crate::Error;

    use super::{body_preview, parse_records, status_error};

    #[test]
    fn parses_the_upstream_dataset_shape() {
        let body = r#"[
            {
                "id": 1,
                "title": "Chair",
                "price": 150,
                "description": "A wooden dining chair",
                "category": "Furniture",
                "image": "https://example.com/chair.jpg",
                "sold": true,
                "dateOfSale": "2021-03-15T00:00:00Z"
            },
            {
                "id": 2,
                "title": "Lamp",
                "price": 45.5,
                "description": "A bedside lamp",
                "category": "Lighting",
                "image": "https://example.com/lamp.jpg",
                "sold": false,
                "dateOfSale": "2021-11-27T20:29:54+05:30"
            }
        ]"#;

        let records = parse_records(body.as_bytes()).expect("Could not decode dataset");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Chair");
        assert_eq!(records[0].price, 150.0);
        assert!(records[0].sold);
        assert_eq!(records[1].category, "Lighting");
        assert_eq!(
            records[1].date_of_sale,
            datetime!(2021-11-27 20:29:54 +5:30)
        );
    }

    #[test]
    fn rejects_payloads_that_are_not_an_array_of_records() {
        let error = parse_records(br#"{"message": "not found"}"#).expect_err("decode should fail");

        assert!(matches!(error, Error::SeedDecode(_)));
    }

    #[test]
    fn status_errors_include_a_body_preview() {
        let error = status_error(StatusCode::SERVICE_UNAVAILABLE, b"upstream  is\ndown");

        assert_eq!(
            error,
            Error::SeedFetch("status 503: upstream is down".to_owned())
        );
    }

    #[test]
    fn status_errors_without_a_body_report_the_status_alone() {
        let error = status_error(StatusCode::NOT_FOUND, b"");

        assert_eq!(error, Error::SeedFetch("status 404".to_owned()));
    }

    #[test]
    fn long_body_previews_are_truncated() {
        let body = "x".repeat(500);

        let preview = body_preview(body.as_bytes());

        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }
}
