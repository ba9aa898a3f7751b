//! Month-name parsing for the month-scoped endpoints.
//!
//! Every listing and aggregation endpoint filters by calendar month only,
//! ignoring the year. The month arrives as a name in the query string.

use time::Month;

use crate::Error;

/// Resolve the `month` query parameter shared by the month-scoped endpoints.
///
/// # Errors
/// - [Error::MissingMonth] if the parameter is absent or blank.
/// - [Error::InvalidMonth] if the parameter is not a month name.
pub fn month_param(month: Option<&str>) -> Result<Month, Error> {
    match month {
        None => Err(Error::MissingMonth),
        Some(name) if name.trim().is_empty() => Err(Error::MissingMonth),
        Some(name) => parse_month_name(name),
    }
}

/// Parse an English month name, given in full or as a three-letter
/// abbreviation, ignoring case and surrounding whitespace.
///
/// # Errors
/// Returns an [Error::InvalidMonth] if `name` is not recognised.
pub fn parse_month_name(name: &str) -> Result<Month, Error> {
    let month = match name.trim().to_ascii_lowercase().as_str() {
        "january" | "jan" => Month::January,
        "february" | "feb" => Month::February,
        "march" | "mar" => Month::March,
        "april" | "apr" => Month::April,
        "may" => Month::May,
        "june" | "jun" => Month::June,
        "july" | "jul" => Month::July,
        "august" | "aug" => Month::August,
        "september" | "sep" => Month::September,
        "october" | "oct" => Month::October,
        "november" | "nov" => Month::November,
        "december" | "dec" => Month::December,
        _ => return Err(Error::InvalidMonth(name.to_owned())),
    };

    Ok(month)
}
