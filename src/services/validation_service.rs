use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, error, warn};

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{DateRange, DATE_MAX, DATE_MIN};

/// Date-only layouts accepted for `FromDate`/`ToDate`, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Layouts carrying a time of day; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

pub fn validate_auth_configured(provider: &dyn PriceProvider) -> Result<(), AppError> {
    if provider.is_configured() {
        return Ok(());
    }
    error!("Upstream auth token missing, rejecting request");
    Err(AppError::AuthMissing)
}

/// Parses a user-supplied date. Month names are English regardless of host locale.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Omitted or blank bounds fall back to the unbounded defaults.
pub fn parse_and_normalize_dates(
    from_raw: Option<&str>,
    to_raw: Option<&str>,
) -> Result<DateRange, AppError> {
    let from_raw = non_blank(from_raw).unwrap_or(DATE_MIN);
    let to_raw = non_blank(to_raw).unwrap_or(DATE_MAX);

    let from = parse_date(from_raw).ok_or_else(|| {
        warn!(from_raw, "Unparseable FromDate");
        AppError::InvalidDateRange(
            "Could not parse FromDate value, recommended format 'yyyy-MM-dd' or 'MM/dd/yyyy'".to_string(),
        )
    })?;
    let to = parse_date(to_raw).ok_or_else(|| {
        warn!(to_raw, "Unparseable ToDate");
        AppError::InvalidDateRange(
            "Could not parse ToDate value, recommended format 'yyyy-MM-dd' or 'MM/dd/yyyy'".to_string(),
        )
    })?;

    let range = DateRange::new(from, to).ok_or_else(|| {
        warn!(%from, %to, "Inverted date range");
        AppError::InvalidDateRange("FromDate is greater than ToDate, range invalid".to_string())
    })?;

    debug!(from = %range.from_param(), to = %range.to_param(), "Normalized date range");
    Ok(range)
}

/// Trims the symbol and rejects one that cannot name a ticker before any network call.
pub fn require_symbol<'a>(field: &str, raw: &'a str) -> Result<&'a str, AppError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    // "." and ".." would be collapsed out of the upstream URL path.
    if !symbol.chars().any(char::is_alphanumeric) {
        warn!(symbol, "Symbol has no alphanumeric characters");
        return Err(AppError::InvalidInput(format!("{} must contain a letter or digit", field)));
    }
    Ok(symbol)
}

/// Confirms the upstream knows `symbol` by probing its company info.
pub async fn validate_symbol_exists(provider: &dyn PriceProvider, symbol: &str) -> Result<(), AppError> {
    let body = provider.fetch_company_info(symbol).await.map_err(|e| {
        warn!(symbol, error = %e, "Company info lookup failed");
        AppError::from(e)
    })?;

    if body.replace("[]", "").trim().is_empty() {
        warn!(symbol, "Symbol not found upstream");
        return Err(AppError::SymbolNotFound(symbol.to_string()));
    }
    Ok(())
}

/// Checks both symbols concurrently. The stock's failure wins when both fail.
pub async fn validate_symbol_pair(
    provider: &dyn PriceProvider,
    stock: &str,
    benchmark: &str,
) -> Result<(), AppError> {
    let (stock_check, benchmark_check) = tokio::join!(
        validate_symbol_exists(provider, stock),
        validate_symbol_exists(provider, benchmark),
    );
    stock_check?;
    benchmark_check
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}
