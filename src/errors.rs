use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("App is missing upstream auth token, APIs will not work")]
    AuthMissing,
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("StockSymbol {0} invalid, please pass valid symbol")]
    SymbolNotFound(String),
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Computation undefined: {0}")]
    ComputationUndefined(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthMissing | AppError::ComputationUndefined(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidDateRange(_)
            | AppError::InvalidInput(_)
            | AppError::SymbolNotFound(_)
            | AppError::UpstreamUnavailable(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            AppError::AuthMissing => (status, self.to_string()).into_response(),
            AppError::InvalidDateRange(msg) | AppError::InvalidInput(msg) => (status, msg).into_response(),
            AppError::SymbolNotFound(_) => (status, self.to_string()).into_response(),
            // A failed symbol lookup is reported as a plain bad request; details stay in the logs.
            AppError::UpstreamUnavailable(_) => (status, "Bad request").into_response(),
            AppError::ComputationUndefined(_) => (status, "Internal server error").into_response(),
        }
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::NotConfigured => AppError::AuthMissing,
            PriceProviderError::InvalidSymbol(symbol) => {
                AppError::InvalidInput(format!("'{}' is not a valid symbol", symbol))
            }
            other => AppError::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(AppError::AuthMissing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::ComputationUndefined("empty".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::InvalidDateRange("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SymbolNotFound("ZZZZ".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UpstreamUnavailable("x".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_error_conversion() {
        assert!(matches!(AppError::from(PriceProviderError::NotConfigured), AppError::AuthMissing));
        assert!(matches!(
            AppError::from(PriceProviderError::BadStatus(503)),
            AppError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(PriceProviderError::InvalidSymbol("..".into())),
            AppError::InvalidInput(_)
        ));
    }
}
