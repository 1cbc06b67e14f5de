use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;
use warehouse::source::SourceError;

use crate::{config::ConfigError, filters::FilterError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] FilterError),

    #[error("Data source unavailable: {0}")]
    Source(#[from] SourceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            AppError::Source { .. } => {
                warn!("{self}");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// Anything that stops the server from coming up.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use chrono::NaiveDate;
    use warehouse::{Collection, source::SourceError};

    use super::AppError;
    use crate::filters::FilterError;

    #[test]
    fn test_status_codes() {
        let inverted = FilterError::InvertedRange {
            start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let unavailable = SourceError::Fetch {
            collection: Collection::Orders,
            source: std::io::Error::other("cluster down").into(),
        };

        assert_eq!(
            AppError::from(inverted).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(unavailable).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
