use axum::http::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("year {year} is outside the schedule ({first}..={last})")]
    UnknownYear { year: i32, first: i32, last: i32 },

    #[error("invalid growth rate override '{0}', expected YEAR=RATE")]
    InvalidGrowthOverride(String),

    #[error("failed to encode response: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}
