use axum::http::StatusCode;
use thiserror::Error;

/// Every failure a backend call can produce, normalised to one display message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Parse(String),

    #[error("failed to save report: {0}")]
    Save(#[from] std::io::Error),
}

impl ApiError {
    /// Message for the non-2xx case, preferring what the server said.
    pub fn from_status(status: u16, error: Option<String>, details: Option<String>) -> Self {
        let message = error
            .filter(|value| !value.trim().is_empty())
            .or_else(|| details.filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let status = match err {
            ApiError::Save(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
