use crate::error::ProfileError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::dto::ErrorBody;

/// API-layer error type
#[derive(Debug)]
pub enum ApiError {
    /// 400 - Missing or blank request field
    BadRequest(String),

    /// 502 - The model call failed or returned nothing usable
    BadGateway(String),

    /// 503 - No model credentials on the server
    Unconfigured(String),

    /// 500 - Anything else
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Unconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::BadRequest(msg)
            | Self::BadGateway(msg)
            | Self::Unconfigured(msg)
            | Self::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error, "Request failed");
        }

        (status, Json(ErrorBody { ok: false, error })).into_response()
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UnconfiguredService(msg) => Self::Unconfigured(msg),
            ProfileError::InvalidQuery(msg) => Self::BadRequest(msg),
            ProfileError::TransportError(_) | ProfileError::EmptyResponse => {
                Self::BadGateway(err.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<agent_llm::LLMError> for ApiError {
    fn from(err: agent_llm::LLMError) -> Self {
        ProfileError::from(err).into()
    }
}
