use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::domain::otp::OtpResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid action")]
    InvalidAction,
    #[error("invalid request body: {0}")]
    MalformedRequest(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("provider request failed: {0}")]
    ProviderUnreachable(reqwest::Error),
    #[error("provider returned an unreadable reply: {0}")]
    ProviderReply(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidAction => StatusCode::BAD_REQUEST,
            RelayError::MalformedRequest(_)
            | RelayError::MissingField(_)
            | RelayError::ProviderUnreachable(_)
            | RelayError::ProviderReply(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    // reqwest embeds the request URL in its Display output, and ours carries the API key.
    fn from(err: reqwest::Error) -> Self {
        RelayError::ProviderUnreachable(err.without_url())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(OtpResponse::failure(self.to_string()))).into_response()
    }
}
