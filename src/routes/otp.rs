use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::RelayError;
use crate::relay;
use crate::state::AppState;

pub(super) async fn relay_otp(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    // Browser preflights are answered by the CORS layer; an OPTIONS without
    // Access-Control-Request-Method still gets an empty acknowledgement.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    match relay::handle(&state.provider, &body).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            match &err {
                RelayError::InvalidAction => warn!(%method, "rejected request with invalid action"),
                RelayError::MalformedRequest(_) | RelayError::MissingField(_) => {
                    warn!(%method, error = %err, "malformed relay request")
                }
                RelayError::ProviderUnreachable(_) | RelayError::ProviderReply(_) => {
                    error!(error = %err, "provider call failed")
                }
            }
            err.into_response()
        }
    }
}
