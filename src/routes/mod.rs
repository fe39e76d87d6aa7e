use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{middleware, state::AppState};

mod otp;

/// Every path except `/health` is handled by the OTP relay, mirroring an
/// edge-function deployment where the route itself carries no meaning.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .fallback(otp::relay_otp)
        .layer(middleware::cors::cors_layer(&state.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
