use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Answers browser preflights and stamps the allow-origin header on every
/// other response, including error responses.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(cors))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(allow_headers(cors))
}

fn allow_origin(cors: &CorsConfig) -> AllowOrigin {
    if cors.allow_origin == "*" {
        return Any.into();
    }
    match HeaderValue::from_str(&cors.allow_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(origin = %cors.allow_origin, "CORS_ALLOW_ORIGIN is not a valid header value; using *");
            Any.into()
        }
    }
}

fn allow_headers(cors: &CorsConfig) -> Vec<HeaderName> {
    let mut headers = vec![CONTENT_TYPE];
    if cors.allow_authorization {
        headers.push(AUTHORIZATION);
    }
    headers
}
