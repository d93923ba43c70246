use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The web client runs on its own origin and sends bearer tokens on admin
/// calls.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}
