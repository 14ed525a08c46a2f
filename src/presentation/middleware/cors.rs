//! CORS Middleware Configuration

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use crate::config::CorsSettings;

/// Create CORS layer from settings.
///
/// A `*` entry in either list allows anything. Entries that are not valid
/// origins or header names are skipped with a warning.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origin = if settings.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    let headers = if settings.allowed_headers.iter().any(|h| h == "*") {
        AllowHeaders::from(Any)
    } else {
        let names: Vec<HeaderName> = settings
            .allowed_headers
            .iter()
            .filter_map(|h| match h.parse() {
                Ok(name) => Some(name),
                Err(_) => {
                    tracing::warn!(header = %h, "ignoring invalid CORS header name");
                    None
                }
            })
            .collect();
        AllowHeaders::list(names)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_headers(headers)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers([header::LOCATION])
        .max_age(std::time::Duration::from_secs(3600))
}
