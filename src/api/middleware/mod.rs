//! Request logging and HTTP metrics middleware

pub mod logging;
pub mod metrics;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;

use axum::{body::Body, extract::MatchedPath, http::Request};

/// Route pattern when matched, raw path otherwise
pub(crate) fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
