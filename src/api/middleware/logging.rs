//! Request/response logging middleware

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{info, warn};

use super::route_path;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log every request with its id, status and latency
///
/// `TraceLayer` already opens the request span, so no span is created here.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = route_path(&request);
    let request_id = extract_request_id(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        content_length = content_length(&request),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn content_length(request: &Request<Body>) -> u64 {
    request
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/predict/yield");
        if let Some(id) = header {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_request_id_taken_from_header() {
        assert_eq!(extract_request_id(&request(Some("abc-123"))), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let id = extract_request_id(&request(None));
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_content_length_defaults_to_zero() {
        assert_eq!(content_length(&request(None)), 0);

        let sized = Request::builder()
            .header("content-length", "2048")
            .body(Body::empty())
            .unwrap();
        assert_eq!(content_length(&sized), 2048);
    }
}
