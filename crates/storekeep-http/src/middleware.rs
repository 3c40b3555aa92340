use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::error::ApiError;
use super::state::ApiState;

/// Rejects requests that do not carry the configured admin bearer token.
pub async fn require_admin(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = match extract_token(request.headers().get(header::AUTHORIZATION)) {
        None => return ApiError::unauthorized().into_response(),
        Some(token) => match state.admin_token.as_deref() {
            Some(expected) => token_matches(expected, token),
            None => {
                warn!("Admin request refused: no admin token configured");
                false
            }
        },
    };

    if !authorized {
        return ApiError::forbidden().into_response();
    }

    next.run(request).await
}

pub async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        uri.path(),
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

/// Compares in constant time for tokens of equal length.
fn token_matches(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

fn extract_token(header: Option<&HeaderValue>) -> Option<&str> {
    let raw = header?.to_str().ok()?;
    raw.strip_prefix("Bearer ")
}
