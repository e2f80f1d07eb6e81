//! Request correlation and last-resort error handling.
//!
//! [`exception_handler`] wraps a router so that every failure reaches the
//! client as an [`ErrorResponse`] JSON body:
//!
//! - a panic in a handler becomes `500` with the generic fatal message,
//! - a plain-text rejection from an extractor (bad JSON, bad path segment)
//!   keeps its status but gets a JSON body,
//! - any other `5xx` body is replaced by the fatal message.
//!
//! Each request also gets an `x-request-id` that is logged with the response.

use std::any::Any;
use std::time::Instant;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use uuid::Uuid;

use crate::errors::{ErrorResponse, FATAL_ERROR};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Largest rejection body read back when rewriting it as JSON.
const MAX_REJECTION_BODY: usize = 64 * 1024;

/// Request id stored in the request extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Wrap `router` with request ids, response logging and JSON error bodies.
pub fn exception_handler(router: Router) -> Router {
    router
        .layer(middleware::from_fn(handle_errors))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(request_id))
}

/// Assign a request id, or reuse the caller's, and echo it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);
    request.extensions_mut().insert(RequestId(id.clone()));

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        tracing::error!(request_id = %id, %method, %path, status = status.as_u16(), duration_ms, "request failed");
    } else if status.is_client_error() {
        tracing::debug!(request_id = %id, %method, %path, status = status.as_u16(), duration_ms, "request rejected");
    } else {
        tracing::info!(request_id = %id, %method, %path, status = status.as_u16(), duration_ms, "request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Give error responses that are not JSON yet an [`ErrorResponse`] body.
pub async fn handle_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let body = if status.is_server_error() {
        ErrorResponse::fatal()
    } else {
        let (_, body) = response.into_parts();
        let message = match to_bytes(body, MAX_REJECTION_BODY).await {
            Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
            _ => status
                .canonical_reason()
                .unwrap_or(FATAL_ERROR)
                .to_string(),
        };
        ErrorResponse {
            error: message,
            details: None,
        }
    };
    (status, Json(body)).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

#[allow(clippy::needless_pass_by_value)]
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(details, "handler panicked");

    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::fatal()),
    )
        .into_response()
}
