//! Request correlation IDs.
//!
//! An inbound `x-request-id` (set by a proxy or the caller) is reused when it
//! is short printable ASCII; otherwise a UUID v4 is generated. The ID is
//! recorded on the `http_request` span, tagged on the Sentry scope and echoed
//! back in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INBOUND_LEN: usize = 128;

fn inbound_id(request: &Request) -> Option<String> {
    let raw = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();

    let acceptable = !raw.is_empty()
        && raw.len() <= MAX_INBOUND_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());

    acceptable.then(|| raw.to_string())
}

/// Attach a request ID to the request's span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = inbound_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
