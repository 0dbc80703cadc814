//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS (permissive)
//! 3. `TraceLayer` (`http_request` span)
//! 4. Request ID (recorded on the span opened by `TraceLayer`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
