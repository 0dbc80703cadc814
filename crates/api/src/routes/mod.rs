//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Plain-text acknowledgement
//! GET  /health                 - Liveness check
//! GET  /giftcard?email=<addr>  - Active gift cards and total balance
//! ```

pub mod gift_cards;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .route("/giftcard", get(gift_cards::lookup))
}
