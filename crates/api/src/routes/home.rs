//! Root and liveness endpoints.

/// Plain-text acknowledgement that the service is up.
pub async fn index() -> &'static str {
    "Gift Card API Running ✔"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Shopify is not contacted.
pub async fn health() -> &'static str {
    "ok"
}
