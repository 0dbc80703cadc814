//! Gift card balance lookup route.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use giftcard_lookup_core::{Email, GiftCardSummary};
use tracing::instrument;
use url::form_urlencoded;

use crate::error::Result;
use crate::state::AppState;

/// Look up the active gift cards and total balance for an email address.
///
/// The query string is read leniently: only the first `email` parameter
/// counts and anything else is ignored, so a repeated or malformed query
/// still gets a JSON answer.
#[instrument(skip_all)]
pub async fn lookup(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<GiftCardSummary>> {
    let raw = email_param(query.as_deref());
    let email = Email::normalize(raw.as_deref())?;
    let summary = state.lookup().lookup(&email, state.now()).await?;

    Ok(Json(summary))
}

/// First `email` value in a query string, percent-decoded.
fn email_param(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "email")
        .map(|(_, value)| value.into_owned())
}
