//! Customer resolution.

use giftcard_lookup_core::{CustomerIdentity, Email};
use tracing::instrument;

use super::conversions::customer_id;
use super::types::CustomerList;
use super::{ShopifyClient, ShopifyError};

impl ShopifyClient {
    /// Find the customer whose email is exactly `email`.
    ///
    /// Issues a single `customers/search.json` request with `limit=1`; only
    /// the first page is read. Returns `None` when nobody matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn resolve_customer(&self, email: &Email) -> Result<Option<CustomerIdentity>, ShopifyError> {
        let query = format!("email:{email}");
        let url = self.endpoint("customers/search.json", &[("query", &query), ("limit", "1")])?;

        let page = self.fetch_page::<CustomerList>(url, 1).await?;
        let identity = page
            .items
            .first()
            .and_then(customer_id)
            .map(|id| CustomerIdentity {
                id,
                email: email.clone(),
            });

        tracing::debug!(found = identity.is_some(), "Resolved customer");

        Ok(identity)
    }
}
