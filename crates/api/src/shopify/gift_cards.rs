//! Gift card listing.

use giftcard_lookup_core::{Email, GiftCardRecord};
use tracing::instrument;
use url::Url;

use super::conversions::convert_gift_card;
use super::types::GiftCardList;
use super::{ShopifyClient, ShopifyError};

impl ShopifyClient {
    /// First-page URL for `gift_cards.json`.
    ///
    /// With `email`, the upstream search is narrowed to `email:<address>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn gift_cards_url(&self, email: Option<&Email>) -> Result<Url, ShopifyError> {
        let limit = self.page_size().to_string();

        match email {
            Some(email) => {
                let query = format!("email:{email}");
                self.endpoint("gift_cards.json", &[("query", &query), ("limit", &limit)])
            }
            None => self.endpoint("gift_cards.json", &[("limit", &limit)]),
        }
    }

    /// Fetch every gift card across all pages.
    ///
    /// Cards without a usable id are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first upstream error; nothing is returned from earlier pages.
    #[instrument(skip_all, fields(email = email.map(Email::as_str)))]
    pub async fn list_gift_cards(&self, email: Option<&Email>) -> Result<Vec<GiftCardRecord>, ShopifyError> {
        let seed = self.gift_cards_url(email)?;
        let raw = self.collect_all::<GiftCardList>(seed).await?;
        let fetched = raw.len();

        let cards: Vec<GiftCardRecord> = raw.into_iter().filter_map(convert_gift_card).collect();

        tracing::debug!(fetched, cards = cards.len(), "Listed gift cards");

        Ok(cards)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use giftcard_lookup_core::GiftCardId;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shopify::client::tests::config;

    #[test]
    fn test_scoped_url() {
        let client = ShopifyClient::new(&config("test-store.myshopify.com")).unwrap();
        let email = Email::parse("a@b.com").unwrap();

        assert_eq!(
            client.gift_cards_url(Some(&email)).unwrap().as_str(),
            "https://test-store.myshopify.com/admin/api/2026-01/gift_cards.json?query=email%3Aa%40b.com&limit=50"
        );
        assert_eq!(
            client.gift_cards_url(None).unwrap().as_str(),
            "https://test-store.myshopify.com/admin/api/2026-01/gift_cards.json?limit=50"
        );
    }

    #[tokio::test]
    async fn test_lists_across_pages() {
        let server = MockServer::start().await;
        let next = format!(
            "<{}/admin/api/2026-01/gift_cards.json?page_info=p2&limit=50>; rel=\"next\"",
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/gift_cards.json"))
            .and(query_param("query", "email:a@b.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"gift_cards": [{"id": 1, "balance": "10.00"}, {"balance": "99.00"}]}))
                    .insert_header("Link", next.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2026-01/gift_cards.json"))
            .and(query_param("page_info", "p2"))
            .and(query_param_is_missing("query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"gift_cards": [{"id": 2, "balance": "5.25"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let cards = client
            .list_gift_cards(Some(&Email::parse("a@b.com").unwrap()))
            .await
            .unwrap();

        let ids: Vec<GiftCardId> = cards.iter().map(|gc| gc.id).collect();
        assert_eq!(ids, vec![GiftCardId::new(1), GiftCardId::new(2)]);
    }
}
