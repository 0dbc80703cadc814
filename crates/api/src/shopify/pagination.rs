//! Cursor pagination over Admin REST listings.
//!
//! Shopify REST list endpoints return one page per request and advertise the
//! next one in a `Link` header:
//!
//! ```text
//! Link: <https://shop.myshopify.com/admin/api/2026-01/gift_cards.json?page_info=abc&limit=50>; rel="previous",
//!       <https://shop.myshopify.com/admin/api/2026-01/gift_cards.json?page_info=def&limit=50>; rel="next"
//! ```
//!
//! Only the `next` relation is followed. The walk ends when a response has no
//! `next` link, when a request fails, or when the page limit is hit.

use std::sync::LazyLock;

use async_stream::stream;
use futures::{Stream, TryStreamExt};
use regex::Regex;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ShopifyClient, ShopifyError};

/// First `<url>` immediately followed by `; rel="next"`.
static NEXT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("Invalid regex"));

/// A response envelope holding one page of a listing.
pub trait Listing: DeserializeOwned {
    /// Element type of the list field.
    type Item;

    /// Take the list field out of the envelope.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Opaque absolute URL of the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(Url);

impl PageCursor {
    /// Extract the `rel="next"` URL from a `Link` header value.
    ///
    /// Returns `None` when there is no next page, or `Some(Err(_))` when the
    /// advertised URL is not a valid absolute URL.
    #[must_use]
    pub fn from_link_header(header: &str) -> Option<Result<Self, url::ParseError>> {
        let captures = NEXT_LINK_RE.captures(header)?;
        let raw = captures.get(1)?.as_str();
        Some(Url::parse(raw).map(Self))
    }

    /// The cursor as a URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// Consume the cursor.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.0
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page, in upstream order.
    pub items: Vec<T>,
    /// Where the next page lives, if anywhere.
    pub next: Option<PageCursor>,
}

impl ShopifyClient {
    /// Walk a listing page by page, starting at `seed`.
    ///
    /// The stream is lazy: nothing is requested until it is polled, and each
    /// page is fetched only after the previous one has been yielded. An error
    /// is always the last item.
    pub fn walk_pages<'a, L>(&'a self, seed: Url) -> impl Stream<Item = Result<Page<L::Item>, ShopifyError>> + 'a
    where
        L: Listing,
        L::Item: 'a,
    {
        let max_pages = self.max_pages();

        stream! {
            let mut next = Some(seed);
            let mut fetched = 0_usize;

            while let Some(url) = next.take() {
                if fetched >= max_pages {
                    tracing::error!(max_pages, "Pagination limit reached");
                    yield Err(ShopifyError::PageLimitExceeded(max_pages));
                    break;
                }
                fetched += 1;

                match self.fetch_page::<L>(url, fetched).await {
                    Ok(page) => {
                        next = page.next.clone().map(PageCursor::into_url);
                        yield Ok(page);
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        }
    }

    /// Walk every page of a listing and concatenate the items.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; items from earlier pages are
    /// discarded.
    pub async fn collect_all<L>(&self, seed: Url) -> Result<Vec<L::Item>, ShopifyError>
    where
        L: Listing,
    {
        self.walk_pages::<L>(seed)
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page.items);
                Ok(items)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;
    use reqwest::header::HeaderValue;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shopify::client::tests::config;

    #[derive(Debug, Deserialize)]
    struct Numbers {
        #[serde(default)]
        numbers: Vec<u32>,
    }

    impl Listing for Numbers {
        type Item = u32;

        fn into_items(self) -> Vec<u32> {
            self.numbers
        }
    }

    fn link(server: &MockServer, page: &str) -> String {
        format!(
            "<{}/admin/api/2026-01/numbers.json?page_info={page}>; rel=\"next\"",
            server.uri()
        )
    }

    async fn mount_page(server: &MockServer, page: Option<&str>, body: serde_json::Value, next: Option<&str>) {
        let mut response = ResponseTemplate::new(200).set_body_json(body);
        if let Some(next) = next {
            response = response.insert_header("Link", link(server, next).as_str());
        }

        let mock = Mock::given(method("GET")).and(path("/admin/api/2026-01/numbers.json"));
        let mock = match page {
            Some(page) => mock.and(query_param("page_info", page)),
            None => mock.and(query_param("limit", "50")),
        };
        mock.respond_with(response).expect(1).mount(server).await;
    }

    fn seed(client: &ShopifyClient) -> Url {
        client.endpoint("numbers.json", &[("limit", "50")]).unwrap()
    }

    #[test]
    fn test_next_link_single() {
        let cursor = PageCursor::from_link_header(
            r#"<https://shop.myshopify.com/admin/api/2026-01/gift_cards.json?page_info=abc&limit=50>; rel="next""#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            cursor.as_url().as_str(),
            "https://shop.myshopify.com/admin/api/2026-01/gift_cards.json?page_info=abc&limit=50"
        );
    }

    #[test]
    fn test_next_link_after_previous() {
        let header = r#"<https://shop/a?page_info=prev>; rel="previous", <https://shop/a?page_info=next>; rel="next""#;
        let cursor = PageCursor::from_link_header(header).unwrap().unwrap();
        assert_eq!(cursor.into_url().as_str(), "https://shop/a?page_info=next");
    }

    #[test]
    fn test_no_next_link() {
        assert!(PageCursor::from_link_header(r#"<https://shop/a?page_info=prev>; rel="previous""#).is_none());
        assert!(PageCursor::from_link_header("").is_none());
    }

    #[test]
    fn test_relative_next_link_is_an_error() {
        let result = PageCursor::from_link_header(r#"</relative?page_info=x>; rel="next""#).unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_collect_all_follows_every_page() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({"numbers": [1, 2]}), Some("p2")).await;
        mount_page(&server, Some("p2"), json!({"numbers": [3]}), Some("p3")).await;
        mount_page(&server, Some("p3"), json!({"numbers": [4, 5]}), None).await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let items = client.collect_all::<Numbers>(seed(&client)).await.unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        // `.expect(1)` on each mock is verified when the server drops.
    }

    #[tokio::test]
    async fn test_missing_list_field_is_an_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({}), None).await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let items = client.collect_all::<Numbers>(seed(&client)).await.unwrap();
        assert!(items.is_empty());
    }

    /// First page succeeds and links to a second page that is rate limited.
    async fn mount_rate_limited_walk(server: &MockServer) {
        mount_page(server, None, json!({"numbers": [1]}), Some("p2")).await;
        Mock::given(method("GET"))
            .and(query_param("page_info", "p2"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_error_ends_the_stream() {
        let server = MockServer::start().await;
        mount_rate_limited_walk(&server).await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let pages: Vec<_> = client.walk_pages::<Numbers>(seed(&client)).collect().await;

        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_ok());
        match &pages[1] {
            Err(ShopifyError::Request { status, body }) => {
                assert_eq!(*status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected request error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_collect_all_discards_pages_before_an_error() {
        let server = MockServer::start().await;
        mount_rate_limited_walk(&server).await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let err = client.collect_all::<Numbers>(seed(&client)).await;
        assert!(matches!(err, Err(ShopifyError::Request { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_undecodable_link_header_is_an_error() {
        let server = MockServer::start().await;
        let mut raw = link(&server, "p2").into_bytes();
        raw.extend_from_slice(b"; title=\xff");
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"numbers": [1]}))
                    .insert_header("Link", HeaderValue::from_bytes(&raw).unwrap()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let err = client.collect_all::<Numbers>(seed(&client)).await.unwrap_err();
        assert!(matches!(err, ShopifyError::InvalidHeader(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let err = client.collect_all::<Numbers>(seed(&client)).await.unwrap_err();
        assert!(matches!(err, ShopifyError::Parse(_)));
    }

    #[tokio::test]
    async fn test_page_limit_guards_cycles() {
        let server = MockServer::start().await;
        // Every page points back at itself.
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"numbers": [1]}))
                    .insert_header("Link", link(&server, "loop").as_str()),
            )
            .mount(&server)
            .await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let err = client.collect_all::<Numbers>(seed(&client)).await.unwrap_err();

        assert!(matches!(err, ShopifyError::PageLimitExceeded(10)));
        assert_eq!(server.received_requests().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_walk_is_lazy() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({"numbers": [1]}), Some("p2")).await;
        Mock::given(method("GET"))
            .and(query_param("page_info", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"numbers": [2]})))
            .expect(0)
            .mount(&server)
            .await;

        let client = ShopifyClient::new(&config(&server.uri())).unwrap();
        let mut pages = std::pin::pin!(client.walk_pages::<Numbers>(seed(&client)));
        let first = pages.next().await.unwrap().unwrap();

        assert_eq!(first.items, vec![1]);
        assert!(first.next.is_some());
    }
}
