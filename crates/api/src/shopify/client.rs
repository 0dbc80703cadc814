//! HTTP plumbing shared by every Admin API call.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, LINK};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::ShopifyConfig;

use super::ShopifyError;
use super::pagination::{Listing, Page, PageCursor};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    api_base: String,
    max_pages: usize,
    page_size: u16,
}

impl ShopifyClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| ShopifyError::Config(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                api_base: config.api_base(),
                max_pages: config.max_pages,
                page_size: config.page_size,
            }),
        })
    }

    /// Pages walked before pagination is aborted.
    pub(super) fn max_pages(&self) -> usize {
        self.inner.max_pages
    }

    /// `limit` sent with list requests.
    pub(super) fn page_size(&self) -> u16 {
        self.inner.page_size
    }

    /// Build an absolute endpoint URL with query parameters.
    ///
    /// Parameter values are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ShopifyError> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.inner.api_base,
            path.trim_start_matches('/')
        ))?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Fetch one page of a listing.
    ///
    /// A non-success status fails with [`ShopifyError::Request`] carrying the
    /// upstream body; a body that does not deserialize as `L` fails with
    /// [`ShopifyError::Parse`]. A `Link` header that is not visible ASCII
    /// fails with [`ShopifyError::InvalidHeader`] rather than ending the walk.
    #[instrument(skip_all, fields(page = number, url = %url))]
    pub(super) async fn fetch_page<L: Listing>(
        &self,
        url: Url,
        number: usize,
    ) -> Result<Page<L::Item>, ShopifyError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Shopify request failed");
            return Err(ShopifyError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let next = match response.headers().get(LINK) {
            Some(value) => {
                let link = value
                    .to_str()
                    .map_err(|e| ShopifyError::InvalidHeader(format!("Link: {e}")))?;
                PageCursor::from_link_header(link).transpose()?
            }
            None => None,
        };

        let listing: L = parse_body(&response.text().await?)?;
        let items = listing.into_items();

        tracing::debug!(items = items.len(), has_next = next.is_some(), "Fetched page");

        Ok(Page { items, next })
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ShopifyError> {
    Ok(serde_json::from_str(body)?)
}
