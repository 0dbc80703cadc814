//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOP_ACCESS_TOKEN` - Admin API access token
//! - `API_VERSION` - Admin API version (e.g., 2026-01)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `UPSTREAM_TIMEOUT_SECS` - Per-request timeout for Admin API calls, at least 1 (default: 30)
//! - `UPSTREAM_MAX_PAGES` - Pages walked before a lookup is aborted, at least 1 (default: 1000)
//! - `UPSTREAM_PAGE_SIZE` - `limit` sent with list requests, 1-250 (default: 50)
//! - `GIFTCARD_RESOLVE_CUSTOMER` - Search for the customer before listing cards (default: true)
//! - `GIFTCARD_QUERY_SCOPE` - `email` or `none` (default: email)
//! - `GIFTCARD_MATCH_STRATEGY` - `customer_id`, `customer_id_then_recipient_email` or `none`
//! - `GIFTCARD_REQUIRE_POSITIVE_BALANCE` - (default: true)
//! - `GIFTCARD_EXCLUDE_DISABLED` - (default: true)
//! - `GIFTCARD_EXCLUDE_EXPIRED` - (default: true)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use giftcard_lookup_core::{FilterPolicy, MatchStrategy};
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const MAX_PAGE_SIZE: u16 = 250;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Which cards a lookup returns
    pub lookup: LookupConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com). A leading
    /// `http://` or `https://` is kept as given.
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Timeout applied to every Admin API request
    pub timeout: Duration,
    /// Pages walked before a lookup is aborted
    pub max_pages: usize,
    /// `limit` parameter for list requests
    pub page_size: u16,
}

impl fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("max_pages", &self.max_pages)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl ShopifyConfig {
    /// Base URL of the versioned Admin REST API, without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> String {
        let store = self.store.trim_end_matches('/');
        if store.starts_with("http://") || store.starts_with("https://") {
            format!("{store}/admin/api/{}", self.api_version)
        } else {
            format!("https://{store}/admin/api/{}", self.api_version)
        }
    }
}

/// How the upstream gift card list is narrowed before local filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryScope {
    /// Send `query=email:<address>` with the list request.
    #[default]
    Email,
    /// List every gift card and rely on local matching.
    None,
}

impl FromStr for QueryScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "none" | "all" => Ok(Self::None),
            other => Err(format!("expected 'email' or 'none', got '{other}'")),
        }
    }
}

/// Lookup behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// Search for the customer by email before listing cards.
    pub resolve_customer_first: bool,
    /// Upstream query narrowing.
    pub query_scope: QueryScope,
    /// Local filter and matching rules.
    pub policy: FilterPolicy,
}

impl LookupConfig {
    /// The canonical lookup: resolve the customer, scope by email, keep
    /// positive, enabled, unexpired cards owned by the shopper.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            resolve_customer_first: true,
            query_scope: QueryScope::Email,
            policy: FilterPolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = EnvSource(env);

        let host = vars.parsed_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = vars.parsed_or("PORT", 3000_u16)?;

        let shopify = ShopifyConfig::from_source(&vars)?;
        let lookup = LookupConfig::from_source(&vars)?;

        let log_format = match vars.optional("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let sentry_dsn = vars.optional("SENTRY_DSN");
        let sentry_environment = vars.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = vars
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = vars
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            shopify,
            lookup,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_source(vars: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let access_token = vars.required("SHOP_ACCESS_TOKEN")?;
        validate_secret_strength(&access_token, "SHOP_ACCESS_TOKEN")?;

        let page_size = vars.parsed_or("UPSTREAM_PAGE_SIZE", 50_u16)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar(
                "UPSTREAM_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let max_pages = vars.parsed_or("UPSTREAM_MAX_PAGES", 1000_usize)?;
        if max_pages == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "UPSTREAM_MAX_PAGES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let timeout_secs = vars.parsed_or("UPSTREAM_TIMEOUT_SECS", 30_u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            store: vars.required("SHOP_DOMAIN")?,
            api_version: vars.required("API_VERSION")?,
            access_token: SecretString::from(access_token),
            timeout: Duration::from_secs(timeout_secs),
            max_pages,
            page_size,
        })
    }
}

impl LookupConfig {
    fn from_source(vars: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::canonical();

        let policy = FilterPolicy {
            require_positive_balance: vars.flag_or(
                "GIFTCARD_REQUIRE_POSITIVE_BALANCE",
                defaults.policy.require_positive_balance,
            )?,
            exclude_disabled: vars
                .flag_or("GIFTCARD_EXCLUDE_DISABLED", defaults.policy.exclude_disabled)?,
            exclude_expired: vars
                .flag_or("GIFTCARD_EXCLUDE_EXPIRED", defaults.policy.exclude_expired)?,
            match_strategy: vars
                .parsed_or::<MatchStrategy>("GIFTCARD_MATCH_STRATEGY", defaults.policy.match_strategy)?,
        };

        Ok(Self {
            resolve_customer_first: vars
                .flag_or("GIFTCARD_RESOLVE_CUSTOMER", defaults.resolve_customer_first)?,
            query_scope: vars.parsed_or("GIFTCARD_QUERY_SCOPE", defaults.query_scope)?,
            policy,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct EnvSource<'a>(&'a dyn Fn(&str) -> Option<String>);

impl EnvSource<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a boolean flag, falling back to `default` when unset.
    fn flag_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        self.optional(key).map_or(Ok(default), |raw| {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got '{other}'"),
                )),
            }
        })
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
