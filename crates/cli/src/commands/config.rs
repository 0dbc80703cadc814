//! Print the effective configuration.
//!
//! Useful for checking what a deployment will run with. The access token is
//! never printed.

use giftcard_lookup_api::config::{ApiConfig, QueryScope};
use serde_json::{Value, json};

use super::CommandError;

/// Render the configuration as JSON with secrets left out.
fn render(config: &ApiConfig) -> Value {
    let policy = &config.lookup.policy;

    json!({
        "listen": config.socket_addr().to_string(),
        "shopify": {
            "api_base": config.shopify.api_base(),
            "access_token": "[REDACTED]",
            "timeout_secs": config.shopify.timeout.as_secs(),
            "max_pages": config.shopify.max_pages,
            "page_size": config.shopify.page_size,
        },
        "lookup": {
            "resolve_customer_first": config.lookup.resolve_customer_first,
            "query_scope": match config.lookup.query_scope {
                QueryScope::Email => "email",
                QueryScope::None => "none",
            },
            "require_positive_balance": policy.require_positive_balance,
            "exclude_disabled": policy.exclude_disabled,
            "exclude_expired": policy.exclude_expired,
            "match_strategy": policy.match_strategy.as_str(),
        },
        "sentry_enabled": config.sentry_dsn.is_some(),
    })
}

/// Load configuration from the environment and print it.
///
/// # Errors
///
/// Returns an error if configuration is invalid.
#[allow(clippy::print_stdout)]
pub fn show() -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    println!("{}", serde_json::to_string_pretty(&render(&config))?);
    Ok(())
}
