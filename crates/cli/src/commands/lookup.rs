//! One-off gift card lookup.
//!
//! Runs the same pipeline as `GET /giftcard` against the configured store and
//! prints the JSON summary.
//!
//! # Usage
//!
//! ```bash
//! gcl lookup --email shopper@example.com
//! gcl lookup --email shopper@example.com --no-resolve-customer --match-strategy none
//! ```

use chrono::Utc;
use clap::Args;
use giftcard_lookup_api::config::{ApiConfig, LookupConfig, QueryScope};
use giftcard_lookup_api::services::GiftCardLookup;
use giftcard_lookup_api::shopify::ShopifyClient;
use giftcard_lookup_core::{Email, FilterPolicy, MatchStrategy};

use super::CommandError;

/// Flags for `gcl lookup`.
#[derive(Debug, Default, Args)]
pub struct LookupArgs {
    /// Shopper email address
    #[arg(short, long)]
    pub email: String,

    /// Skip the customer search and infer the customer from the cards
    #[arg(long)]
    pub no_resolve_customer: bool,

    /// Ownership matching (`customer_id`, `customer_id_then_recipient_email`, `none`)
    #[arg(long)]
    pub match_strategy: Option<MatchStrategy>,

    /// Upstream query narrowing (`email`, `none`)
    #[arg(long)]
    pub scope: Option<QueryScope>,

    /// Keep zero-balance, disabled and expired cards
    #[arg(long)]
    pub include_inactive: bool,
}

/// Apply command-line overrides on top of the configured lookup behaviour.
fn apply_overrides(mut config: LookupConfig, args: &LookupArgs) -> LookupConfig {
    if args.no_resolve_customer {
        config.resolve_customer_first = false;
    }
    if let Some(scope) = args.scope {
        config.query_scope = scope;
    }
    if args.include_inactive {
        config.policy = FilterPolicy::keep_all(config.policy.match_strategy);
    }
    if let Some(strategy) = args.match_strategy {
        config.policy.match_strategy = strategy;
    }
    config
}

/// Look up `args.email` and print the summary as pretty JSON.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the email is empty, or any
/// Shopify request fails.
#[allow(clippy::print_stdout)]
pub async fn run(args: &LookupArgs) -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    let email = Email::parse(&args.email)?;

    let lookup_config = apply_overrides(config.lookup, args);
    tracing::info!(lookup = ?lookup_config, "Running lookup");

    let client = ShopifyClient::new(&config.shopify)?;
    let summary = GiftCardLookup::new(client, lookup_config)
        .lookup(&email, Utc::now())
        .await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_config() {
        let args = LookupArgs {
            email: "a@b.com".to_string(),
            ..LookupArgs::default()
        };
        assert_eq!(apply_overrides(LookupConfig::canonical(), &args), LookupConfig::canonical());
    }

    #[test]
    fn test_overrides() {
        let args = LookupArgs {
            email: "a@b.com".to_string(),
            no_resolve_customer: true,
            match_strategy: Some(MatchStrategy::None),
            scope: Some(QueryScope::None),
            include_inactive: true,
        };
        let config = apply_overrides(LookupConfig::canonical(), &args);

        assert!(!config.resolve_customer_first);
        assert_eq!(config.query_scope, QueryScope::None);
        assert_eq!(config.policy, FilterPolicy::keep_all(MatchStrategy::None));
    }

    #[test]
    fn test_include_inactive_keeps_strategy() {
        let args = LookupArgs {
            email: "a@b.com".to_string(),
            include_inactive: true,
            ..LookupArgs::default()
        };
        let config = apply_overrides(LookupConfig::canonical(), &args);
        assert_eq!(
            config.policy,
            FilterPolicy::keep_all(MatchStrategy::CustomerIdThenRecipientEmail)
        );
    }
}
