//! Admin REST wire types.
//!
//! Fields are deliberately loose: ids arrive as numbers or strings depending on
//! the API version and client, amounts are decimal strings, and any field may
//! be absent. Coercion into domain types happens in `conversions`.

use serde::Deserialize;
use serde_json::Value;

use super::pagination::Listing;

/// A gift card as returned by `gift_cards.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestGiftCard {
    pub id: Value,
    pub balance: Value,
    pub initial_value: Value,
    pub currency: Option<String>,
    pub customer_id: Value,
    pub recipient_email: Option<String>,
    pub disabled_at: Option<String>,
    pub expires_on: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A customer as returned by `customers/search.json`.
///
/// Only the id is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestCustomer {
    pub id: Value,
    pub email: Option<String>,
}

/// `{"gift_cards": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct GiftCardList {
    #[serde(default)]
    pub gift_cards: Vec<RestGiftCard>,
}

impl Listing for GiftCardList {
    type Item = RestGiftCard;

    fn into_items(self) -> Vec<RestGiftCard> {
        self.gift_cards
    }
}

/// `{"customers": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct CustomerList {
    #[serde(default)]
    pub customers: Vec<RestCustomer>,
}

impl Listing for CustomerList {
    type Item = RestCustomer;

    fn into_items(self) -> Vec<RestCustomer> {
        self.customers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_gift_card_list_ignores_extra_fields() {
        let list: GiftCardList = serde_json::from_value(json!({
            "gift_cards": [{
                "id": 1,
                "balance": "10.00",
                "initial_value": "25.00",
                "currency": "USD",
                "code": "SECRET",
                "last_characters": "abcd",
                "note": "internal",
                "customer_id": null,
                "disabled_at": null,
                "expires_on": null
            }]
        }))
        .unwrap();

        let cards = list.into_items();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, json!(1));
        assert_eq!(cards[0].balance, json!("10.00"));
        assert!(cards[0].customer_id.is_null());
        assert_eq!(cards[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_missing_list_field_is_empty() {
        let list: GiftCardList = serde_json::from_str("{}").unwrap();
        assert!(list.into_items().is_empty());

        let list: CustomerList = serde_json::from_str(r#"{"errors":"nope"}"#).unwrap();
        assert!(list.into_items().is_empty());
    }

    #[test]
    fn test_sparse_card() {
        let list: GiftCardList = serde_json::from_str(r#"{"gift_cards":[{"id":"9"}]}"#).unwrap();
        let card = &list.gift_cards[0];
        assert_eq!(card.id, json!("9"));
        assert!(card.balance.is_null());
        assert!(card.recipient_email.is_none());
    }
}
