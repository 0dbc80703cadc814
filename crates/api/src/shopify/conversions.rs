//! Conversions from REST wire types to domain types.

use giftcard_lookup_core::{CustomerId, GiftCardId, GiftCardRecord, parse_amount};
use rust_decimal::Decimal;
use serde_json::Value;

use super::types::{RestCustomer, RestGiftCard};

/// Parse an amount that may be a decimal string or a JSON number.
fn amount(value: &Value) -> Decimal {
    match value {
        Value::String(s) => parse_amount(Some(s)),
        Value::Number(n) => parse_amount(Some(&n.to_string())),
        _ => Decimal::ZERO,
    }
}

/// Convert a REST gift card, or `None` if it has no usable id.
pub fn convert_gift_card(gc: RestGiftCard) -> Option<GiftCardRecord> {
    let Some(id) = GiftCardId::from_json(&gc.id) else {
        tracing::warn!(id = %gc.id, "Skipping gift card without a numeric id");
        return None;
    };

    Some(GiftCardRecord {
        id,
        balance: amount(&gc.balance),
        initial_value: amount(&gc.initial_value),
        currency: gc.currency,
        customer_id: CustomerId::from_json(&gc.customer_id),
        recipient_email: gc.recipient_email,
        disabled_at: gc.disabled_at,
        expires_on: gc.expires_on,
        created_at: gc.created_at,
        updated_at: gc.updated_at,
    })
}

/// Extract a customer's id.
pub fn customer_id(customer: &RestCustomer) -> Option<CustomerId> {
    let id = CustomerId::from_json(&customer.id);
    if id.is_none() {
        tracing::warn!(id = %customer.id, "Customer search returned a non-numeric id");
    }
    id
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rest(value: Value) -> RestGiftCard {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_full_card() {
        let record = convert_gift_card(rest(json!({
            "id": 101,
            "balance": "75.50",
            "initial_value": "100.00",
            "currency": "USD",
            "customer_id": "555",
            "recipient_email": "Friend@Example.com",
            "disabled_at": null,
            "expires_on": "2030-12-31",
            "created_at": "2024-01-01T00:00:00-05:00",
            "updated_at": "2024-02-01T00:00:00-05:00"
        })))
        .unwrap();

        assert_eq!(record.id, GiftCardId::new(101));
        assert_eq!(record.balance, Decimal::new(7550, 2));
        assert_eq!(record.initial_value, Decimal::new(10000, 2));
        assert_eq!(record.customer_id, Some(CustomerId::new(555)));
        assert_eq!(record.recipient_email.as_deref(), Some("Friend@Example.com"));
        assert_eq!(record.expires_on.as_deref(), Some("2030-12-31"));
    }

    #[test]
    fn test_numeric_amounts() {
        let record = convert_gift_card(rest(json!({"id": 1, "balance": 12.5, "initial_value": 20}))).unwrap();
        assert_eq!(record.balance, Decimal::new(125, 1));
        assert_eq!(record.initial_value, Decimal::new(20, 0));
    }

    #[test]
    fn test_unparseable_amounts_are_zero() {
        let record =
            convert_gift_card(rest(json!({"id": 1, "balance": "n/a", "initial_value": null}))).unwrap();
        assert_eq!(record.balance, Decimal::ZERO);
        assert_eq!(record.initial_value, Decimal::ZERO);
    }

    #[test]
    fn test_gid_customer() {
        let record =
            convert_gift_card(rest(json!({"id": 1, "customer_id": "gid://shopify/Customer/42"}))).unwrap();
        assert_eq!(record.customer_id, Some(CustomerId::new(42)));
    }

    #[test]
    fn test_card_without_id_is_skipped() {
        assert!(convert_gift_card(rest(json!({"balance": "10.00"}))).is_none());
        assert!(convert_gift_card(rest(json!({"id": "abc"}))).is_none());
    }

    #[test]
    fn test_customer_id() {
        let customer: RestCustomer = serde_json::from_value(json!({"id": 42, "email": "a@b.com"})).unwrap();
        assert_eq!(customer_id(&customer), Some(CustomerId::new(42)));

        let customer: RestCustomer = serde_json::from_value(json!({"email": "a@b.com"})).unwrap();
        assert_eq!(customer_id(&customer), None);
    }
}
