//! One-time sanitation of persisted cart data written by older cart versions.
//!
//! Entries with no usable price, or whose line total cannot be represented,
//! are dropped. Keys are canonicalized (a collision keeps the entry processed
//! last), quantities fall back to 1 and unusable weights are discarded.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::cart::{Cart, LineItem};
use crate::normalize::{canonical_key, parse_price_value, round_money};

/// The persisted `cart` mapping before any validation, in stored order.
pub type RawCart = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub cart: Cart,
    /// `true` when the repaired cart differs from what was stored and should
    /// be written back.
    pub changed: bool,
    /// Keys of entries that were discarded as unrecoverable.
    pub dropped: Vec<String>,
    /// `(stored, canonical)` pairs for keys that were rewritten.
    pub renamed: Vec<(String, String)>,
}

/// Repairs a raw persisted cart. Pure; the caller decides whether to persist.
///
/// Running it on the serialized form of its own output yields the same cart
/// with `changed == false`.
#[must_use]
pub fn repair(raw: &RawCart) -> RepairOutcome {
    let mut cart = Cart::new();
    let mut changed = false;
    let mut dropped = Vec::new();
    let mut renamed = Vec::new();

    for (key, value) in raw {
        let Some(entry) = value.as_object() else {
            tracing::warn!(key = %key, "dropping cart entry that is not an object");
            dropped.push(key.clone());
            changed = true;
            continue;
        };

        let raw_price = entry.get("price");
        let Some((price, unit_price)) = raw_price
            .and_then(parse_price_value)
            .map(|p| (p, round_money(p)))
            .filter(|(_, rounded)| *rounded > Decimal::ZERO)
        else {
            tracing::warn!(key = %key, price = ?raw_price, "dropping cart entry with unusable price");
            dropped.push(key.clone());
            changed = true;
            continue;
        };

        if !raw_price.is_some_and(Value::is_number) || unit_price != price {
            changed = true;
        }

        let canonical = canonical_key(key);
        if canonical != *key {
            tracing::debug!(from = %key, to = %canonical, "canonicalized cart key");
            renamed.push((key.clone(), canonical.clone()));
            changed = true;
        }

        let quantity = coerce_quantity(entry.get("quantity")).unwrap_or_else(|| {
            changed = true;
            1
        });

        if unit_price.checked_mul(Decimal::from(quantity)).is_none() {
            tracing::warn!(key = %key, quantity, "dropping cart entry whose line total overflows");
            dropped.push(key.clone());
            changed = true;
            continue;
        }

        let (unit_weight, weight_changed) = coerce_weight(entry.get("weight"));
        changed |= weight_changed;

        if cart
            .upsert(LineItem {
                key: canonical,
                unit_price,
                quantity,
                unit_weight,
            })
            .is_some()
        {
            tracing::debug!(key = %key, "cart entry overwrote an earlier entry with the same canonical key");
        }
    }

    RepairOutcome {
        cart,
        changed,
        dropped,
        renamed,
    }
}

/// Accepts positive integers (including integral floats such as `2.0`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_quantity(value: Option<&Value>) -> Option<u32> {
    let Value::Number(n) = value? else {
        return None;
    };

    let whole = n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u64)
    })?;

    u32::try_from(whole).ok().filter(|q| *q >= 1)
}

/// Returns the usable weight and whether the stored value had to be altered.
fn coerce_weight(value: Option<&Value>) -> (Option<Decimal>, bool) {
    match value {
        None => (None, false),
        Some(v) => match parse_price_value(v).filter(|w| *w >= Decimal::ZERO) {
            Some(weight) => (Some(weight), !v.is_number()),
            None => (None, true),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawCart {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn reserialize(cart: &Cart) -> RawCart {
        raw(serde_json::to_value(cart).expect("serialize cart"))
    }

    #[test]
    fn clean_cart_is_unchanged() {
        let outcome = repair(&raw(json!({
            "Mug": { "price": 9.99, "quantity": 2 },
            "Shirt (M, Red)": { "price": 14, "quantity": 1, "weight": 0.25 }
        })));
        assert!(!outcome.changed);
        assert!(outcome.dropped.is_empty());
        assert_eq!(outcome.cart.len(), 2);
        assert_eq!(
            outcome.cart.get("Shirt (M, Red)").unwrap().unit_weight,
            Some(Decimal::new(25, 2))
        );
    }

    #[test]
    fn non_numeric_price_is_dropped() {
        let outcome = repair(&raw(json!({ "Hat": { "price": "abc", "quantity": 1 } })));
        assert!(outcome.cart.is_empty());
        assert!(outcome.changed);
        assert_eq!(outcome.dropped, vec!["Hat".to_string()]);
    }

    #[test]
    fn zero_negative_and_missing_prices_are_dropped() {
        let outcome = repair(&raw(json!({
            "Free": { "price": 0, "quantity": 1 },
            "Refund": { "price": -4.5, "quantity": 1 },
            "Ghost": { "quantity": 1 },
            "Null": { "price": null, "quantity": 1 },
            "Scalar": 5
        })));
        assert!(outcome.cart.is_empty());
        assert_eq!(outcome.dropped.len(), 5);
    }

    #[test]
    fn price_that_rounds_to_zero_is_dropped() {
        let raw_cart = raw(json!({
            "Crumb": { "price": 0.004, "quantity": 1 },
            "Speck": { "price": "$0.001", "quantity": 3 }
        }));
        let outcome = repair(&raw_cart);
        assert!(outcome.cart.is_empty());
        assert_eq!(outcome.dropped, vec!["Crumb".to_string(), "Speck".to_string()]);

        let again = repair(&reserialize(&outcome.cart));
        assert!(!again.changed);
        assert!(again.cart.is_empty());
    }

    #[test]
    fn overflowing_line_total_is_dropped() {
        let outcome = repair(&raw(json!({
            "Big": { "price": "99999999999999999999999999", "quantity": 1000 },
            "Mug": { "price": 9.99, "quantity": 1 }
        })));
        assert!(outcome.changed);
        assert_eq!(outcome.dropped, vec!["Big".to_string()]);
        let keys: Vec<&str> = outcome.cart.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["Mug"]);
    }

    #[test]
    fn string_price_is_parsed_and_rounded() {
        let outcome = repair(&raw(json!({ "Poster": { "price": "$12.499", "quantity": 3 } })));
        assert!(outcome.changed);
        let poster = outcome.cart.get("Poster").expect("poster kept");
        assert_eq!(poster.unit_price, Decimal::new(1250, 2));
        assert_eq!(poster.quantity, 3);
    }

    #[test]
    fn unrounded_numeric_price_counts_as_change() {
        let outcome = repair(&raw(json!({ "Pen": { "price": 1.005, "quantity": 1 } })));
        assert!(outcome.changed);
        assert_eq!(outcome.cart.get("Pen").unwrap().unit_price, Decimal::new(101, 2));
    }

    #[test]
    fn duplicate_suffix_is_collapsed() {
        let outcome = repair(&raw(json!({
            "Shirt (Red) (Red)": { "price": 12.0, "quantity": 2 }
        })));
        assert!(outcome.changed);
        assert_eq!(
            outcome.renamed,
            vec![("Shirt (Red) (Red)".to_string(), "Shirt (Red)".to_string())]
        );
        assert_eq!(outcome.cart.get("Shirt (Red)").unwrap().quantity, 2);
    }

    #[test]
    fn canonical_collision_keeps_last_processed_entry() {
        let outcome = repair(&raw(json!({
            "Shirt (Red)": { "price": 10.0, "quantity": 1 },
            "Mug": { "price": 9.99, "quantity": 1 },
            "Shirt (Red) (Red)": { "price": 12.0, "quantity": 5, "weight": 0.3 }
        })));
        assert_eq!(outcome.cart.len(), 2);
        let keys: Vec<&str> = outcome.cart.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["Shirt (Red)", "Mug"]);
        let shirt = outcome.cart.get("Shirt (Red)").unwrap();
        assert_eq!(shirt.unit_price, Decimal::new(12, 0));
        assert_eq!(shirt.quantity, 5);
        assert_eq!(shirt.unit_weight, Some(Decimal::new(3, 1)));
    }

    #[test]
    fn bad_quantities_default_to_one() {
        let outcome = repair(&raw(json!({
            "A": { "price": 1, "quantity": 0 },
            "B": { "price": 1, "quantity": -2 },
            "C": { "price": 1, "quantity": 1.5 },
            "D": { "price": 1, "quantity": "3" },
            "E": { "price": 1 },
            "F": { "price": 1, "quantity": 4.0 }
        })));
        assert!(outcome.changed);
        let quantities: Vec<u32> = outcome.cart.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![1, 1, 1, 1, 1, 4]);
    }

    #[test]
    fn unusable_weight_is_discarded() {
        let outcome = repair(&raw(json!({
            "A": { "price": 1, "quantity": 1, "weight": "heavy" },
            "B": { "price": 1, "quantity": 1, "weight": -1 },
            "C": { "price": 1, "quantity": 1, "weight": null }
        })));
        assert!(outcome.changed);
        assert!(outcome.cart.iter().all(|i| i.unit_weight.is_none()));
    }

    #[test]
    fn repair_is_idempotent() {
        let first = repair(&raw(json!({
            "Hat": { "price": "abc", "quantity": 1 },
            "Shirt (Red) (Red) (Red)": { "price": "$19.999", "quantity": "x" },
            "Mug": { "price": 9.99, "quantity": 2, "weight": "0.4" },
            "Pen": { "price": 1, "quantity": 3 }
        })));
        assert!(first.changed);

        let second = repair(&reserialize(&first.cart));
        assert!(!second.changed, "second pass should find nothing to fix");
        assert!(second.dropped.is_empty());
        assert!(second.renamed.is_empty());
        assert_eq!(second.cart, first.cart);
    }
}
