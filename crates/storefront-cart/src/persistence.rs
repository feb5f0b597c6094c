//! Cart persistence on top of a [`KeyValueStore`].
//!
//! Three fixed keys are shared with the checkout page:
//! - [`CART_KEY`]: the live cart mapping, rewritten after every mutation.
//! - [`TOTAL_KEY`]: the derived total as a two-decimal string.
//! - [`SNAPSHOT_KEY`]: a copy of the cart written only at checkout.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::cart::Cart;
use crate::error::StoreError;
use crate::repair::{repair, RawCart};
use crate::store::KeyValueStore;

pub const CART_KEY: &str = "cart";
pub const TOTAL_KEY: &str = "cartTotal";
pub const SNAPSHOT_KEY: &str = "cartSnapshot";

#[derive(Debug, Clone, Default)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Reads the stored cart mapping without validating entries.
    ///
    /// Never fails: an absent key, a read error, unparsable JSON, or a JSON
    /// value that is not an object all yield an empty mapping.
    pub fn load_raw(&self) -> RawCart {
        self.read_mapping(CART_KEY)
    }

    /// Loads the cart and runs the repair pass over it, writing the repaired
    /// cart back once if anything had to be fixed.
    ///
    /// Never fails; a failed write-back is logged and the repaired cart is
    /// still returned.
    pub fn load(&mut self) -> Cart {
        let outcome = repair(&self.load_raw());

        if outcome.changed {
            tracing::info!(
                dropped = outcome.dropped.len(),
                renamed = outcome.renamed.len(),
                "repaired persisted cart"
            );
            if let Err(e) = self.save(&outcome.cart) {
                tracing::warn!(error = %e, "failed to write repaired cart back to store");
            }
        }

        outcome.cart
    }

    /// Writes the full cart under [`CART_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the store write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), StoreError> {
        self.write_cart(CART_KEY, cart)
    }

    /// Writes the total under [`TOTAL_KEY`] as a two-decimal string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store write fails.
    pub fn publish_total(&mut self, total: Decimal) -> Result<(), StoreError> {
        self.store.set(TOTAL_KEY, &format!("{total:.2}"))
    }

    /// Writes a copy of the cart under [`SNAPSHOT_KEY`] for the checkout page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the store write fails.
    pub fn publish_snapshot(&mut self, cart: &Cart) -> Result<(), StoreError> {
        self.write_cart(SNAPSHOT_KEY, cart)
    }

    /// Reads the published total, as the checkout page does.
    #[must_use]
    pub fn read_total(&self) -> Option<Decimal> {
        let raw = self.read_key(TOTAL_KEY)?;
        Decimal::from_str(raw.trim())
            .inspect_err(|e| tracing::warn!(value = %raw, error = %e, "ignoring unparsable cart total"))
            .ok()
    }

    /// Reads the checkout snapshot, sanitized through the same repair pass as
    /// the live cart. Missing or unreadable snapshots read as empty.
    #[must_use]
    pub fn read_snapshot(&self) -> Cart {
        repair(&self.read_mapping(SNAPSHOT_KEY)).cart
    }

    fn write_cart(&mut self, key: &str, cart: &Cart) -> Result<(), StoreError> {
        let body = serde_json::to_string(cart).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            source: e,
        })?;
        self.store.set(key, &body)
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read from store; treating as absent");
                None
            }
        }
    }

    fn read_mapping(&self, key: &str) -> RawCart {
        let Some(body) = self.read_key(key) else {
            return RawCart::new();
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => RawCart::new(),
            Ok(other) => {
                tracing::warn!(key, kind = %json_kind(&other), "stored cart is not an object; starting empty");
                RawCart::new()
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored cart is not valid JSON; starting empty");
                RawCart::new()
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
