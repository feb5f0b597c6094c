//! Shopping cart engine: a line-item mapping persisted write-through to a
//! durable key-value store, repaired once at load, with totals re-derived
//! after every mutation.

pub mod aggregate;
pub mod cart;
pub mod command;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod persistence;
pub mod repair;
pub mod store;

pub use aggregate::{totals, Totals};
pub use cart::{Cart, LineItem};
pub use command::{AddToCart, Command, Outcome, VariantSelection};
pub use engine::CartEngine;
pub use error::{CartError, StoreError};
pub use normalize::{canonical_key, compose_key, parse_price, round_money};
pub use persistence::{CartStore, CART_KEY, SNAPSHOT_KEY, TOTAL_KEY};
pub use repair::{repair, RawCart, RepairOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore};
