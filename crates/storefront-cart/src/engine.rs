//! The cart controller: owns the live [`Cart`], applies mutations, and keeps
//! the store and derived total in step with every change.
//!
//! Each mutation builds the next cart on a copy, persists it, and only then
//! replaces the live cart, so a failed write leaves the previous state in
//! place. If the cart was saved but its total could not be published, the
//! previous cart is written back before the error is returned.

use rust_decimal::Decimal;
use storefront_core::{Catalog, Product, SizeOption};

use crate::aggregate::{self, Totals};
use crate::cart::{Cart, LineItem};
use crate::command::{AddToCart, Command, Outcome};
use crate::error::CartError;
use crate::normalize::{compose_key, parse_price, round_money};
use crate::persistence::CartStore;
use crate::store::KeyValueStore;

pub struct CartEngine<S> {
    cart: Cart,
    store: CartStore<S>,
    catalog: Catalog,
    checkout_location: String,
}

impl<S: KeyValueStore> CartEngine<S> {
    /// Loads and repairs the persisted cart, then publishes its total.
    ///
    /// Never fails: an unreadable store starts an empty cart, and a failed
    /// total write is logged.
    pub fn open(store: S, catalog: Catalog, checkout_location: impl Into<String>) -> Self {
        let mut store = CartStore::new(store);
        let cart = store.load();
        let total = aggregate::totals(&cart).price;

        if let Err(e) = store.publish_total(total) {
            tracing::warn!(error = %e, "failed to publish cart total on load");
        }

        tracing::debug!(lines = cart.len(), total = %total, "cart loaded");

        Self {
            cart,
            store,
            catalog,
            checkout_location: checkout_location.into(),
        }
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        aggregate::totals(&self.cart)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.store.store()
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Routes a command to the matching operation.
    ///
    /// # Errors
    ///
    /// See the individual operations.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, CartError> {
        match command {
            Command::AddToCart(request) => self.add_to_cart(request),
            Command::Increment { key } => self.increment(&key),
            Command::Decrement { key } => self.decrement(&key),
            Command::Remove { key } => self.remove(&key),
            Command::Clear { confirmed } => self.clear(confirmed),
            Command::Checkout => self.checkout(),
        }
    }

    /// Adds one unit of a product + variant combination.
    ///
    /// The unit price is resolved from, in order: the selected size's catalog
    /// price, the trigger's own price, the catalog base price, and the price
    /// text shown next to the product. Weight comes from the selected size,
    /// else the product. When the line already exists only its quantity
    /// grows; the price locked in by the first add is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PriceNotFound`] when no positive price resolves,
    /// [`CartError::MissingName`] for a blank name, and [`CartError::Store`]
    /// if persisting fails. The cart is unchanged in every error case.
    pub fn add_to_cart(&mut self, request: AddToCart) -> Result<Outcome, CartError> {
        if request.name.trim().is_empty() {
            return Err(CartError::MissingName);
        }

        let product = self.catalog.find(&request.name);
        let size = request
            .selection
            .size
            .as_deref()
            .and_then(|label| product?.size(label));

        let Some(unit_price) = resolve_price(&request, product, size) else {
            tracing::warn!(name = %request.name, "add to cart aborted: price not found");
            return Err(CartError::PriceNotFound { name: request.name });
        };
        let unit_weight = size
            .and_then(|s| s.weight)
            .or_else(|| product.and_then(|p| p.weight));

        let key = compose_key(&request.name, &request.selection.labels());

        let mut next = self.cart.clone();
        if let Some(line) = next.get_mut(&key) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            next.upsert(LineItem {
                key: key.clone(),
                unit_price,
                quantity: 1,
                unit_weight,
            });
        }

        let totals = self.commit(next)?;
        tracing::debug!(key = %key, total = %totals.price, "added to cart");

        Ok(Outcome {
            open_panel: true,
            ..Outcome::persisted(totals)
        })
    }

    /// Adds one to an existing line. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if persisting fails.
    pub fn increment(&mut self, key: &str) -> Result<Outcome, CartError> {
        let mut next = self.cart.clone();
        let Some(line) = next.get_mut(key) else {
            return Ok(self.ignore(key, "increment"));
        };
        line.quantity = line.quantity.saturating_add(1);

        Ok(Outcome::persisted(self.commit(next)?))
    }

    /// Takes one off an existing line, removing it when it was the last.
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if persisting fails.
    pub fn decrement(&mut self, key: &str) -> Result<Outcome, CartError> {
        let mut next = self.cart.clone();
        let Some(line) = next.get_mut(key) else {
            return Ok(self.ignore(key, "decrement"));
        };

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            next.remove(key);
        }

        Ok(Outcome::persisted(self.commit(next)?))
    }

    /// Deletes a line. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if persisting fails.
    pub fn remove(&mut self, key: &str) -> Result<Outcome, CartError> {
        let mut next = self.cart.clone();
        if next.remove(key).is_none() {
            return Ok(self.ignore(key, "remove"));
        }

        Ok(Outcome::persisted(self.commit(next)?))
    }

    /// Empties the cart once the user has confirmed; otherwise does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if persisting fails.
    pub fn clear(&mut self, confirmed: bool) -> Result<Outcome, CartError> {
        if !confirmed {
            tracing::debug!("clear cart declined");
            return Ok(Outcome::unchanged(self.totals()));
        }

        Ok(Outcome::persisted(self.commit(Cart::new())?))
    }

    /// Publishes the total and a snapshot of the cart for the checkout page,
    /// then asks for navigation there. The cart itself is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] if either write fails.
    pub fn checkout(&mut self) -> Result<Outcome, CartError> {
        let totals = self.totals();
        self.store.publish_total(totals.price)?;
        self.store.publish_snapshot(&self.cart)?;

        tracing::info!(
            lines = self.cart.len(),
            items = totals.item_count,
            total = %totals.price,
            "checkout snapshot published"
        );

        Ok(Outcome {
            navigate_to: Some(self.checkout_location.clone()),
            ..Outcome::persisted(totals)
        })
    }

    fn commit(&mut self, next: Cart) -> Result<Totals, CartError> {
        self.store.save(&next)?;

        let totals = aggregate::totals(&next);
        if let Err(e) = self.store.publish_total(totals.price) {
            if let Err(restore) = self.store.save(&self.cart) {
                tracing::warn!(
                    error = %restore,
                    "failed to restore previous cart after total write failed"
                );
            }
            return Err(e.into());
        }

        self.cart = next;
        Ok(totals)
    }

    fn ignore(&self, key: &str, operation: &str) -> Outcome {
        tracing::debug!(key, operation, "no cart line with this key; ignoring");
        Outcome::unchanged(self.totals())
    }
}

fn resolve_price(
    request: &AddToCart,
    product: Option<&Product>,
    size: Option<&SizeOption>,
) -> Option<Decimal> {
    size.and_then(|s| s.price)
        .and_then(usable_price)
        .or_else(|| {
            request
                .price
                .as_deref()
                .and_then(parse_price)
                .and_then(usable_price)
        })
        .or_else(|| product.and_then(|p| usable_price(p.price)))
        .or_else(|| {
            request
                .display_price
                .as_deref()
                .and_then(parse_price)
                .and_then(usable_price)
        })
}

/// Rounds to cents and rejects anything that does not stay positive.
fn usable_price(price: Decimal) -> Option<Decimal> {
    let rounded = round_money(price);
    (rounded > Decimal::ZERO).then_some(rounded)
}
