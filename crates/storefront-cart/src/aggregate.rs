use rust_decimal::Decimal;

use crate::cart::{Cart, LineItem};
use crate::normalize::round_money;

/// Derived figures for a cart, always recomputed from the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// `round2(sum(unit_price * quantity))`.
    pub price: Decimal,
    /// Same reduction over weights; `None` when no line carries a weight.
    pub weight: Option<Decimal>,
    /// Sum of quantities.
    pub item_count: u64,
}

impl Totals {
    pub const EMPTY: Totals = Totals {
        price: Decimal::ZERO,
        weight: None,
        item_count: 0,
    };
}

#[must_use]
pub fn totals(cart: &Cart) -> Totals {
    // Sums saturate so oversized carts report Decimal::MAX instead of panicking.
    let price = cart
        .iter()
        .map(LineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let weight = cart
        .iter()
        .filter_map(LineItem::line_weight)
        .fold(None, |acc: Option<Decimal>, w| {
            Some(acc.unwrap_or_default().saturating_add(w))
        });

    let item_count = cart.iter().map(|item| u64::from(item.quantity)).sum();

    Totals {
        price: round_money(price),
        weight: weight.map(round_money),
        item_count,
    }
}
