//! Plain-text rendering of the cart, standing in for the cart side panel.

use storefront_cart::{Cart, LineItem, Totals};

pub(crate) fn format_line(item: &LineItem) -> String {
    format!("{} - ${:.2} (x{})", item.key, item.unit_price, item.quantity)
}

pub(crate) fn format_totals(totals: &Totals) -> String {
    match totals.weight {
        Some(weight) => format!("Total: ${:.2} (weight {weight:.2})", totals.price),
        None => format!("Total: ${:.2}", totals.price),
    }
}

pub(crate) fn print_cart(cart: &Cart, totals: &Totals) {
    if cart.is_empty() {
        println!("cart is empty");
    }
    for item in cart {
        println!("{}", format_line(item));
    }
    println!("{}", format_totals(totals));
}
