use crate::aggregate::Totals;

/// Variant controls chosen next to an add-to-cart trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSelection {
    /// Size label; may carry price and weight overrides in the catalog.
    pub size: Option<String>,
    /// Color label; only affects the line key.
    pub color: Option<String>,
}

impl VariantSelection {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Selected labels in key order: size first, then color.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Payload of an add-to-cart trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddToCart {
    /// Base product name as rendered on the trigger.
    pub name: String,
    /// Raw price carried by the trigger itself (e.g. `data-price`).
    pub price: Option<String>,
    /// Price text rendered next to the product, read only as a last resort.
    pub display_price: Option<String>,
    pub selection: VariantSelection,
}

impl AddToCart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    #[must_use]
    pub fn with_display_price(mut self, text: impl Into<String>) -> Self {
        self.display_price = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.selection.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.selection.color = Some(color.into());
        self
    }
}

/// A user intent routed to the cart engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddToCart(AddToCart),
    Increment { key: String },
    Decrement { key: String },
    Remove { key: String },
    /// `confirmed` is the answer of the yes/no gate shown before clearing.
    Clear { confirmed: bool },
    Checkout,
}

/// What the view and navigation layers should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub totals: Totals,
    /// Whether anything was written to the store.
    pub persisted: bool,
    /// Open the cart side panel.
    pub open_panel: bool,
    /// Navigate to this location.
    pub navigate_to: Option<String>,
}

impl Outcome {
    pub(crate) fn unchanged(totals: Totals) -> Self {
        Self {
            totals,
            persisted: false,
            open_panel: false,
            navigate_to: None,
        }
    }

    pub(crate) fn persisted(totals: Totals) -> Self {
        Self {
            persisted: true,
            ..Self::unchanged(totals)
        }
    }
}
