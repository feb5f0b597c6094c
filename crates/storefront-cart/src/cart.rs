use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One cart line: a distinct product + variant combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Canonical display key, e.g. `"Shirt (M, Red)"`.
    pub key: String,
    /// Always positive, rounded to two fractional digits.
    pub unit_price: Decimal,
    /// Always at least 1; a line reaching zero is removed instead.
    pub quantity: u32,
    /// Absent weight counts as zero in aggregates.
    pub unit_weight: Option<Decimal>,
}

impl LineItem {
    /// `unit_price * quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    #[must_use]
    pub fn line_weight(&self) -> Option<Decimal> {
        self.unit_weight
            .map(|w| w.saturating_mul(Decimal::from(self.quantity)))
    }
}

/// Line items keyed by [`LineItem::key`], unique, kept in insertion order so
/// display order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.key == key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `item`, replacing an existing line with the same key in place.
    /// Returns the replaced line, if any.
    pub fn upsert(&mut self, item: LineItem) -> Option<LineItem> {
        match self.get_mut(&item.key) {
            Some(existing) => Some(std::mem::replace(existing, item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<LineItem> {
        let idx = self.items.iter().position(|item| item.key == key)?;
        Some(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Persisted shape of a line: `{ "price": 9.99, "quantity": 2, "weight": 0.3 }`.
#[derive(Serialize)]
struct StoredLine {
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    quantity: u32,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    weight: Option<Decimal>,
}

/// Serializes as the `{ key: { price, quantity, weight? } }` mapping read by
/// the checkout page.
impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(
                &item.key,
                &StoredLine {
                    price: item.unit_price,
                    quantity: item.quantity,
                    weight: item.unit_weight,
                },
            )?;
        }
        map.end()
    }
}
