//! Key canonicalization and defensive money parsing.
//!
//! Keys look like `"Base (variant1, variant2)"`. Earlier writers could append
//! the same suffix twice (`"Shirt (Red) (Red)"`), so every key is collapsed to
//! its canonical form before it is used or stored.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Leading numeric prefix, mirroring how a browser's `parseFloat` reads a
/// string that has already been stripped to digits, dots, and minus signs.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d+(?:\.\d+)?|\.\d+)").expect("valid numeric prefix regex")
});

/// Collapses runs of identical adjacent parenthetical groups into one.
///
/// Groups separated only by whitespace count as adjacent. Non-adjacent
/// repeats (`"A (x) (y) (x)"`) are left alone and trailing whitespace is
/// dropped. The result is a fixed point:
/// `canonical_key(&canonical_key(k)) == canonical_key(k)`.
#[must_use]
pub fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut last_group: Option<&str> = None;
    let mut rest = key;

    while let Some(open) = rest.find('(') {
        let Some(close_rel) = rest[open..].find(')') else {
            break;
        };
        let close = open + close_rel;
        let gap = &rest[..open];
        let group = &rest[open..=close];

        let duplicate = last_group == Some(group) && gap.trim().is_empty();

        if !duplicate {
            out.push_str(gap);
            out.push_str(group);
            last_group = Some(group);
        }

        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out.truncate(out.trim_end().len());
    out
}

/// Builds a cart key from a base name and the selected variant labels, in
/// selection order, then canonicalizes it.
///
/// Blank labels are skipped; with no labels the base name is returned as is.
#[must_use]
pub fn compose_key<S: AsRef<str>>(base: &str, labels: &[S]) -> String {
    let labels: Vec<&str> = labels
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect();

    if labels.is_empty() {
        return canonical_key(base);
    }

    canonical_key(&format!("{base} ({})", labels.join(", ")))
}

/// Parses a price out of loosely formatted text such as `"$12.99"` or
/// `"USD 1,299.50"`.
///
/// Everything except digits, `.` and `-` is stripped first, then the longest
/// leading number is read. Returns `None` when nothing numeric remains.
/// Callers decide whether zero or negative values are acceptable.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let matched = NUMERIC_PREFIX.find(&stripped)?.as_str();
    let literal = match matched.strip_prefix('-') {
        Some(abs) if abs.starts_with('.') => format!("-0{abs}"),
        None if matched.starts_with('.') => format!("0{matched}"),
        _ => matched.to_string(),
    };

    Decimal::from_str(&literal).ok()
}

/// Reads a price from a persisted JSON value, which may be a number or a
/// string written by an older version of the cart.
#[must_use]
pub fn parse_price_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_price(&n.to_string()),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

/// Rounds a money amount to two fractional digits, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
