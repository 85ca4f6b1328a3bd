//! # Price Calculator
//!
//! Pure money math over cart data: parsing wire prices, item totals,
//! subtotals and display formatting.
//!
//! ## Item Price Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base      = item.price ?? item.menuItem.price ?? 0                     │
//! │  modifiers = Σ modifier.price ?? 0                                      │
//! │  total     = max(0, (base + modifiers) × quantity)                      │
//! │                                                                         │
//! │  Unit prices keep six decimals; the total rounds to cents once.        │
//! │                                                                         │
//! │  Example: Latte $4.50 + Oat milk $0.75, qty 2                           │
//! │           (450 + 75) × 2 = 1050 cents = $10.50                          │
//! │  Example: $0.335, qty 3 = $1.005 → 101 cents                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here fails: a price that cannot be read counts as zero, and
//! totals never go below zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::business::{BusinessConfig, CurrencyFormatter, SharedFormatter};
use crate::money::{Money, UnitPrice};
use crate::types::{Cart, CartItem, PriceInput};

// =============================================================================
// Parsing
// =============================================================================

/// Returns the longest leading slice of `s` that reads as a decimal number.
fn decimal_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    (digits > 0).then(|| &s[..end])
}

/// Parses a wire price at full precision.
///
/// Numbers are taken as is. Strings are stripped of every character that is
/// not a digit, `.` or `-`, then the leading decimal is read. Anything that
/// cannot be read becomes zero.
pub fn parse_unit_price(input: impl Into<PriceInput>) -> UnitPrice {
    match input.into() {
        PriceInput::Amount(amount) => UnitPrice::from_major_f64(amount),
        PriceInput::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            decimal_prefix(&cleaned)
                .and_then(UnitPrice::from_decimal_str)
                .unwrap_or_default()
        }
    }
}

/// Parses a wire price into [`Money`], rounded to cents.
///
/// ```rust
/// use storefront_core::pricing::parse_price;
/// use storefront_core::Money;
///
/// assert_eq!(parse_price("$12.99"), Money::from_cents(1299));
/// assert_eq!(parse_price("abc"), Money::zero());
/// assert_eq!(parse_price(5), Money::from_cents(500));
/// ```
pub fn parse_price(input: impl Into<PriceInput>) -> Money {
    parse_unit_price(input).to_money()
}

fn parse_optional(price: Option<&PriceInput>) -> Option<UnitPrice> {
    price.map(|p| parse_unit_price(p.clone()))
}

// =============================================================================
// Totals
// =============================================================================

/// Unit price of an item before modifiers.
///
/// The item's own price wins; the menu item's price is only a fallback for
/// items the server has not priced yet.
pub fn base_price(item: &CartItem) -> UnitPrice {
    parse_optional(item.price.as_ref())
        .or_else(|| parse_optional(item.menu_item.as_ref().and_then(|m| m.price.as_ref())))
        .unwrap_or_default()
}

/// Sum of modifier prices for one unit of the item.
pub fn modifiers_total(item: &CartItem) -> UnitPrice {
    item.modifiers
        .iter()
        .map(|m| parse_optional(m.price.as_ref()).unwrap_or_default())
        .sum()
}

/// `(base + modifiers) × quantity` rounded to cents, never negative.
pub fn calculate_item_price(item: &CartItem) -> Money {
    (base_price(item) + modifiers_total(item))
        .multiply_quantity(item.quantity)
        .to_money()
        .clamp_non_negative()
}

/// Sum of [`calculate_item_price`] over all items; zero for an empty list.
pub fn calculate_subtotal(items: &[CartItem]) -> Money {
    items.iter().map(calculate_item_price).sum()
}

/// Formats an amount through the injected formatter.
pub fn format_price(amount: Money, formatter: &dyn CurrencyFormatter) -> String {
    formatter.format(amount)
}

// =============================================================================
// Calculator
// =============================================================================

/// Bundles the pure price functions with the formatter the UI should use.
#[derive(Clone)]
pub struct PriceCalculator {
    formatter: SharedFormatter,
}

impl PriceCalculator {
    /// Uses the locale/currency of the given business.
    pub fn new(config: &BusinessConfig) -> Self {
        PriceCalculator {
            formatter: config.shared_formatter(),
        }
    }

    /// Uses an explicit formatter (tests pin locale/currency this way).
    pub fn with_formatter(formatter: SharedFormatter) -> Self {
        PriceCalculator { formatter }
    }

    pub fn parse_price(&self, input: impl Into<PriceInput>) -> Money {
        parse_price(input)
    }

    pub fn item_price(&self, item: &CartItem) -> Money {
        calculate_item_price(item)
    }

    pub fn subtotal(&self, items: &[CartItem]) -> Money {
        calculate_subtotal(items)
    }

    pub fn format_price(&self, amount: Money) -> String {
        format_price(amount, self.formatter.as_ref())
    }

    /// Formatted total of one item, as shown next to it in the cart.
    pub fn format_item_price(&self, item: &CartItem) -> String {
        self.format_price(self.item_price(item))
    }

    pub fn totals(&self, cart: &Cart) -> CartTotals {
        CartTotals::from(cart)
    }
}

impl Default for PriceCalculator {
    fn default() -> Self {
        PriceCalculator::new(&BusinessConfig::default())
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.items.len(),
            total_quantity: cart
                .items
                .iter()
                .fold(0i64, |total, i| total.saturating_add(i.quantity.max(0))),
            subtotal: calculate_subtotal(&cart.items),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{MenuItemRef, Modifier};

    fn item(price: Option<PriceInput>, quantity: i64) -> CartItem {
        CartItem {
            price,
            quantity,
            ..Default::default()
        }
    }

    fn modifier(price: impl Into<PriceInput>) -> Modifier {
        Modifier {
            price: Some(price.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_price_examples() {
        assert_eq!(parse_price("$12.99"), Money::from_cents(1299));
        assert_eq!(parse_price("abc"), Money::zero());
        assert_eq!(parse_price(5), Money::from_cents(500));
        assert_eq!(parse_price(4.25), Money::from_cents(425));
    }

    #[test]
    fn test_parse_price_lenient_strings() {
        assert_eq!(parse_price("USD 1,234.50"), Money::from_cents(123450));
        assert_eq!(parse_price("-$3.10"), Money::from_cents(-310));
        assert_eq!(parse_price("1.2.3"), Money::from_cents(120));
        assert_eq!(parse_price("5-2"), Money::from_cents(500));
        assert_eq!(parse_price("--5"), Money::zero());
        assert_eq!(parse_price(""), Money::zero());
        assert_eq!(parse_price("."), Money::zero());
        assert_eq!(parse_price(f64::NAN), Money::zero());
    }

    #[test]
    fn test_item_price_without_modifiers_is_base_times_quantity() {
        for (cents, qty) in [(0, 3), (1299, 1), (450, 2), (99, 7)] {
            let it = item(Some(PriceInput::Amount(cents as f64 / 100.0)), qty);
            assert_eq!(calculate_item_price(&it), Money::from_cents(cents).multiply_quantity(qty));
        }
    }

    #[test]
    fn test_item_price_with_modifiers() {
        let mut latte = item(Some("4.50".into()), 2);
        latte.modifiers = vec![modifier("0.75"), modifier(0.25), Modifier::default()];

        // (450 + 75 + 25 + 0) × 2
        assert_eq!(calculate_item_price(&latte), Money::from_cents(1100));
    }

    #[test]
    fn test_sub_cent_unit_prices_round_once_per_item() {
        assert_eq!(calculate_item_price(&item(Some("0.335".into()), 3)), Money::from_cents(101));
        assert_eq!(calculate_item_price(&item(Some(PriceInput::Amount(0.125)), 8)), Money::from_cents(100));

        let mut with_mod = item(Some("$1.0025".into()), 4);
        with_mod.modifiers = vec![modifier(0.0025)];
        // (1.0025 + 0.0025) × 4 = 4.02
        assert_eq!(calculate_item_price(&with_mod), Money::from_cents(402));

        assert_eq!(parse_price("0.335"), Money::from_cents(34));
        assert_eq!(parse_unit_price("0.335").micros(), 335_000);
    }

    #[test]
    fn test_menu_item_price_is_fallback_only() {
        let mut it = item(None, 2);
        it.menu_item = Some(MenuItemRef {
            price: Some("$3.00".into()),
            ..Default::default()
        });
        assert_eq!(calculate_item_price(&it), Money::from_cents(600));

        it.price = Some(PriceInput::Amount(2.5));
        assert_eq!(calculate_item_price(&it), Money::from_cents(500));

        let bare = item(None, 4);
        assert_eq!(calculate_item_price(&bare), Money::zero());
    }

    #[test]
    fn test_item_price_never_negative() {
        let refund = item(Some("-5.00".into()), 1);
        assert_eq!(calculate_item_price(&refund), Money::zero());

        let weird_qty = item(Some(PriceInput::Amount(3.0)), -2);
        assert_eq!(calculate_item_price(&weird_qty), Money::zero());
    }

    #[test]
    fn test_subtotal_is_sum_of_items() {
        assert_eq!(calculate_subtotal(&[]), Money::zero());

        let mut with_mod = item(Some(PriceInput::Amount(10.0)), 1);
        with_mod.modifiers = vec![modifier("1.50")];
        let items = vec![item(Some("$2.00".into()), 3), with_mod, item(Some("garbage".into()), 9)];

        let expected: Money = items.iter().map(calculate_item_price).sum();
        assert_eq!(calculate_subtotal(&items), expected);
        assert_eq!(expected, Money::from_cents(600 + 1150));
    }

    #[test]
    fn test_calculator_uses_injected_formatter() {
        let calc = PriceCalculator::with_formatter(Arc::new(|m: Money| format!("USD {}", m)));
        assert_eq!(calc.format_price(Money::from_cents(1299)), "USD 12.99");

        let default_calc = PriceCalculator::default();
        assert_eq!(default_calc.format_price(Money::from_cents(1299)), "$12.99");
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart {
            id: "c_1".into(),
            items: vec![item(Some(PriceInput::Amount(1.0)), 2), item(Some(PriceInput::Amount(2.0)), 1)],
            ..Default::default()
        };
        let totals = PriceCalculator::default().totals(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_cents(400));

        let huge = Cart {
            id: "c_2".into(),
            items: vec![item(None, i64::MAX), item(None, 5)],
            ..Default::default()
        };
        assert_eq!(CartTotals::from(&huge).total_quantity, i64::MAX);
    }
}
