//! # Domain Types
//!
//! Wire and domain types shared by the storefront client and the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Location     │   │      Cart       │   │   MenuBundle    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  cartId         │   │  menus[]        │       │
//! │  │  immediate?     │   │  orderDate?     │   │   categories[]  │       │
//! │  │  scheduled?     │   │  orderTime?     │   │    products[]   │       │
//! │  └─────────────────┘   │  items[]        │   │  popular[]      │       │
//! │                        └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │    CartItem     │──►│    Modifier     │       │
//! │                        │  price?         │   │  price?         │       │
//! │                        │  quantity       │   │  items[]        │       │
//! │                        │  menuItem?      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server owns every cart; the client only holds a cached copy. Field
//! names follow the commerce API (camelCase on the wire).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Price Input
// =============================================================================

/// A price as it arrives on the wire: either a JSON number or a display
/// string such as `"$12.99"`.
///
/// Use [`crate::pricing::parse_price`] to turn it into [`crate::Money`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum PriceInput {
    Amount(f64),
    Text(String),
}

impl From<f64> for PriceInput {
    fn from(amount: f64) -> Self {
        PriceInput::Amount(amount)
    }
}

impl From<i32> for PriceInput {
    fn from(amount: i32) -> Self {
        PriceInput::Amount(f64::from(amount))
    }
}

impl From<i64> for PriceInput {
    fn from(amount: i64) -> Self {
        PriceInput::Amount(amount as f64)
    }
}

impl From<&str> for PriceInput {
    fn from(text: &str) -> Self {
        PriceInput::Text(text.to_string())
    }
}

impl From<String> for PriceInput {
    fn from(text: String) -> Self {
        PriceInput::Text(text)
    }
}

// =============================================================================
// Location
// =============================================================================

/// A physical location shoppers order from. Supplied externally, read only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,

    /// ASAP orders are accepted.
    #[serde(default)]
    pub allows_immediate_ordering: bool,

    /// Orders for a later date/time are accepted.
    #[serde(default)]
    pub allows_scheduled_ordering: bool,
}

impl Location {
    /// Returns true if the location takes orders of any kind.
    pub fn accepts_orders(&self) -> bool {
        self.allows_immediate_ordering || self.allows_scheduled_ordering
    }
}

// =============================================================================
// Ordering Session
// =============================================================================

/// Body of `POST /api/v1/locations/{locationId}/ordering-sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderingSessionRequest {
    /// Query parameters of the page that started the session (UTM tags, table
    /// numbers, ...). Forwarded untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_params: Option<BTreeMap<String, String>>,

    /// Cart to resume instead of minting a new one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_cart_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_id: Option<String>,
}

/// Server projection of an ordering session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderingSessionResponse {
    #[serde(default)]
    pub cart_id: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,
}

/// Result of starting (or resuming) an ordering session.
///
/// Exactly one of the two is meaningful: on success `error_message` is empty
/// and `cart_id` holds a non-empty token; on failure `cart_id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderingSessionOutcome {
    pub cart_id: Option<String>,
    pub error_message: String,
}

impl OrderingSessionOutcome {
    pub fn success(cart_id: impl Into<String>) -> Self {
        OrderingSessionOutcome {
            cart_id: Some(cart_id.into()),
            error_message: String::new(),
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        OrderingSessionOutcome {
            cart_id: None,
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_message.is_empty() && self.cart_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The order date/time a shopper picked. Both parts are opaque strings
/// embedded verbatim into menu requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub order_date: String,
    pub order_time: String,
}

/// Cached copy of a server-owned cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "cartId")]
    pub id: String,

    #[serde(default)]
    pub order_date: Option<String>,

    #[serde(default)]
    pub order_time: Option<String>,

    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Returns the schedule once both date and time are chosen.
    ///
    /// A half-filled schedule is "not ready yet", not an error.
    pub fn schedule(&self) -> Option<Schedule> {
        let order_date = self.order_date.as_deref().filter(|d| !d.is_empty())?;
        let order_time = self.order_time.as_deref().filter(|t| !t.is_empty())?;
        Some(Schedule {
            order_date: order_date.to_string(),
            order_time: order_time.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The menu product a cart item was created from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Fallback price, used only until the item's own price is populated.
    #[serde(default)]
    pub price: Option<PriceInput>,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Authoritative unit price from the server, when populated.
    #[serde(default)]
    pub price: Option<PriceInput>,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    #[serde(default)]
    pub menu_item: Option<MenuItemRef>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

fn default_quantity() -> i64 {
    1
}

impl Default for CartItem {
    fn default() -> Self {
        CartItem {
            id: None,
            name: None,
            price: None,
            quantity: default_quantity(),
            menu_item: None,
            modifiers: Vec::new(),
        }
    }
}

/// A priced add-on attached to a cart item (e.g. extra topping).
///
/// The modifier's own `price` counts once per unit of the item; the nested
/// `items` describe the selection for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<PriceInput>,

    #[serde(default)]
    pub items: Vec<ModifierItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ModifierItem {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<PriceInput>,
}

// =============================================================================
// Menus
// =============================================================================

/// Menus valid for one order date/time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuBundle {
    #[serde(default)]
    pub menus: Vec<Menu>,

    #[serde(default)]
    pub popular_products: Vec<BundleProduct>,
}

impl MenuBundle {
    /// Iterates every product of every category of every menu.
    pub fn products(&self) -> impl Iterator<Item = &BundleProduct> {
        self.menus
            .iter()
            .flat_map(|menu| menu.categories.iter())
            .flat_map(|category| category.products.iter())
    }

    /// Finds a product by id across all menus.
    pub fn find_product(&self, product_id: &str) -> Option<&BundleProduct> {
        self.products().find(|p| p.id == product_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub categories: Vec<MenuCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub products: Vec<BundleProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleProduct {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: Option<PriceInput>,
}
