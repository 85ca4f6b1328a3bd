//! # storefront-core: Pure Logic for the Storefront Ordering Layer
//!
//! This crate holds everything about carts, menus and prices that can be
//! computed without touching the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI                                │   │
//! │  │    Location ──► Menu ──► Cart ──► Checkout                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        storefront-client (sessions, CartStore, menus)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ business  │  │   │
//! │  │   │   Cart    │  │   Money   │  │ item/sub  │  │ locale +  │  │   │
//! │  │   │   Menu    │  │  parsing  │  │  totals   │  │ currency  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire/domain types (Cart, CartItem, MenuBundle, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - `parse_price`, item totals, subtotals, `PriceCalculator`
//! - [`business`] - `BusinessConfig` and the `CurrencyFormatter` seam
//! - [`validation`] - Checks for ids and schedule values
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::pricing::{calculate_subtotal, PriceCalculator};
//! use storefront_core::{CartItem, PriceInput};
//!
//! let items = vec![CartItem {
//!     price: Some(PriceInput::from("$4.50")),
//!     quantity: 2,
//!     ..Default::default()
//! }];
//!
//! let calc = PriceCalculator::default();
//! assert_eq!(calc.format_price(calculate_subtotal(&items)), "$9.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod business;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use business::{BusinessConfig, CurrencyFormatter, LocaleCurrencyFormatter, SharedFormatter};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, UnitPrice};
pub use pricing::{
    calculate_item_price, calculate_subtotal, format_price, parse_price, parse_unit_price, CartTotals,
    PriceCalculator,
};
pub use types::*;
