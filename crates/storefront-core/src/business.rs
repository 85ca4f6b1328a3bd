//! # Business Configuration
//!
//! Locale and currency rules used to render prices for shoppers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BusinessConfig { locale: "de-DE", currency: "EUR" }                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  LocaleCurrencyFormatter ──► Money(123456) ──► "1.234,56 €"            │
//! │         ▲                                                               │
//! │         │ implements                                                    │
//! │  CurrencyFormatter (trait) ◄── tests inject a fixed formatter          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Formatter Seam
// =============================================================================

/// Renders an amount for display. Injected wherever prices are formatted so
/// tests can pin locale and currency.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Money) -> String;
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Money) -> String + Send + Sync,
{
    fn format(&self, amount: Money) -> String {
        self(amount)
    }
}

/// Shared, type-erased formatter handle.
pub type SharedFormatter = Arc<dyn CurrencyFormatter>;

// =============================================================================
// Business Config
// =============================================================================

/// Locale and currency of the business running the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfig {
    /// BCP 47 tag such as `en-US`.
    pub locale: String,

    /// ISO 4217 code such as `USD`.
    pub currency_code: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        BusinessConfig {
            locale: "en-US".to_string(),
            currency_code: "USD".to_string(),
        }
    }
}

impl BusinessConfig {
    /// Creates a validated config. Currency codes are upper-cased.
    pub fn new(locale: impl Into<String>, currency_code: impl Into<String>) -> CoreResult<Self> {
        let config = BusinessConfig {
            locale: locale.into(),
            currency_code: currency_code.into().to_ascii_uppercase(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let code = &self.currency_code;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(CoreError::InvalidCurrency(code.clone()));
        }

        let mut parts = self.locale.split(['-', '_']);
        let language_ok = parts
            .next()
            .is_some_and(|l| (2..=3).contains(&l.len()) && l.bytes().all(|b| b.is_ascii_alphabetic()));
        let region_ok = parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()));
        if !language_ok || !region_ok {
            return Err(CoreError::InvalidLocale(self.locale.clone()));
        }

        Ok(())
    }

    /// Builds the formatter for this locale/currency pair.
    pub fn formatter(&self) -> LocaleCurrencyFormatter {
        LocaleCurrencyFormatter::new(self)
    }

    /// Same as [`formatter`](Self::formatter), behind a shared handle.
    pub fn shared_formatter(&self) -> SharedFormatter {
        Arc::new(self.formatter())
    }
}

// =============================================================================
// Locale Formatter
// =============================================================================

/// Number layout conventions of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleConventions {
    decimal: char,
    group: char,
    symbol_first: bool,
    symbol_spaced: bool,
}

const EN: LocaleConventions = LocaleConventions {
    decimal: '.',
    group: ',',
    symbol_first: true,
    symbol_spaced: false,
};

fn conventions_for(locale: &str) -> LocaleConventions {
    let normalized = locale.replace('_', "-").to_ascii_lowercase();
    match normalized.as_str() {
        "de-de" | "de-at" | "es-es" | "it-it" => LocaleConventions {
            decimal: ',',
            group: '.',
            symbol_first: false,
            symbol_spaced: true,
        },
        "fr-fr" | "fr-ca" => LocaleConventions {
            decimal: ',',
            group: '\u{202f}',
            symbol_first: false,
            symbol_spaced: true,
        },
        "nl-nl" => LocaleConventions {
            decimal: ',',
            group: '.',
            symbol_first: true,
            symbol_spaced: true,
        },
        _ => EN,
    }
}

fn symbol_for(currency_code: &str) -> &str {
    match currency_code {
        "USD" | "CAD" | "AUD" | "NZD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

/// Formats amounts following a locale's separators and symbol placement.
#[derive(Clone, PartialEq, Eq)]
pub struct LocaleCurrencyFormatter {
    conventions: LocaleConventions,
    symbol: String,
}

impl LocaleCurrencyFormatter {
    pub fn new(config: &BusinessConfig) -> Self {
        LocaleCurrencyFormatter {
            conventions: conventions_for(&config.locale),
            symbol: symbol_for(&config.currency_code).to_string(),
        }
    }

    fn group_digits(&self, whole: u64) -> String {
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.conventions.group);
            }
            grouped.push(ch);
        }
        grouped
    }
}

impl fmt::Debug for LocaleCurrencyFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCurrencyFormatter")
            .field("symbol", &self.symbol)
            .field("decimal", &self.conventions.decimal)
            .finish()
    }
}

impl CurrencyFormatter for LocaleCurrencyFormatter {
    fn format(&self, amount: Money) -> String {
        let cents = amount.cents().unsigned_abs();
        let number = format!(
            "{}{}{:02}",
            self.group_digits(cents / 100),
            self.conventions.decimal,
            cents % 100
        );
        let space = if self.conventions.symbol_spaced { " " } else { "" };
        let sign = if amount.is_negative() { "-" } else { "" };

        if self.conventions.symbol_first {
            format!("{sign}{}{space}{number}", self.symbol)
        } else {
            format!("{sign}{number}{space}{}", self.symbol)
        }
    }
}
