//! # Pricing
//!
//! Line-item pricing and the platform's application fee.
//!
//! All amounts are in the smallest currency unit. The configured base
//! price and the requested quantity are both parsed at 32-bit float
//! precision, then multiplied in 64-bit and truncated toward zero:
//!
//! ```text
//! unit_amount     = trunc(base_price)
//! application_fee = trunc(base_price * quantity * 0.10)
//! ```

use crate::error::{ConnectError, ConnectResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Share of the gross amount kept by the platform.
pub const APPLICATION_FEE_RATE: f64 = 0.10;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 currency code in Stripe's lowercase form
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            other => Err(ConnectError::Configuration(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

/// Base price of one unit, as configured.
///
/// Keeps the raw decimal string so `/config` can echo it back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePrice {
    raw: String,
    value: f32,
}

impl BasePrice {
    /// The configured string, verbatim
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed value at 32-bit precision
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Unit amount in minor units: `trunc(base_price)`
    pub fn unit_amount(&self) -> i64 {
        self.value as i64
    }
}

impl FromStr for BasePrice {
    type Err = ConnectError;

    fn from_str(s: &str) -> ConnectResult<Self> {
        let value: f32 = s.trim().parse().map_err(|_| {
            ConnectError::Configuration(format!("BASE_PRICE is not a decimal number: {:?}", s))
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(ConnectError::Configuration(format!(
                "BASE_PRICE must be a non-negative amount: {:?}",
                s
            )));
        }

        Ok(Self {
            raw: s.to_string(),
            value,
        })
    }
}

/// Requested quantity, parsed leniently from a form field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quantity(f32);

impl Quantity {
    /// Parse a form value. Anything that is not a finite, non-negative
    /// number becomes zero; the second value reports whether that happened.
    pub fn parse_lenient(raw: &str) -> (Self, bool) {
        match raw.trim().parse::<f32>() {
            Ok(q) if q.is_finite() && q >= 0.0 => (Self(q), false),
            _ => (Self(0.0), true),
        }
    }

    /// Quantity as requested, before truncation
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Whole units sent as the line-item quantity
    pub fn line_quantity(&self) -> i64 {
        self.0 as i64
    }
}

impl From<u32> for Quantity {
    fn from(q: u32) -> Self {
        Self(q as f32)
    }
}

/// Amounts sent to the gateway for one checkout line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutPricing {
    /// Price of one unit in minor units
    pub unit_amount: i64,
    /// Whole units purchased
    pub quantity: i64,
    /// Platform fee skimmed from the connected account's charge
    pub application_fee: i64,
}

impl CheckoutPricing {
    pub fn compute(base_price: &BasePrice, quantity: Quantity) -> Self {
        let gross = f64::from(base_price.value()) * f64::from(quantity.value());
        Self {
            unit_amount: base_price.unit_amount(),
            quantity: quantity.line_quantity(),
            application_fee: (gross * APPLICATION_FEE_RATE) as i64,
        }
    }
}
