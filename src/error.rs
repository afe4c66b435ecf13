//! Error types for the pricing engine.

use crate::cards::CardRegion;
use thiserror::Error;

/// Errors raised by configuration validation and quote computation.
///
/// A quote either produces a complete breakdown or one of these errors;
/// there is no partial result to recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The asking price was negative.
    #[error("price must be a non-negative amount of cents, got {0}")]
    InvalidPrice(i64),

    /// The service fee percentage was non-positive, non-finite, or below
    /// the misconfiguration floor.  Marketplace fees are expressed in
    /// percentage points (6.5 means 6.5%); a value under 1 is almost
    /// certainly a fraction passed where points were expected and would
    /// silently undercharge by two orders of magnitude.
    #[error(
        "service fee must be at least {min} percentage points, got {got} \
         (a value below 1 usually means a fraction like 0.065 was passed \
         where 6.5 was intended)"
    )]
    InvalidServiceFee { got: f64, min: f64 },

    /// The VAT rate was negative or non-finite.  VAT rates are fractions
    /// (0.20 means 20%).
    #[error("VAT rate must be a non-negative fraction, got {0}")]
    InvalidVatRate(f64),

    /// A card profile carried an out-of-range fee component.
    #[error("card profile {region:?} is invalid: {reason}")]
    InvalidCardProfile { region: CardRegion, reason: String },
}
