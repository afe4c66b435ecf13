//! Pricing configuration.
//!
//! The service-fee rate and VAT rate come from the environment, but the
//! pure calculation functions never read the environment themselves:
//! the binary resolves the variables once, validates them here, and
//! passes the resulting [`PricingConfig`] value down.  Validation at
//! this boundary is what guards the percentage-points invariant — a
//! service fee of `0.065` where `6.5` was meant is numerically valid
//! and would produce a plausible-looking breakdown that undercharges by
//! two orders of magnitude, so it has to be refused before it reaches
//! the engine.

use crate::error::PricingError;
use anyhow::{Context, Result};
use serde::Serialize;

/// Environment variable naming the service fee, in percentage points.
pub const SERVICE_FEE_ENV: &str = "EDGEMY_SERVICE_FEE_PERCENT";
/// Environment variable naming the VAT rate, as a fraction.
pub const VAT_RATE_ENV: &str = "EDGEMY_VAT_RATE";

/// Default platform markup: 6.5%.
pub const DEFAULT_SERVICE_FEE_PERCENT: f64 = 6.5;
/// Default VAT rate: France's 20%.
pub const DEFAULT_VAT_RATE: f64 = 0.20;

/// Validated pricing rates.
///
/// The fields are private so a `PricingConfig` can only exist if it has
/// passed [`PricingConfig::new`]'s range checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingConfig {
    service_fee_percent: f64,
    vat_rate: f64,
}

impl PricingConfig {
    /// No real marketplace charges less than 1% on top of a listing;
    /// anything below this is treated as a fraction passed where
    /// percentage points were expected and rejected.
    pub const MIN_SERVICE_FEE_PERCENT: f64 = 1.0;

    /// Builds a config from a service fee in percentage points (`6.5`
    /// for 6.5%) and a VAT rate as a fraction (`0.20` for 20%).
    pub fn new(service_fee_percent: f64, vat_rate: f64) -> Result<PricingConfig, PricingError> {
        if !service_fee_percent.is_finite()
            || service_fee_percent < Self::MIN_SERVICE_FEE_PERCENT
        {
            return Err(PricingError::InvalidServiceFee {
                got: service_fee_percent,
                min: Self::MIN_SERVICE_FEE_PERCENT,
            });
        }
        if !vat_rate.is_finite() || vat_rate < 0.0 {
            return Err(PricingError::InvalidVatRate(vat_rate));
        }
        Ok(PricingConfig {
            service_fee_percent,
            vat_rate,
        })
    }

    /// Resolves the rates from the environment, falling back to the
    /// defaults when a variable is unset.  Used by the binary only.
    pub fn from_env() -> Result<PricingConfig> {
        let service_fee_percent = read_env_f64(SERVICE_FEE_ENV)?
            .unwrap_or(DEFAULT_SERVICE_FEE_PERCENT);
        let vat_rate = read_env_f64(VAT_RATE_ENV)?.unwrap_or(DEFAULT_VAT_RATE);
        PricingConfig::new(service_fee_percent, vat_rate)
            .context("invalid pricing configuration in environment")
    }

    /// The platform markup, in percentage points.
    pub fn service_fee_percent(&self) -> f64 {
        self.service_fee_percent
    }

    /// The VAT rate applied to the platform's margin, as a fraction.
    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }
}

fn read_env_f64(name: &str) -> Result<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{} is not a number: {:?}", name, raw))?;
            Ok(Some(value))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("{} is not valid unicode", name)),
    }
}
