//! Payment-method cost profiles.
//!
//! The payment processor's transaction cost depends on where a card was
//! issued and whether the charge needs currency conversion.  This module
//! defines the five risk classes the marketplace distinguishes and the
//! per-class cost structure (a percentage of the transaction plus a flat
//! per-transaction fee).  Profiles are configuration data: they are
//! validated once at load time and never change during a request.
//!
//! Built-in profiles match the processor's published EUR pricing.  They
//! can be overridden by dropping JSON files into a directory (see
//! [`load_card_profiles_from_dir`]), which is how fee-schedule changes
//! are rolled out without a rebuild.

use crate::error::PricingError;
use crate::money::Cents;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The card risk classes the marketplace prices against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRegion {
    /// Cards issued in the European Economic Area, charged in EUR.
    Domestic,
    /// UK-issued cards without currency conversion.
    Uk,
    /// Cards issued outside the EEA and the UK.
    International,
    /// UK-issued cards requiring currency conversion.
    UkWithConversion,
    /// Non-EEA cards requiring currency conversion.
    InternationalWithConversion,
}

/// Cost structure for one card risk class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardProfile {
    /// The risk class this profile prices.
    pub region: CardRegion,
    /// Percentage component as a fraction of the transaction amount,
    /// e.g. `0.015` for 1.5%.
    pub percent_fee: f64,
    /// Flat per-transaction component in cents.
    pub fixed_fee_cents: Cents,
}

impl CardProfile {
    /// Checks that the fee components are in range: the percentage must
    /// be a finite fraction in `0.0..=1.0` and the fixed fee must be
    /// non-negative.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.percent_fee.is_finite() || !(0.0..=1.0).contains(&self.percent_fee) {
            return Err(PricingError::InvalidCardProfile {
                region: self.region,
                reason: format!(
                    "percent_fee must be a fraction between 0.0 and 1.0, got {}",
                    self.percent_fee
                ),
            });
        }
        if self.fixed_fee_cents.is_negative() {
            return Err(PricingError::InvalidCardProfile {
                region: self.region,
                reason: format!(
                    "fixed_fee_cents must be non-negative, got {}",
                    self.fixed_fee_cents.get()
                ),
            });
        }
        Ok(())
    }
}

/// The complete set of card profiles, one per risk class.
///
/// The table is total by construction: every [`CardRegion`] always maps
/// to a profile, so lookups cannot fail.  Overrides replace individual
/// entries but can never remove one.
#[derive(Debug, Clone)]
pub struct CardProfileTable {
    domestic: CardProfile,
    uk: CardProfile,
    international: CardProfile,
    uk_with_conversion: CardProfile,
    international_with_conversion: CardProfile,
}

impl CardProfileTable {
    /// The processor's published EUR pricing.  Currency conversion adds
    /// two percentage points on top of the issuing-region rate; the flat
    /// fee is 25 cents across the board.
    pub fn builtin() -> CardProfileTable {
        CardProfileTable {
            domestic: CardProfile {
                region: CardRegion::Domestic,
                percent_fee: 0.015,
                fixed_fee_cents: Cents(25),
            },
            uk: CardProfile {
                region: CardRegion::Uk,
                percent_fee: 0.025,
                fixed_fee_cents: Cents(25),
            },
            international: CardProfile {
                region: CardRegion::International,
                percent_fee: 0.0325,
                fixed_fee_cents: Cents(25),
            },
            uk_with_conversion: CardProfile {
                region: CardRegion::UkWithConversion,
                percent_fee: 0.045,
                fixed_fee_cents: Cents(25),
            },
            international_with_conversion: CardProfile {
                region: CardRegion::InternationalWithConversion,
                percent_fee: 0.0525,
                fixed_fee_cents: Cents(25),
            },
        }
    }

    /// Returns the profile for a risk class.
    pub fn get(&self, region: CardRegion) -> &CardProfile {
        match region {
            CardRegion::Domestic => &self.domestic,
            CardRegion::Uk => &self.uk,
            CardRegion::International => &self.international,
            CardRegion::UkWithConversion => &self.uk_with_conversion,
            CardRegion::InternationalWithConversion => &self.international_with_conversion,
        }
    }

    /// Replaces the entries named by `overrides`.  Each override is
    /// validated before it is applied; on error the table is left
    /// unchanged.
    pub fn apply_overrides(&mut self, overrides: &[CardProfile]) -> Result<(), PricingError> {
        for profile in overrides {
            profile.validate()?;
        }
        for profile in overrides {
            match profile.region {
                CardRegion::Domestic => self.domestic = *profile,
                CardRegion::Uk => self.uk = *profile,
                CardRegion::International => self.international = *profile,
                CardRegion::UkWithConversion => self.uk_with_conversion = *profile,
                CardRegion::InternationalWithConversion => {
                    self.international_with_conversion = *profile
                }
            }
        }
        Ok(())
    }
}

/// Load card profile overrides from a directory.
///
/// Scans the directory for `.json` files and parses each as a single
/// [`CardProfile`].  Files that fail to parse are reported and skipped
/// rather than aborting the load, so one malformed override does not
/// take down the whole fee schedule.
pub fn load_card_profiles_from_dir(path: &Path) -> Result<Vec<CardProfile>> {
    let mut profiles = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(ext) = entry.path().extension() {
                    if ext == "json" {
                        let data = std::fs::read_to_string(entry.path())?;
                        match serde_json::from_str::<CardProfile>(&data) {
                            Ok(profile) => profiles.push(profile),
                            Err(err) => {
                                eprintln!(
                                    "Failed to parse card profile {:?}: {}",
                                    entry.path(),
                                    err
                                );
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(profiles)
}
