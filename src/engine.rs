//! Fee-splitting computation engine.
//!
//! The `engine` module turns an asking price and a card profile into a
//! [`PriceBreakdown`].  The computation is pure: no I/O, no clock, no
//! shared state, so it may be invoked concurrently by any number of
//! callers.  [`quote_batch`] uses the [`rayon`] crate to parallelise
//! large recomputation runs (accounting backfills) across CPU cores.
//!
//! The step order below is load-bearing.  Each derived amount is
//! rounded to an integer cent immediately, then fed into the next step;
//! deferring rounding to the end shifts totals by a cent in edge cases
//! and would desynchronise new breakdowns from the ones already
//! persisted on reservation records.

use crate::cards::{CardProfile, CardProfileTable};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::models::{PriceBreakdown, QuoteRequest};
use crate::money::{round_half_away, Cents};
use rayon::prelude::*;

/// Computes the breakdown for one booking or pack purchase.
///
/// Fees stack on top of the asking price: the coach always receives
/// exactly `price_cents`, the customer pays the price plus the service
/// fee, and the platform's margin is whatever the service fee leaves
/// after the estimated processor cost.  When the processor fee meets or
/// exceeds the service fee the platform absorbs the shortfall and books
/// a zero margin, never a negative one.
///
/// VAT is split on a VAT-exclusive base: the platform fee is the ex-VAT
/// margin, and the VAT owed on it is computed on top.
pub fn quote(
    price_cents: Cents,
    config: &PricingConfig,
    card: &CardProfile,
) -> Result<PriceBreakdown, PricingError> {
    if price_cents.is_negative() {
        return Err(PricingError::InvalidPrice(price_cents.get()));
    }
    card.validate()?;

    // A zero price is a free session: nothing is charged, so no
    // processor transaction happens and every derived fee is zero.
    if price_cents == Cents::ZERO {
        return Ok(PriceBreakdown {
            coach_net_cents: Cents::ZERO,
            service_fee_cents: Cents::ZERO,
            total_customer_cents: Cents::ZERO,
            processor_fee_cents: Cents::ZERO,
            platform_fee_cents: Cents::ZERO,
            platform_revenue_ex_vat_cents: Cents::ZERO,
            platform_revenue_vat_cents: Cents::ZERO,
        });
    }

    // 1. The coach's take is the asking price, untouched.
    let coach_net_cents = price_cents;

    // 2. Platform markup on the asking price.  The rate is carried in
    //    percentage points and divided by 100 here, nowhere else.
    let service_fee_cents =
        round_half_away(price_cents.get() as f64 * config.service_fee_percent() / 100.0);

    // 3. What the customer is charged.
    let total_customer_cents = coach_net_cents + service_fee_cents;

    // 4. Processor fee estimate, always on the full customer-facing
    //    amount, never on the price or the service fee alone.
    let processor_fee_cents = round_half_away(
        total_customer_cents.get() as f64 * card.percent_fee
            + card.fixed_fee_cents.get() as f64,
    );

    // 5. Platform margin, floored at zero.
    let platform_fee_cents = service_fee_cents.sub_clamped(processor_fee_cents);

    // 6. VAT split: the margin is the ex-VAT base, VAT comes on top.
    let platform_revenue_ex_vat_cents = platform_fee_cents;
    let platform_revenue_vat_cents =
        round_half_away(platform_revenue_ex_vat_cents.get() as f64 * config.vat_rate());

    Ok(PriceBreakdown {
        coach_net_cents,
        service_fee_cents,
        total_customer_cents,
        processor_fee_cents,
        platform_fee_cents,
        platform_revenue_ex_vat_cents,
        platform_revenue_vat_cents,
    })
}

/// Computes breakdowns for a batch of requests in parallel.
///
/// Results preserve the input order.  Any invalid request fails the
/// whole batch, since a backfill that silently skips rows would leave
/// the accounting aggregates inconsistent.
pub fn quote_batch(
    requests: &[QuoteRequest],
    config: &PricingConfig,
    profiles: &CardProfileTable,
) -> Result<Vec<PriceBreakdown>, PricingError> {
    requests
        .par_iter()
        .map(|request| quote(request.price_cents, config, profiles.get(request.card_region)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegion;

    fn config() -> PricingConfig {
        PricingConfig::new(6.5, 0.20).unwrap()
    }

    fn eu_card() -> CardProfile {
        *CardProfileTable::builtin().get(CardRegion::Domestic)
    }

    #[test]
    fn breakdown_for_ninety_euro_session() {
        let breakdown = quote(Cents(9000), &config(), &eu_card()).unwrap();
        assert_eq!(breakdown.coach_net_cents, Cents(9000));
        // round(9000 * 0.065) = 585
        assert_eq!(breakdown.service_fee_cents, Cents(585));
        assert_eq!(breakdown.total_customer_cents, Cents(9585));
        // round(9585 * 0.015 + 25) = round(168.775) = 169
        assert_eq!(breakdown.processor_fee_cents, Cents(169));
        assert_eq!(breakdown.platform_fee_cents, Cents(416));
        assert_eq!(breakdown.platform_revenue_ex_vat_cents, Cents(416));
        // round(416 * 0.20) = 83
        assert_eq!(breakdown.platform_revenue_vat_cents, Cents(83));
    }

    #[test]
    fn zero_price_yields_all_zero_breakdown() {
        let breakdown = quote(Cents::ZERO, &config(), &eu_card()).unwrap();
        assert_eq!(
            breakdown,
            PriceBreakdown {
                coach_net_cents: Cents::ZERO,
                service_fee_cents: Cents::ZERO,
                total_customer_cents: Cents::ZERO,
                processor_fee_cents: Cents::ZERO,
                platform_fee_cents: Cents::ZERO,
                platform_revenue_ex_vat_cents: Cents::ZERO,
                platform_revenue_vat_cents: Cents::ZERO,
            }
        );
    }

    #[test]
    fn high_risk_card_squeezes_platform_margin() {
        let table = CardProfileTable::builtin();
        let card = table.get(CardRegion::InternationalWithConversion);
        let breakdown = quote(Cents(10000), &config(), card).unwrap();
        assert_eq!(breakdown.service_fee_cents, Cents(650));
        assert_eq!(breakdown.total_customer_cents, Cents(10650));
        // round(10650 * 0.0525 + 25) = round(584.125) = 584
        assert_eq!(breakdown.processor_fee_cents, Cents(584));
        assert_eq!(breakdown.platform_fee_cents, Cents(66));
    }

    #[test]
    fn platform_fee_clamps_at_zero_on_small_amounts() {
        // A 3-euro charge: the 25-cent fixed processor fee alone dwarfs
        // the 20-cent service fee.
        let table = CardProfileTable::builtin();
        let card = table.get(CardRegion::InternationalWithConversion);
        let breakdown = quote(Cents(300), &config(), card).unwrap();
        assert!(breakdown.processor_fee_cents > breakdown.service_fee_cents);
        assert_eq!(breakdown.platform_fee_cents, Cents::ZERO);
        assert_eq!(breakdown.platform_revenue_ex_vat_cents, Cents::ZERO);
        assert_eq!(breakdown.platform_revenue_vat_cents, Cents::ZERO);
    }

    #[test]
    fn coach_always_receives_asking_price() {
        let table = CardProfileTable::builtin();
        for price in [0, 1, 99, 4550, 9000, 125000] {
            for region in [
                CardRegion::Domestic,
                CardRegion::Uk,
                CardRegion::International,
                CardRegion::UkWithConversion,
                CardRegion::InternationalWithConversion,
            ] {
                let breakdown = quote(Cents(price), &config(), table.get(region)).unwrap();
                assert_eq!(breakdown.coach_net_cents, Cents(price));
                assert_eq!(
                    breakdown.total_customer_cents,
                    breakdown.coach_net_cents + breakdown.service_fee_cents
                );
                assert!(!breakdown.platform_fee_cents.is_negative());
            }
        }
    }

    #[test]
    fn customer_total_is_monotonic_in_price() {
        let card = eu_card();
        let mut previous = Cents::ZERO;
        for price in (0..20000).step_by(7) {
            let breakdown = quote(Cents(price), &config(), &card).unwrap();
            assert!(breakdown.total_customer_cents >= previous);
            previous = breakdown.total_customer_cents;
        }
    }

    #[test]
    fn quote_is_deterministic() {
        let first = quote(Cents(4550), &config(), &eu_card()).unwrap();
        let second = quote(Cents(4550), &config(), &eu_card()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = quote(Cents(-1), &config(), &eu_card()).unwrap_err();
        assert_eq!(err, PricingError::InvalidPrice(-1));
    }

    #[test]
    fn correct_rate_charges_two_orders_of_magnitude_more_than_fraction_form() {
        // The misconfigured fraction form cannot be constructed at all;
        // this pins down what it would have computed so the guard's
        // stakes stay visible.  round(9000 * 0.065 / 100) = 6 cents
        // versus the correct 585.
        assert!(PricingConfig::new(0.065, 0.20).is_err());
        let correct = quote(Cents(9000), &config(), &eu_card()).unwrap();
        assert_eq!(correct.service_fee_cents, Cents(585));
        assert_eq!(round_half_away(9000.0 * 0.065 / 100.0), Cents(6));
    }

    #[test]
    fn pack_price_is_quoted_once_on_bundle_total() {
        // A 5-session pack listed at 400 euros after discount: one
        // breakdown for the whole bundle, same algorithm.
        let breakdown = quote(Cents(40000), &config(), &eu_card()).unwrap();
        assert_eq!(breakdown.coach_net_cents, Cents(40000));
        assert_eq!(breakdown.service_fee_cents, Cents(2600));
        assert_eq!(breakdown.total_customer_cents, Cents(42600));
    }

    #[test]
    fn batch_preserves_order_and_matches_single_quotes() {
        let table = CardProfileTable::builtin();
        let requests = vec![
            QuoteRequest {
                price_cents: Cents(9000),
                card_region: CardRegion::Domestic,
            },
            QuoteRequest {
                price_cents: Cents(10000),
                card_region: CardRegion::InternationalWithConversion,
            },
            QuoteRequest {
                price_cents: Cents(0),
                card_region: CardRegion::Uk,
            },
        ];
        let results = quote_batch(&requests, &config(), &table).unwrap();
        assert_eq!(results.len(), 3);
        for (request, result) in requests.iter().zip(&results) {
            let single = quote(request.price_cents, &config(), table.get(request.card_region))
                .unwrap();
            assert_eq!(*result, single);
        }
    }

    #[test]
    fn batch_fails_whole_run_on_invalid_line() {
        let table = CardProfileTable::builtin();
        let requests = vec![
            QuoteRequest {
                price_cents: Cents(9000),
                card_region: CardRegion::Domestic,
            },
            QuoteRequest {
                price_cents: Cents(-500),
                card_region: CardRegion::Domestic,
            },
        ];
        let err = quote_batch(&requests, &config(), &table).unwrap_err();
        assert_eq!(err, PricingError::InvalidPrice(-500));
    }
}
