//! Data models for the pricing engine.
//!
//! These types form the engine's input and output surface.  They derive
//! `Serialize`/`Deserialize` so the booking flow, the payment webhook
//! handler, and the admin tooling can all exchange them as JSON, and so
//! a breakdown can be persisted verbatim onto the owning reservation or
//! pack record.

use crate::cards::CardRegion;
use crate::money::Cents;
use serde::{Deserialize, Serialize};

/// The full monetary breakdown of one booking or pack purchase.
///
/// A breakdown is fully determined by its inputs and immutable once
/// computed; a new one is computed fresh for each pricing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// What the coach receives: always exactly their asking price.
    pub coach_net_cents: Cents,
    /// The platform markup added on top of the coach's price.
    pub service_fee_cents: Cents,
    /// What the customer is actually charged (coach net + service fee).
    pub total_customer_cents: Cents,
    /// Estimated payment-processor cost on the full customer amount.
    pub processor_fee_cents: Cents,
    /// The platform's margin: service fee minus processor fee, floored
    /// at zero.
    pub platform_fee_cents: Cents,
    /// The platform margin excluding VAT.
    pub platform_revenue_ex_vat_cents: Cents,
    /// VAT owed on the platform margin.
    pub platform_revenue_vat_cents: Cents,
}

/// A single pricing request: one session, or one multi-session pack
/// priced at its already-discounted bundle total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// The coach's asking price in cents.
    pub price_cents: Cents,
    /// The card risk class to estimate processor fees against.
    pub card_region: CardRegion,
}

/// Input to the batch endpoint: a list of pricing requests, e.g. an
/// accounting backfill recomputing breakdowns across reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBatchInput {
    pub quotes: Vec<QuoteRequest>,
}

/// Result of a batch run, in the same order as the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBatchResult {
    pub quotes: Vec<PriceBreakdown>,
}
