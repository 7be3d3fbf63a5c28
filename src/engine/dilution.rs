//! Share issuance for a cohort of converting instruments.

use super::valuation::dilution_contribution;
use super::ResolvedInstrument;
use crate::domain::{CapTable, Decimal};
use rust_decimal::Decimal as RustDecimal;

/// Ceiling on the combined fraction a cohort may claim.
///
/// Without it a cohort claiming 100% or more would divide by zero or leave
/// negative equity for everyone else.
pub const MAX_DILUTION_FRACTION: RustDecimal = RustDecimal::from_parts(999, 0, 0, false, 3);

/// Result of converting one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversion {
    /// New shares per instrument name.
    pub issued: CapTable,
    /// Sum of amount / valuation before the ceiling.
    pub raw_fraction: Decimal,
    /// Fraction actually granted after the ceiling.
    pub applied_fraction: Decimal,
    /// Total shares once the issuance is added.
    pub post_total: Decimal,
}

impl Conversion {
    /// True when the cohort's claims were scaled down.
    pub fn was_capped(&self) -> bool {
        self.raw_fraction > self.applied_fraction
    }
}

/// Convert `cohort` against `pre_total` existing shares.
///
/// Over-subscribed cohorts get a uniform haircut so relative proportions
/// between instruments are kept. Returns `None` if a claim or the
/// post-conversion total is not representable.
pub fn aggregate_dilution(cohort: &[ResolvedInstrument], pre_total: Decimal) -> Option<Conversion> {
    let fractions = cohort
        .iter()
        .map(|i| Some((i.name.clone(), dilution_contribution(i.amount, i.valuation)?)))
        .collect::<Option<Vec<_>>>()?;

    let raw_fraction = fractions
        .iter()
        .try_fold(Decimal::zero(), |acc, (_, f)| acc.checked_add(*f))?;
    if !raw_fraction.is_positive() {
        return Some(Conversion {
            issued: CapTable::new(),
            raw_fraction,
            applied_fraction: Decimal::zero(),
            post_total: pre_total,
        });
    }

    let ceiling = Decimal::new(MAX_DILUTION_FRACTION);
    let applied_fraction = raw_fraction.min(ceiling);
    let scale = applied_fraction.fraction_of(raw_fraction);
    let post_total = pre_total.safe_div(Decimal::one() - applied_fraction)?;

    // Each scaled fraction is at most the ceiling, so every issuance is
    // bounded by `post_total`.
    let issued = CapTable::from_entries(
        fractions
            .into_iter()
            .map(|(name, fraction)| (name, post_total * (fraction * scale))),
    );

    Some(Conversion {
        issued,
        raw_fraction,
        applied_fraction,
        post_total,
    })
}
