//! Conversion pricing for a single SAFE or convertible note.
//!
//! Amounts are unbounded inputs, so anything that can grow returns `None`
//! on overflow instead of panicking.

use super::{ConversionTarget, ResolvedInstrument};
use crate::domain::{Convertible, ConvertibleNote, Decimal};

/// Principal plus simple interest, accrued no further than the note's term.
pub fn accrued_amount(note: &ConvertibleNote, months: u32) -> Option<Decimal> {
    let elapsed = Decimal::from(months.min(note.term_months));
    let rate = Decimal::from_percent(note.annual_interest_rate_percent);
    let growth = rate.checked_mul(elapsed)? / Decimal::from(12u32);
    note.principal.checked_mul(Decimal::one().checked_add(growth)?)
}

/// Amount that converts: the SAFE's purchase amount or the note's accrued balance.
pub fn conversion_amount(instrument: Convertible<'_>, months: u32) -> Option<Decimal> {
    match instrument {
        Convertible::Safe(safe) => Some(safe.amount),
        Convertible::Note(note) => accrued_amount(note, months),
    }
}

/// Valuation the instrument converts at against a round valued at `round_valuation`.
///
/// Cap and discount each only ever lower the price; the lower result wins.
pub fn effective_valuation(
    valuation_cap: Decimal,
    discount_percent: Decimal,
    round_valuation: Decimal,
) -> Decimal {
    let discounted =
        round_valuation * (Decimal::one() - Decimal::from_percent(discount_percent));

    match (valuation_cap.is_positive(), discount_percent.is_positive()) {
        (true, true) => valuation_cap.min(discounted),
        (true, false) => valuation_cap.min(round_valuation),
        (false, true) => discounted,
        (false, false) => round_valuation,
    }
}

/// Fraction of the post-conversion company an instrument claims.
///
/// A zero valuation claims nothing.
pub fn dilution_contribution(amount: Decimal, valuation: Decimal) -> Option<Decimal> {
    amount.safe_div(valuation)
}

/// Price one instrument, issued at `index`, against `target`.
pub fn resolve_instrument(
    index: usize,
    instrument: Convertible<'_>,
    target: &ConversionTarget,
) -> Option<ResolvedInstrument> {
    Some(ResolvedInstrument {
        index,
        name: instrument.name().clone(),
        amount: conversion_amount(instrument, target.months)?,
        valuation: effective_valuation(
            instrument.valuation_cap(),
            instrument.discount_percent(),
            target.valuation,
        ),
        mfn: instrument.mfn(),
        pro_rata: instrument.pro_rata(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HolderName, Safe};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn note(principal: &str, rate: &str, term_months: u32) -> ConvertibleNote {
        ConvertibleNote {
            name: HolderName::new("Bridge"),
            principal: d(principal),
            annual_interest_rate_percent: d(rate),
            term_months,
            valuation_cap: Decimal::zero(),
            discount_percent: Decimal::zero(),
            mfn: false,
            pro_rata: false,
        }
    }

    #[test]
    fn test_cap_and_discount_takes_lower() {
        // $5M cap vs $10M * 0.8 = $8M.
        assert_eq!(effective_valuation(d("5000000"), d("20"), d("10000000")), d("5000000"));
        // $9M cap vs $8M discounted.
        assert_eq!(effective_valuation(d("9000000"), d("20"), d("10000000")), d("8000000"));
    }

    #[test]
    fn test_cap_never_exceeds_round_valuation() {
        assert_eq!(effective_valuation(d("20000000"), Decimal::zero(), d("10000000")), d("10000000"));
        assert_eq!(effective_valuation(d("6000000"), Decimal::zero(), d("10000000")), d("6000000"));
    }

    #[test]
    fn test_discount_only_and_plain() {
        assert_eq!(effective_valuation(Decimal::zero(), d("25"), d("10000000")), d("7500000"));
        assert_eq!(effective_valuation(Decimal::zero(), Decimal::zero(), d("10000000")), d("10000000"));
    }

    #[test]
    fn test_interest_accrues_until_round() {
        // 100k at 12% for 6 months = 106k.
        assert_eq!(accrued_amount(&note("100000", "12", 24), 6), Some(d("106000")));
    }

    #[test]
    fn test_interest_stops_at_maturity() {
        // Term of 12 months caps accrual even when the round is at 36 months.
        assert_eq!(accrued_amount(&note("100000", "10", 12), 36), Some(d("110000")));
    }

    #[test]
    fn test_zero_valuation_contributes_nothing() {
        assert_eq!(dilution_contribution(d("100000"), Decimal::zero()), Some(Decimal::zero()));
        assert_eq!(dilution_contribution(d("1000000"), d("5000000")), Some(d("0.2")));
    }

    #[test]
    fn test_unrepresentable_accrual_is_none() {
        let huge = note("10000000000000000000000000", "100000000", 1200);
        assert_eq!(accrued_amount(&huge, 1200), None);
    }

    #[test]
    fn test_resolve_safe() {
        let safe = Safe {
            name: HolderName::new("Angel"),
            amount: d("1000000"),
            valuation_cap: d("5000000"),
            discount_percent: d("20"),
            mfn: true,
            pro_rata: true,
        };
        let target = ConversionTarget {
            valuation: d("10000000"),
            months: 12,
        };
        let resolved = resolve_instrument(3, Convertible::Safe(&safe), &target).unwrap();

        assert_eq!(resolved.index, 3);
        assert_eq!(resolved.amount, d("1000000"));
        assert_eq!(resolved.valuation, d("5000000"));
        assert!(resolved.mfn);
        assert!(resolved.pro_rata);
    }
}
