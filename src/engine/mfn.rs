//! Most-favored-nation repricing within a conversion cohort.

use super::ResolvedInstrument;
use crate::domain::Decimal;

/// Upgrade every MFN instrument to the lowest valuation among cohort peers
/// issued strictly after it.
///
/// Terms only flow backward in issuance order: an earlier instrument never
/// improves a later one. Peers priced at zero are degenerate and ignored.
pub fn apply_mfn(cohort: &[ResolvedInstrument]) -> Vec<ResolvedInstrument> {
    cohort
        .iter()
        .map(|instrument| {
            if !instrument.mfn {
                return instrument.clone();
            }

            let best_later = cohort
                .iter()
                .filter(|peer| peer.index > instrument.index && peer.valuation.is_positive())
                .map(|peer| peer.valuation)
                .min();

            match best_later {
                Some(valuation) if valuation < instrument.valuation => ResolvedInstrument {
                    valuation,
                    ..instrument.clone()
                },
                _ => instrument.clone(),
            }
        })
        .collect()
}

/// Lowest valuation in the cohort, if any; used for logging.
pub fn best_valuation(cohort: &[ResolvedInstrument]) -> Option<Decimal> {
    cohort.iter().map(|i| i.valuation).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HolderName;

    fn instrument(index: usize, valuation: i64, mfn: bool) -> ResolvedInstrument {
        ResolvedInstrument {
            index,
            name: HolderName::new(format!("SAFE {}", index)),
            amount: Decimal::from(100_000i64),
            valuation: Decimal::from(valuation),
            mfn,
            pro_rata: false,
        }
    }

    #[test]
    fn test_mfn_takes_later_better_terms() {
        let cohort = vec![instrument(0, 8_000_000, true), instrument(1, 5_000_000, false)];
        let resolved = apply_mfn(&cohort);
        assert_eq!(resolved[0].valuation, Decimal::from(5_000_000i64));
        assert_eq!(resolved[1].valuation, Decimal::from(5_000_000i64));
    }

    #[test]
    fn test_mfn_ignores_earlier_terms() {
        let cohort = vec![instrument(0, 5_000_000, false), instrument(1, 8_000_000, true)];
        let resolved = apply_mfn(&cohort);
        assert_eq!(resolved[1].valuation, Decimal::from(8_000_000i64));
    }

    #[test]
    fn test_non_mfn_never_upgraded() {
        let cohort = vec![instrument(0, 8_000_000, false), instrument(1, 5_000_000, false)];
        let resolved = apply_mfn(&cohort);
        assert_eq!(resolved[0].valuation, Decimal::from(8_000_000i64));
    }

    #[test]
    fn test_mfn_keeps_own_terms_when_later_are_worse() {
        let cohort = vec![instrument(0, 4_000_000, true), instrument(1, 6_000_000, false)];
        assert_eq!(apply_mfn(&cohort)[0].valuation, Decimal::from(4_000_000i64));
    }

    #[test]
    fn test_mfn_picks_minimum_across_all_later_peers() {
        let cohort = vec![
            instrument(0, 9_000_000, true),
            instrument(2, 7_000_000, false),
            instrument(4, 3_000_000, false),
            instrument(5, 6_000_000, false),
        ];
        assert_eq!(apply_mfn(&cohort)[0].valuation, Decimal::from(3_000_000i64));
        assert_eq!(best_valuation(&cohort), Some(Decimal::from(3_000_000i64)));
    }

    #[test]
    fn test_last_mfn_instrument_has_no_peers() {
        let cohort = vec![instrument(0, 3_000_000, false), instrument(1, 8_000_000, true)];
        assert_eq!(apply_mfn(&cohort)[1].valuation, Decimal::from(8_000_000i64));
    }
}
