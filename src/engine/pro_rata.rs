//! Pro-rata participation at a priced round.

use crate::domain::{CapTable, Decimal, HolderName};

/// Carve pro-rata allocations out of the round's new investor shares.
///
/// Each holder that is `eligible`, named in `participants`, already on the
/// table and not the round's own investor receives
/// `investor_shares * holder_shares / table_total`. The returned delta only
/// holds the awards; the lead investor takes whatever is left.
pub fn allocate_pro_rata(
    table: &CapTable,
    eligible: &[HolderName],
    participants: &[HolderName],
    round_investor: &HolderName,
    investor_shares: Decimal,
) -> CapTable {
    let current_total = table.total_shares();
    let mut awards = CapTable::new();

    for holder in eligible {
        if holder == round_investor
            || awards.contains(holder)
            || !participants.contains(holder)
            || !table.contains(holder)
        {
            continue;
        }

        let award = investor_shares * table.shares_of(holder).fraction_of(current_total);
        if award.is_positive() {
            awards.add_shares(holder.clone(), award);
        }
    }

    awards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn names(list: &[&str]) -> Vec<HolderName> {
        list.iter().map(|n| HolderName::new(*n)).collect()
    }

    fn table() -> CapTable {
        CapTable::from_entries(vec![
            (HolderName::new("Founder"), d("8000000")),
            (HolderName::new("Seed"), d("2000000")),
        ])
    }

    #[test]
    fn test_participant_keeps_percentage_of_new_shares() {
        let awards = allocate_pro_rata(
            &table(),
            &names(&["Seed"]),
            &names(&["Seed"]),
            &HolderName::new("Series A"),
            d("2500000"),
        );
        assert_eq!(awards.shares_of(&"Seed".into()), d("500000"));
        assert_eq!(awards.len(), 1);
    }

    #[test]
    fn test_not_participating_gets_nothing() {
        let awards = allocate_pro_rata(&table(), &names(&["Seed"]), &[], &"Series A".into(), d("2500000"));
        assert!(awards.is_empty());
    }

    #[test]
    fn test_ineligible_participant_gets_nothing() {
        let awards = allocate_pro_rata(
            &table(),
            &[],
            &names(&["Founder"]),
            &"Series A".into(),
            d("2500000"),
        );
        assert!(awards.is_empty());
    }

    #[test]
    fn test_round_investor_and_absent_holders_skipped() {
        let awards = allocate_pro_rata(
            &table(),
            &names(&["Series A", "Ghost"]),
            &names(&["Series A", "Ghost"]),
            &"Series A".into(),
            d("2500000"),
        );
        assert!(awards.is_empty());
    }

    #[test]
    fn test_duplicate_eligibility_counts_once() {
        let awards = allocate_pro_rata(
            &table(),
            &names(&["Seed", "Seed"]),
            &names(&["Seed"]),
            &"Series A".into(),
            d("2500000"),
        );
        assert_eq!(awards.shares_of(&"Seed".into()), d("500000"));
    }

    #[test]
    fn test_empty_table_awards_nothing() {
        let awards = allocate_pro_rata(
            &CapTable::new(),
            &names(&["Seed"]),
            &names(&["Seed"]),
            &"Series A".into(),
            d("2500000"),
        );
        assert!(awards.is_empty());
    }
}
