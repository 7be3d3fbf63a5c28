//! Exit payouts: straight pro-rata split of the sale price.

use crate::domain::{CapTable, Decimal, Exit, HolderName};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub holder: HolderName,
    pub shares: Decimal,
    pub percent: Decimal,
    pub gross: Decimal,
    /// `gross` after the exit's flat tax rate; display only.
    pub after_tax: Decimal,
}

/// Split `exit.amount` across `table` by ownership, largest holder first.
///
/// No liquidation preferences: every share is paid the same.
pub fn exit_payouts(table: &CapTable, exit: &Exit) -> Vec<Payout> {
    let total = table.total_shares();
    let keep = Decimal::one() - Decimal::from_percent(exit.tax_percent);

    table
        .ranked()
        .into_iter()
        .map(|(holder, shares)| {
            let fraction = shares.fraction_of(total);
            let gross = fraction * exit.amount;
            Payout {
                holder: holder.clone(),
                shares,
                percent: fraction.to_percent(),
                gross,
                after_tax: gross * keep,
            }
        })
        .collect()
}
