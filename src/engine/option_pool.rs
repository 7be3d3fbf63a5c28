//! Option pool shuffle for priced rounds, plus standalone pool top-ups.

use crate::domain::{Decimal, PricedRound};

/// New pool shares and the resulting post-round total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolSizing {
    pub new_pool_shares: Decimal,
    pub future_total: Decimal,
}

/// Size the option pool so it is `target_percent` of the post-round total.
///
/// The pool is part of the pre-money, so its size moves the total it is a
/// fraction of. With `f` the target fraction, `k = 1/f - 1`, pre-money
/// `P = V - I` and existing pool `E`, the closed form is
///
/// ```text
/// O = [ (S/k)(1 + I/P) - E/(1-f) ] / [ 1 - I/(P*k) ]
/// future_total = (E + O) / f
/// ```
///
/// where `S` is every share outstanding before the investor is issued
/// (conversions included). Without a target, or when the existing pool
/// already meets it, the total only grows by the investor's stake.
///
/// Returns `None` if the post-round total is not representable.
pub fn size_option_pool(
    current_total: Decimal,
    existing_pool: Decimal,
    round: &PricedRound,
) -> Option<PoolSizing> {
    let one = Decimal::one();
    let investment = round.investment_amount;
    let without_pool = || {
        let investor_fraction = investment.fraction_of(round.valuation);
        Some(PoolSizing {
            new_pool_shares: Decimal::zero(),
            future_total: current_total.safe_div(one - investor_fraction)?,
        })
    };

    let f = Decimal::from_percent(round.option_pool_target_percent);
    if !f.is_positive() {
        return without_pool();
    }

    let k = one.safe_div(f)?.checked_sub(one)?;
    let investment_over_pre = investment.safe_div(round.pre_money())?;
    let numerator = current_total
        .safe_div(k)?
        .checked_mul(one.checked_add(investment_over_pre)?)?
        .checked_sub(existing_pool.safe_div(one - f)?)?;
    let denominator = one.checked_sub(investment_over_pre.safe_div(k)?)?;
    let new_pool_shares = numerator.safe_div(denominator)?;

    if !new_pool_shares.is_positive() {
        return without_pool();
    }

    Some(PoolSizing {
        new_pool_shares,
        future_total: existing_pool.checked_add(new_pool_shares)?.safe_div(f)?,
    })
}

/// Shares to add so the pool reaches `reserve_percent` of the new total.
///
/// Returns zero when the pool already meets the reservation, and `None` if
/// the top-up is not representable.
pub fn reserve_shares(
    current_total: Decimal,
    existing_pool: Decimal,
    reserve_percent: Decimal,
) -> Option<Decimal> {
    let r = Decimal::from_percent(reserve_percent);
    if !r.is_positive() || existing_pool.fraction_of(current_total) >= r {
        return Some(Decimal::zero());
    }
    let added = (r * current_total - existing_pool).safe_div(Decimal::one() - r)?;
    Some(added.max(Decimal::zero()))
}
