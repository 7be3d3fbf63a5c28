//! Cap table snapshot: holder name to share count.

use crate::domain::{Decimal, HolderName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ownership snapshot at one point in the event sequence.
///
/// Keys are unique holder names, values are non-negative share counts.
/// The total issued shares is always the sum of the values. A BTreeMap keeps
/// iteration order stable so identical inputs serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapTable {
    holders: BTreeMap<HolderName, Decimal>,
}

impl CapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(holder, shares)` pairs; repeated names accumulate.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (HolderName, Decimal)>,
    {
        let mut table = CapTable::new();
        for (holder, shares) in entries {
            table.add_shares(holder, shares);
        }
        table
    }

    /// Shares held by `holder`, zero when absent.
    pub fn shares_of(&self, holder: &HolderName) -> Decimal {
        self.holders.get(holder).copied().unwrap_or_default()
    }

    pub fn contains(&self, holder: &HolderName) -> bool {
        self.holders.contains_key(holder)
    }

    pub fn total_shares(&self) -> Decimal {
        self.holders.values().sum()
    }

    /// Shares in the unallocated option pool.
    pub fn available_pool(&self) -> Decimal {
        self.shares_of(&HolderName::option_pool())
    }

    /// Total shares excluding the unallocated option pool.
    pub fn total_excluding_pool(&self) -> Decimal {
        self.holders
            .iter()
            .filter(|(holder, _)| !holder.is_option_pool())
            .map(|(_, shares)| *shares)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HolderName, &Decimal)> {
        self.holders.iter()
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    /// Additive, non-destructive merge: union of keys, missing keys count as zero.
    pub fn merge(&self, delta: &CapTable) -> CapTable {
        let mut merged = self.clone();
        for (holder, shares) in delta.iter() {
            merged.add_shares(holder.clone(), *shares);
        }
        merged
    }

    /// Ownership of `holder` as a 0..100 percentage of the total.
    pub fn ownership_percent(&self, holder: &HolderName) -> Decimal {
        self.shares_of(holder)
            .fraction_of(self.total_shares())
            .to_percent()
    }

    /// Value of `holder`'s stake at `valuation`.
    pub fn holder_value(&self, holder: &HolderName, valuation: Decimal) -> Decimal {
        Decimal::from_percent(self.ownership_percent(holder)) * valuation
    }

    /// Holders ordered by shares descending, ties broken by name.
    pub fn ranked(&self) -> Vec<(&HolderName, Decimal)> {
        let mut rows: Vec<_> = self.holders.iter().map(|(h, s)| (h, *s)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub(crate) fn add_shares(&mut self, holder: HolderName, shares: Decimal) {
        *self.holders.entry(holder).or_default() += shares;
    }

    pub(crate) fn remove(&mut self, holder: &HolderName) -> Decimal {
        self.holders.remove(holder).unwrap_or_default()
    }
}

/// Sum of all share counts in `table`.
pub fn total_shares(table: &CapTable) -> Decimal {
    table.total_shares()
}

/// Additive merge of `delta` into a copy of `base`.
pub fn merge_tables(base: &CapTable, delta: &CapTable) -> CapTable {
    base.merge(delta)
}
