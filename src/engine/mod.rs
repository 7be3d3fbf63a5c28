//! Pure computation engine for cap-table evolution.
//!
//! Everything here is synchronous and side-effect free: the same founders,
//! events and exit always produce the same snapshots.

use crate::domain::{CapTable, Decimal, Exit, HolderName, PricedRound};
use serde::Serialize;

pub mod builder;
pub mod dilution;
pub mod mfn;
pub mod option_pool;
pub mod payout;
pub mod pro_rata;
pub mod schedule;
pub mod validation;
pub mod valuation;

pub use builder::{build_cap_table_sequence, simulate, CapTableBuilder, Phase};
pub use dilution::{aggregate_dilution, Conversion, MAX_DILUTION_FRACTION};
pub use mfn::apply_mfn;
pub use option_pool::{size_option_pool, PoolSizing};
pub use payout::{exit_payouts, Payout};
pub use pro_rata::allocate_pro_rata;
pub use schedule::{schedule_conversions, ConversionPoint, ConversionSchedule, ConversionStatus};
pub use validation::{validate_inputs, InvalidEventError};
pub use valuation::{accrued_amount, effective_valuation, resolve_instrument};

/// The price point a cohort converts against: a priced round or the exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionTarget {
    pub valuation: Decimal,
    /// Months elapsed, for note interest.
    pub months: u32,
}

impl ConversionTarget {
    pub fn from_round(round: &PricedRound) -> Self {
        Self {
            valuation: round.valuation,
            months: round.months_to_round,
        }
    }

    /// The exit acts as a round with no new money and no pool growth.
    pub fn from_exit(exit: &Exit) -> Self {
        Self {
            valuation: exit.amount,
            months: exit.months_to_exit,
        }
    }
}

/// A SAFE or note priced against a specific conversion target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstrument {
    /// Issuance position in the event log.
    pub index: usize,
    pub name: HolderName,
    /// Purchase amount, or principal plus accrued interest.
    pub amount: Decimal,
    pub valuation: Decimal,
    pub mfn: bool,
    pub pro_rata: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    Founders,
    Safe,
    ConvertibleNote,
    PricedRound,
    OptionsAction,
    ExitConversion,
    OptionDistribution,
}

/// One snapshot in the sequence and what produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Source event, None for the founder table and exit steps.
    pub event_index: Option<usize>,
    pub label: String,
    pub kind: StepKind,
    pub table: CapTable,
}

/// Whether an options grant went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantOutcome {
    pub event_index: usize,
    pub recipient: HolderName,
    pub requested_percent: Decimal,
    /// Unallocated pool as a percentage of the total, rounded to two decimals.
    pub available_percent: Decimal,
    pub applied: bool,
}

/// Full output of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub steps: Vec<Step>,
    pub grants: Vec<GrantOutcome>,
    pub schedule: ConversionSchedule,
}

impl Simulation {
    pub fn tables(&self) -> impl Iterator<Item = &CapTable> {
        self.steps.iter().map(|s| &s.table)
    }

    pub fn into_tables(self) -> Vec<CapTable> {
        self.steps.into_iter().map(|s| s.table).collect()
    }

    pub fn final_table(&self) -> Option<&CapTable> {
        self.steps.last().map(|s| &s.table)
    }
}
