//! Founders and the exit event that bracket a simulation.

use crate::domain::{Decimal, HolderName};
use serde::{Deserialize, Serialize};

/// A founder and their share of the initial equity, 0..100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub name: HolderName,
    pub initial_equity_percent: Decimal,
}

impl Founder {
    pub fn new(name: impl Into<String>, initial_equity_percent: Decimal) -> Self {
        Self {
            name: HolderName::new(name),
            initial_equity_percent,
        }
    }
}

/// Sale of the company. Terminal: nothing follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exit {
    /// Sale valuation; zero means no exit has been priced yet.
    pub amount: Decimal,
    /// Flat tax applied to payouts for display, 0..100.
    #[serde(default)]
    pub tax_percent: Decimal,
    /// Months since start, for interest on notes that convert at exit.
    #[serde(default)]
    pub months_to_exit: u32,
}

impl Exit {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    /// An exit only triggers conversion and distribution once priced.
    pub fn is_priced(&self) -> bool {
        self.amount.is_positive()
    }
}
