//! Financing events: SAFEs, convertible notes, priced rounds and option actions.
//!
//! Position in the event list is significant. It decides which priced round a
//! convertible instrument converts at and which peers an MFN instrument may
//! compare itself against.

use crate::domain::{Decimal, HolderName};
use serde::{Deserialize, Serialize};

/// Simple Agreement for Future Equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Safe {
    pub name: HolderName,
    pub amount: Decimal,
    /// Zero means uncapped.
    #[serde(default)]
    pub valuation_cap: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub mfn: bool,
    #[serde(default)]
    pub pro_rata: bool,
}

/// Interest-bearing convertible debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertibleNote {
    pub name: HolderName,
    pub principal: Decimal,
    #[serde(default)]
    pub annual_interest_rate_percent: Decimal,
    #[serde(default)]
    pub term_months: u32,
    /// Zero means uncapped.
    #[serde(default)]
    pub valuation_cap: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub mfn: bool,
    #[serde(default)]
    pub pro_rata: bool,
}

/// Priced equity round led by a named investor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedRound {
    pub name: HolderName,
    pub investment_amount: Decimal,
    /// Post-money valuation (pre-money + investment).
    pub valuation: Decimal,
    /// Target unallocated pool after the round, 0..100. Zero means no pool shuffle.
    #[serde(default)]
    pub option_pool_target_percent: Decimal,
    /// Whether this round's investor may take pro-rata in later rounds.
    #[serde(default)]
    pub pro_rata: bool,
    /// Months since the company started; drives note interest accrual.
    #[serde(default)]
    pub months_to_round: u32,
    /// Holders exercising their pro-rata right in this round.
    #[serde(default)]
    pub participating_holders: Vec<HolderName>,
}

impl PricedRound {
    pub fn pre_money(&self) -> Decimal {
        self.valuation - self.investment_amount
    }
}

/// Option pool reservation and/or grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsAction {
    /// Grow the pool to this percentage of the total, 0..100. Zero means none.
    #[serde(default)]
    pub reserve_percent: Decimal,
    /// Percentage of the total to grant from the pool. Zero means none.
    #[serde(default)]
    pub grant_percent: Decimal,
    /// Grant recipient; grants without one go to the employee pool.
    #[serde(default)]
    pub grant_recipient: Option<HolderName>,
}

impl OptionsAction {
    pub fn recipient(&self) -> HolderName {
        self.grant_recipient
            .clone()
            .filter(|name| !name.as_str().trim().is_empty())
            .unwrap_or_else(HolderName::employee_pool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Safe(Safe),
    ConvertibleNote(ConvertibleNote),
    PricedRound(PricedRound),
    OptionsAction(OptionsAction),
}

impl Event {
    /// Display label for the snapshot this event produces.
    pub fn label(&self) -> String {
        match self {
            Event::Safe(safe) => safe.name.to_string(),
            Event::ConvertibleNote(note) => note.name.to_string(),
            Event::PricedRound(round) => round.name.to_string(),
            Event::OptionsAction(action) if action.grant_percent.is_positive() => {
                format!("Options grant to {}", action.recipient())
            }
            Event::OptionsAction(_) => "Option pool".to_string(),
        }
    }

    /// Cap-table key this event issues shares under; options actions have none.
    pub fn holder_name(&self) -> Option<&HolderName> {
        match self {
            Event::Safe(safe) => Some(&safe.name),
            Event::ConvertibleNote(note) => Some(&note.name),
            Event::PricedRound(round) => Some(&round.name),
            Event::OptionsAction(_) => None,
        }
    }

    pub fn as_convertible(&self) -> Option<Convertible<'_>> {
        match self {
            Event::Safe(safe) => Some(Convertible::Safe(safe)),
            Event::ConvertibleNote(note) => Some(Convertible::Note(note)),
            _ => None,
        }
    }

    pub fn as_priced_round(&self) -> Option<&PricedRound> {
        match self {
            Event::PricedRound(round) => Some(round),
            _ => None,
        }
    }
}

/// Borrowed view over the two instrument kinds that convert later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convertible<'a> {
    Safe(&'a Safe),
    Note(&'a ConvertibleNote),
}

impl<'a> Convertible<'a> {
    pub fn name(&self) -> &'a HolderName {
        match self {
            Convertible::Safe(safe) => &safe.name,
            Convertible::Note(note) => &note.name,
        }
    }

    pub fn valuation_cap(&self) -> Decimal {
        match self {
            Convertible::Safe(safe) => safe.valuation_cap,
            Convertible::Note(note) => note.valuation_cap,
        }
    }

    pub fn discount_percent(&self) -> Decimal {
        match self {
            Convertible::Safe(safe) => safe.discount_percent,
            Convertible::Note(note) => note.discount_percent,
        }
    }

    pub fn mfn(&self) -> bool {
        match self {
            Convertible::Safe(safe) => safe.mfn,
            Convertible::Note(note) => note.mfn,
        }
    }

    pub fn pro_rata(&self) -> bool {
        match self {
            Convertible::Safe(safe) => safe.pro_rata,
            Convertible::Note(note) => note.pro_rata,
        }
    }
}
