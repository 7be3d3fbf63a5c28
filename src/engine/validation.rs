//! Boundary validation for simulation inputs.

use crate::domain::{Decimal, Event, Exit, Founder, HolderName};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEventError {
    #[error("At least one founder is required")]
    NoFounders,
    #[error("Founder {name:?}: {reason}")]
    Founder { name: String, reason: String },
    #[error("Event {index} ({label}): {reason}")]
    Event {
        index: usize,
        label: String,
        reason: String,
    },
    #[error("Exit: {reason}")]
    Exit { reason: String },
    #[error("{label}: share counts exceed the supported numeric range")]
    Overflow { label: String },
}

/// Reject inputs the engine cannot give a meaningful answer for.
pub fn validate_inputs(
    founders: &[Founder],
    events: &[Event],
    exit: Option<&Exit>,
) -> Result<(), InvalidEventError> {
    validate_founders(founders)?;

    // Each holder name belongs to one founder or one issuing event.
    let mut owners: HashMap<&HolderName, String> = founders
        .iter()
        .map(|f| (&f.name, "a founder".to_string()))
        .collect();
    for (index, event) in events.iter().enumerate() {
        let fail = |reason: String| InvalidEventError::Event {
            index,
            label: event.label(),
            reason,
        };
        validate_event(event).map_err(&fail)?;
        if let Some(name) = event.holder_name() {
            if let Some(owner) = owners.get(name) {
                return Err(fail(format!(
                    "name {:?} is already used by {}",
                    name.as_str(),
                    owner
                )));
            }
            owners.insert(name, format!("event {}", index));
        }
    }
    if let Some(exit) = exit {
        validate_exit(exit).map_err(|reason| InvalidEventError::Exit { reason })?;
    }
    Ok(())
}

fn validate_founders(founders: &[Founder]) -> Result<(), InvalidEventError> {
    if founders.is_empty() {
        return Err(InvalidEventError::NoFounders);
    }

    let mut seen = HashSet::new();
    let mut total = Decimal::zero();
    for founder in founders {
        let fail = |reason: &str| InvalidEventError::Founder {
            name: founder.name.to_string(),
            reason: reason.to_string(),
        };
        check_name(&founder.name).map_err(|r| fail(&r))?;
        if !seen.insert(&founder.name) {
            return Err(fail("duplicate founder name"));
        }
        percent_in_range(founder.initial_equity_percent, true)
            .map_err(|r| fail(&format!("initialEquityPercent {}", r)))?;
        total += founder.initial_equity_percent;
    }

    if total > Decimal::hundred() {
        return Err(InvalidEventError::Founder {
            name: founders[founders.len() - 1].name.to_string(),
            reason: format!("founder split totals {}%, above 100%", total),
        });
    }
    Ok(())
}

fn validate_event(event: &Event) -> Result<(), String> {
    match event {
        Event::Safe(safe) => {
            check_name(&safe.name)?;
            non_negative("amount", safe.amount)?;
            non_negative("valuationCap", safe.valuation_cap)?;
            discount_in_range(safe.discount_percent)
        }
        Event::ConvertibleNote(note) => {
            check_name(&note.name)?;
            non_negative("principal", note.principal)?;
            non_negative("annualInterestRatePercent", note.annual_interest_rate_percent)?;
            non_negative("valuationCap", note.valuation_cap)?;
            discount_in_range(note.discount_percent)
        }
        Event::PricedRound(round) => {
            check_name(&round.name)?;
            non_negative("investmentAmount", round.investment_amount)?;
            if !round.valuation.is_positive() {
                return Err("valuation must be positive".to_string());
            }
            if round.investment_amount >= round.valuation {
                return Err("investmentAmount must be below the post-money valuation".to_string());
            }
            percent_in_range(round.option_pool_target_percent, false)
                .map_err(|r| format!("optionPoolTargetPercent {}", r))?;

            let pool = Decimal::from_percent(round.option_pool_target_percent);
            let investor = round.investment_amount.fraction_of(round.valuation);
            if pool.is_positive() && pool + investor >= Decimal::one() {
                return Err(
                    "option pool target plus investment share must stay below 100%".to_string(),
                );
            }
            Ok(())
        }
        Event::OptionsAction(action) => {
            percent_in_range(action.reserve_percent, false)
                .map_err(|r| format!("reservePercent {}", r))?;
            percent_in_range(action.grant_percent, true)
                .map_err(|r| format!("grantPercent {}", r))?;
            if action.recipient().is_option_pool() {
                return Err("cannot grant options to the option pool itself".to_string());
            }
            Ok(())
        }
    }
}

fn validate_exit(exit: &Exit) -> Result<(), String> {
    non_negative("amount", exit.amount)?;
    percent_in_range(exit.tax_percent, true).map_err(|r| format!("taxPercent {}", r))
}

fn check_name(name: &HolderName) -> Result<(), String> {
    if name.as_str().trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.is_reserved() {
        return Err(format!("{:?} is a reserved holder name", name.as_str()));
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> Result<(), String> {
    if value.is_negative() {
        return Err(format!("{} must not be negative, got {}", field, value));
    }
    Ok(())
}

fn discount_in_range(discount: Decimal) -> Result<(), String> {
    percent_in_range(discount, false).map_err(|r| format!("discountPercent {}", r))
}

fn percent_in_range(value: Decimal, allow_hundred: bool) -> Result<(), String> {
    let too_high = if allow_hundred {
        value > Decimal::hundred()
    } else {
        value >= Decimal::hundred()
    };
    if value.is_negative() || too_high {
        let bound = if allow_hundred { "[0, 100]" } else { "[0, 100)" };
        return Err(format!("must be within {}, got {}", bound, value));
    }
    Ok(())
}
