//! Conversion schedule: which priced round (or exit) each convertible converts at.
//!
//! Computed once per simulation in a single forward pass, so the builder
//! never has to re-derive cohorts by index-range filtering.

use crate::domain::{Event, Exit, HolderName};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "eventIndex", rename_all = "camelCase")]
pub enum ConversionPoint {
    /// The priced round at this event index.
    Round(usize),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "at", rename_all = "camelCase")]
pub enum ConversionStatus {
    /// Never converts: no later priced round and no priced exit.
    Pending,
    Converted(ConversionPoint),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInstrument {
    pub event_index: usize,
    pub name: HolderName,
    pub status: ConversionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConversionSchedule {
    instruments: Vec<ScheduledInstrument>,
}

impl ConversionSchedule {
    /// Event indices converting at `point`, in issuance order.
    pub fn cohort(&self, point: ConversionPoint) -> Vec<usize> {
        self.instruments
            .iter()
            .filter(|i| i.status == ConversionStatus::Converted(point))
            .map(|i| i.event_index)
            .collect()
    }

    pub fn status_of(&self, event_index: usize) -> Option<ConversionStatus> {
        self.instruments
            .iter()
            .find(|i| i.event_index == event_index)
            .map(|i| i.status)
    }

    pub fn pending(&self) -> impl Iterator<Item = &ScheduledInstrument> {
        self.instruments
            .iter()
            .filter(|i| i.status == ConversionStatus::Pending)
    }

    pub fn instruments(&self) -> &[ScheduledInstrument] {
        &self.instruments
    }
}

/// Tag every SAFE and note with the point at which it converts.
pub fn schedule_conversions(events: &[Event], exit: Option<&Exit>) -> ConversionSchedule {
    let mut instruments = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for (index, event) in events.iter().enumerate() {
        if let Some(convertible) = event.as_convertible() {
            open.push(instruments.len());
            instruments.push(ScheduledInstrument {
                event_index: index,
                name: convertible.name().clone(),
                status: ConversionStatus::Pending,
            });
        } else if event.as_priced_round().is_some() {
            for slot in open.drain(..) {
                instruments[slot].status = ConversionStatus::Converted(ConversionPoint::Round(index));
            }
        }
    }

    if exit.is_some_and(Exit::is_priced) {
        for slot in open {
            instruments[slot].status = ConversionStatus::Converted(ConversionPoint::Exit);
        }
    }

    ConversionSchedule { instruments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, OptionsAction, PricedRound, Safe};

    fn safe(name: &str) -> Event {
        Event::Safe(Safe {
            name: HolderName::new(name),
            amount: Decimal::from(100_000i64),
            valuation_cap: Decimal::from(5_000_000i64),
            discount_percent: Decimal::zero(),
            mfn: false,
            pro_rata: false,
        })
    }

    fn round(name: &str) -> Event {
        Event::PricedRound(PricedRound {
            name: HolderName::new(name),
            investment_amount: Decimal::from(1_000_000i64),
            valuation: Decimal::from(10_000_000i64),
            option_pool_target_percent: Decimal::zero(),
            pro_rata: false,
            months_to_round: 0,
            participating_holders: vec![],
        })
    }

    #[test]
    fn test_safes_convert_at_next_round() {
        let events = vec![
            safe("A"),
            Event::OptionsAction(OptionsAction::default()),
            safe("B"),
            round("Seed"),
            safe("C"),
            round("Series A"),
        ];
        let schedule = schedule_conversions(&events, None);

        assert_eq!(schedule.cohort(ConversionPoint::Round(3)), vec![0, 2]);
        assert_eq!(schedule.cohort(ConversionPoint::Round(5)), vec![4]);
        assert_eq!(
            schedule.status_of(4),
            Some(ConversionStatus::Converted(ConversionPoint::Round(5)))
        );
        assert_eq!(schedule.pending().count(), 0);
    }

    #[test]
    fn test_trailing_safe_pending_without_exit() {
        let events = vec![round("Seed"), safe("Late")];
        let schedule = schedule_conversions(&events, None);
        assert_eq!(schedule.status_of(1), Some(ConversionStatus::Pending));
        assert!(schedule.cohort(ConversionPoint::Exit).is_empty());
    }

    #[test]
    fn test_trailing_safe_converts_at_priced_exit() {
        let events = vec![round("Seed"), safe("Late")];
        let exit = Exit::new(Decimal::from(50_000_000i64));
        let schedule = schedule_conversions(&events, Some(&exit));
        assert_eq!(schedule.cohort(ConversionPoint::Exit), vec![1]);
    }

    #[test]
    fn test_unpriced_exit_leaves_pending() {
        let events = vec![safe("Late")];
        let exit = Exit::new(Decimal::zero());
        let schedule = schedule_conversions(&events, Some(&exit));
        assert_eq!(schedule.pending().count(), 1);
    }

    #[test]
    fn test_non_convertibles_not_scheduled() {
        let events = vec![round("Seed"), Event::OptionsAction(OptionsAction::default())];
        assert!(schedule_conversions(&events, None).instruments().is_empty());
        assert_eq!(schedule_conversions(&events, None).status_of(0), None);
    }
}
