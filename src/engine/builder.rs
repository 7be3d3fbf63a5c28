use super::dilution::{aggregate_dilution, Conversion};
use super::mfn::{apply_mfn, best_valuation};
use super::option_pool::{reserve_shares, size_option_pool};
use super::pro_rata::allocate_pro_rata;
use super::schedule::{schedule_conversions, ConversionPoint, ConversionSchedule};
use super::valuation::resolve_instrument;
use super::validation::{validate_inputs, InvalidEventError};
use super::{ConversionTarget, GrantOutcome, ResolvedInstrument, Simulation, Step, StepKind};
use crate::domain::{
    CapTable, Decimal, Event, Exit, Founder, HolderName, OptionsAction, PricedRound,
    INITIAL_SHARES,
};
use tracing::{debug, warn};

const EXIT_LABEL: &str = "Exit";

/// Where the builder is in the event sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoPricedRound,
    BetweenRounds { last_priced: usize },
    ExitPending,
    Terminal,
}

/// Walks the event log once and records a snapshot per step.
///
/// Owns every piece of intermediate state; the snapshots it hands out are
/// independent copies.
pub struct CapTableBuilder<'a> {
    events: &'a [Event],
    exit: Option<&'a Exit>,
    schedule: ConversionSchedule,
    phase: Phase,
    current: CapTable,
    /// Holders that may exercise pro-rata from here on: converted SAFEs and
    /// notes flagged `proRata`, and earlier priced-round investors.
    pro_rata_holders: Vec<HolderName>,

    // Outputs accumulated during processing.
    steps: Vec<Step>,
    grants: Vec<GrantOutcome>,
}

impl<'a> CapTableBuilder<'a> {
    pub fn new(founders: &[Founder], events: &'a [Event], exit: Option<&'a Exit>) -> Self {
        let initial = Decimal::from(INITIAL_SHARES);
        let current = CapTable::from_entries(founders.iter().map(|f| {
            (
                f.name.clone(),
                Decimal::from_percent(f.initial_equity_percent) * initial,
            )
        }));

        let mut builder = Self {
            events,
            exit,
            schedule: schedule_conversions(events, exit),
            phase: Phase::NoPricedRound,
            current,
            pro_rata_holders: Vec::new(),
            steps: Vec::new(),
            grants: Vec::new(),
        };
        builder.record(None, "Founders".to_string(), StepKind::Founders);
        builder
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Process every event, then the exit if one is priced.
    ///
    /// Fails only when share counts outgrow the decimal range.
    pub fn run(mut self) -> Result<Simulation, InvalidEventError> {
        let events = self.events;
        for (index, event) in events.iter().enumerate() {
            self.process_event(index, event)?;
        }
        self.finish()?;

        Ok(Simulation {
            steps: self.steps,
            grants: self.grants,
            schedule: self.schedule,
        })
    }

    fn process_event(&mut self, index: usize, event: &Event) -> Result<(), InvalidEventError> {
        let kind = match event {
            // Convertibles only move the table once their cohort converts.
            Event::Safe(_) => StepKind::Safe,
            Event::ConvertibleNote(_) => StepKind::ConvertibleNote,
            Event::PricedRound(round) => {
                self.handle_priced_round(index, round)
                    .ok_or_else(|| overflow(event.label()))?;
                StepKind::PricedRound
            }
            Event::OptionsAction(action) => {
                self.handle_options_action(index, action)
                    .ok_or_else(|| overflow(event.label()))?;
                StepKind::OptionsAction
            }
        };
        self.record(Some(index), event.label(), kind);
        Ok(())
    }

    /// Returns `None` on numeric overflow.
    fn handle_priced_round(&mut self, index: usize, round: &PricedRound) -> Option<()> {
        let target = ConversionTarget::from_round(round);
        let cohort = self.resolve_cohort(ConversionPoint::Round(index), &target)?;

        // Flagged SAFEs and notes keep their name once converted, so they stay
        // eligible in this and every later round.
        for instrument in cohort.iter().filter(|i| i.pro_rata) {
            self.grant_pro_rata_right(&instrument.name);
        }

        self.convert(&cohort, index)?;

        let sizing = size_option_pool(
            self.current.total_shares(),
            self.current.available_pool(),
            round,
        )?;
        if sizing.new_pool_shares.is_positive() {
            self.current
                .add_shares(HolderName::option_pool(), sizing.new_pool_shares);
        }

        let investor_shares =
            (sizing.future_total - self.current.total_shares()).max(Decimal::zero());
        let awards = allocate_pro_rata(
            &self.current,
            &self.pro_rata_holders,
            &round.participating_holders,
            &round.name,
            investor_shares,
        );
        let lead_shares = (investor_shares - awards.total_shares()).max(Decimal::zero());

        self.current = self.current.merge(&awards);
        self.current.add_shares(round.name.clone(), lead_shares);

        debug!(
            round = %round.name,
            event_index = index,
            new_pool = %sizing.new_pool_shares,
            investor_shares = %investor_shares,
            pro_rata_holders = awards.len(),
            total = %self.current.total_shares(),
            "Applied priced round"
        );

        if round.pro_rata {
            self.grant_pro_rata_right(&round.name);
        }
        self.phase = Phase::BetweenRounds { last_priced: index };
        Some(())
    }

    fn grant_pro_rata_right(&mut self, holder: &HolderName) {
        if !self.pro_rata_holders.contains(holder) {
            self.pro_rata_holders.push(holder.clone());
        }
    }

    /// Returns `None` on numeric overflow.
    fn handle_options_action(&mut self, index: usize, action: &OptionsAction) -> Option<()> {
        if action.reserve_percent.is_positive() {
            let added = reserve_shares(
                self.current.total_shares(),
                self.current.available_pool(),
                action.reserve_percent,
            )?;
            if added.is_positive() {
                self.current.add_shares(HolderName::option_pool(), added);
            }
        }

        if !action.grant_percent.is_positive() {
            return Some(());
        }

        let total = self.current.total_shares();
        let pool = self.current.available_pool();
        // Compared at two decimals; a grant just over the rounded pool is skipped.
        let available_percent = pool.fraction_of(total).to_percent().round_dp(2);
        let applied = action.grant_percent <= available_percent;

        if applied {
            // Rounding can admit a grant slightly above the pool; it takes the pool.
            let shares = (Decimal::from_percent(action.grant_percent) * total).min(pool);
            self.current.add_shares(HolderName::option_pool(), -shares);
            self.current.add_shares(action.recipient(), shares);
        } else {
            warn!(
                event_index = index,
                requested_percent = %action.grant_percent,
                available_percent = %available_percent,
                "Option grant skipped: insufficient pool"
            );
        }

        self.grants.push(GrantOutcome {
            event_index: index,
            recipient: action.recipient(),
            requested_percent: action.grant_percent,
            available_percent,
            applied,
        });
        Some(())
    }

    fn finish(&mut self) -> Result<(), InvalidEventError> {
        let Some(exit) = self.exit.filter(|e| e.is_priced()) else {
            self.phase = Phase::Terminal;
            return Ok(());
        };
        self.phase = Phase::ExitPending;

        let target = ConversionTarget::from_exit(exit);
        let cohort = self
            .resolve_cohort(ConversionPoint::Exit, &target)
            .ok_or_else(|| overflow(EXIT_LABEL))?;
        self.convert(&cohort, self.events.len())
            .ok_or_else(|| overflow(EXIT_LABEL))?;
        self.record(None, "Exit conversion".to_string(), StepKind::ExitConversion);

        self.distribute_pool();
        self.record(None, "Option distribution".to_string(), StepKind::OptionDistribution);
        self.phase = Phase::Terminal;
        Ok(())
    }

    /// Hand unallocated pool shares to every other holder pro rata.
    fn distribute_pool(&mut self) {
        let pool = self.current.available_pool();
        let base = self.current.total_excluding_pool();
        if !pool.is_positive() || !base.is_positive() {
            return;
        }

        let pool_key = HolderName::option_pool();
        self.current.remove(&pool_key);
        let bonus: Vec<_> = self
            .current
            .iter()
            .map(|(holder, shares)| (holder.clone(), shares.fraction_of(base) * pool))
            .collect();
        self.current = self.current.merge(&CapTable::from_entries(bonus));
    }

    /// Price and MFN-adjust every instrument converting at `point`.
    fn resolve_cohort(
        &self,
        point: ConversionPoint,
        target: &ConversionTarget,
    ) -> Option<Vec<ResolvedInstrument>> {
        let priced = self
            .schedule
            .cohort(point)
            .into_iter()
            .filter_map(|index| {
                self.events[index]
                    .as_convertible()
                    .map(|c| resolve_instrument(index, c, target))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(apply_mfn(&priced))
    }

    fn convert(&mut self, cohort: &[ResolvedInstrument], at_index: usize) -> Option<Conversion> {
        let conversion = aggregate_dilution(cohort, self.current.total_shares())?;
        if conversion.was_capped() {
            warn!(
                event_index = at_index,
                raw_fraction = conversion.raw_fraction.to_f64_lossy(),
                applied_fraction = conversion.applied_fraction.to_f64_lossy(),
                "Convertible claims exceed the dilution ceiling; scaling down"
            );
        }
        if !cohort.is_empty() {
            debug!(
                event_index = at_index,
                instruments = cohort.len(),
                best_valuation = ?best_valuation(cohort),
                post_total = %conversion.post_total,
                "Converted cohort"
            );
        }
        self.current = self.current.merge(&conversion.issued);
        Some(conversion)
    }

    fn record(&mut self, event_index: Option<usize>, label: String, kind: StepKind) {
        self.steps.push(Step {
            event_index,
            label,
            kind,
            table: self.current.clone(),
        });
    }
}

fn overflow(label: impl Into<String>) -> InvalidEventError {
    InvalidEventError::Overflow {
        label: label.into(),
    }
}

/// Run the full simulation after validating its inputs.
pub fn simulate(
    founders: &[Founder],
    events: &[Event],
    exit: Option<&Exit>,
) -> Result<Simulation, InvalidEventError> {
    validate_inputs(founders, events, exit)?;
    CapTableBuilder::new(founders, events, exit).run()
}

/// Snapshots after the founders, each event, and (with a priced exit) the
/// exit conversion and final pool distribution.
pub fn build_cap_table_sequence(
    founders: &[Founder],
    events: &[Event],
    exit: Option<&Exit>,
) -> Result<Vec<CapTable>, InvalidEventError> {
    simulate(founders, events, exit).map(Simulation::into_tables)
}
