use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{CapTable, Decimal, Event, Exit, Founder};
use crate::engine::schedule::ScheduledInstrument;
use crate::engine::{exit_payouts, simulate, GrantOutcome, Step, StepKind};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub founders: Vec<Founder>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub exit: Option<Exit>,
}

impl SimulationRequest {
    /// Stable fingerprint of the request for client-side caching.
    ///
    /// SHA-256 over the re-serialized request, truncated to 128 bits; field
    /// order is fixed by the struct definitions so equal inputs hash equal.
    pub fn scenario_key(&self) -> Result<String, serde_json::Error> {
        use sha2::{Digest, Sha256};

        let canonical = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&canonical);
        Ok(format!("scn:{}", hex::encode(&hash[..16])))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub scenario_key: String,
    pub steps: Vec<StepDto>,
    pub grants: Vec<GrantDto>,
    pub conversions: Vec<ScheduledInstrument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts: Option<Vec<PayoutDto>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_index: Option<usize>,
    pub label: String,
    pub kind: StepKind,
    pub total_shares: String,
    pub holders: Vec<HolderDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderDto {
    pub name: String,
    pub shares: String,
    pub percent: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantDto {
    pub event_index: usize,
    pub recipient: String,
    pub requested_percent: String,
    pub available_percent: String,
    pub applied: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDto {
    pub holder: String,
    pub percent: String,
    pub gross: String,
    pub after_tax: String,
}

/// Display precision for share counts and percentages.
fn fmt(value: Decimal, dp: u32) -> String {
    value.round_dp(dp).to_canonical_string()
}

fn holders(table: &CapTable) -> Vec<HolderDto> {
    table
        .ranked()
        .into_iter()
        .map(|(holder, shares)| HolderDto {
            name: holder.to_string(),
            shares: fmt(shares, 2),
            percent: fmt(table.ownership_percent(holder), 4),
        })
        .collect()
}

impl StepDto {
    fn from_step(index: usize, step: &Step) -> Self {
        Self {
            index,
            event_index: step.event_index,
            label: step.label.clone(),
            kind: step.kind,
            total_shares: fmt(step.table.total_shares(), 2),
            holders: holders(&step.table),
        }
    }
}

impl From<&GrantOutcome> for GrantDto {
    fn from(grant: &GrantOutcome) -> Self {
        Self {
            event_index: grant.event_index,
            recipient: grant.recipient.to_string(),
            requested_percent: grant.requested_percent.to_canonical_string(),
            available_percent: grant.available_percent.to_canonical_string(),
            applied: grant.applied,
        }
    }
}

pub async fn post_cap_tables(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationResponse>, AppError> {
    if request.events.len() > state.config.max_events {
        return Err(AppError::BadRequest(format!(
            "Too many events: {} (max {})",
            request.events.len(),
            state.config.max_events
        )));
    }

    let scenario_key = request.scenario_key()?;
    let simulation = simulate(&request.founders, &request.events, request.exit.as_ref())?;

    let payouts: Option<Vec<PayoutDto>> = request
        .exit
        .as_ref()
        .filter(|exit| exit.is_priced())
        .zip(simulation.final_table())
        .map(|(exit, table)| {
            exit_payouts(table, exit)
                .into_iter()
                .map(|p| PayoutDto {
                    holder: p.holder.to_string(),
                    percent: fmt(p.percent, 4),
                    gross: fmt(p.gross, 2),
                    after_tax: fmt(p.after_tax, 2),
                })
                .collect()
        });

    tracing::info!(
        scenario = %scenario_key,
        founders = request.founders.len(),
        events = request.events.len(),
        steps = simulation.steps.len(),
        "Computed cap table sequence"
    );

    Ok(Json(SimulationResponse {
        scenario_key,
        steps: simulation
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepDto::from_step(i, step))
            .collect(),
        grants: simulation.grants.iter().map(GrantDto::from).collect(),
        conversions: simulation.schedule.instruments().to_vec(),
        payouts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SimulationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scenario_key_is_stable() {
        let a = request(r#"{"founders": [{"name": "Alice", "initialEquityPercent": 100}]}"#);
        let b = request(r#"{"events": [], "founders": [{"initialEquityPercent": 100, "name": "Alice"}]}"#);
        let key = a.scenario_key().unwrap();
        assert!(key.starts_with("scn:"));
        assert_eq!(key.len(), 4 + 32);
        assert_eq!(key, b.scenario_key().unwrap());
    }

    #[test]
    fn test_scenario_key_changes_with_inputs() {
        let a = request(r#"{"founders": [{"name": "Alice", "initialEquityPercent": 100}]}"#);
        let b = request(r#"{"founders": [{"name": "Bob", "initialEquityPercent": 100}]}"#);
        assert_ne!(a.scenario_key().unwrap(), b.scenario_key().unwrap());
    }
}
