//! Budget planner state machine.
//!
//! `Idle -> Loading -> {Populated, Failed}`. Every selection change starts a
//! new generation and re-enters `Loading`; a fetch pair is applied only while
//! its generation is still the latest, so results land in request-issue order
//! no matter when they arrive.

use analytics_client::{
    domain::{BudgetCategory, BudgetPlan, ScheduleEntry},
    UpstreamError,
};
use serde_json::Value;

use crate::{
    normalize::{BudgetPlanNormalizer, ScheduleNormalizer},
    pipeline::{ApplyOutcome, Envelope, Generation, Normalize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PlannerParams {
    pub budget: u32,
    pub category: BudgetCategory,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParamsError {
    #[error("budget {0} is outside {min}..={max}", min = PlannerParams::MIN_BUDGET, max = PlannerParams::MAX_BUDGET)]
    OutOfRange(u32),
    #[error("budget {0} is not a multiple of {step}", step = PlannerParams::BUDGET_STEP)]
    OffStep(u32),
}

impl PlannerParams {
    pub const MIN_BUDGET: u32 = 100;
    pub const MAX_BUDGET: u32 = 2000;
    pub const BUDGET_STEP: u32 = 50;

    pub fn new(budget: u32, category: BudgetCategory) -> Result<Self, ParamsError> {
        if !(Self::MIN_BUDGET..=Self::MAX_BUDGET).contains(&budget) {
            return Err(ParamsError::OutOfRange(budget));
        }
        if budget % Self::BUDGET_STEP != 0 {
            return Err(ParamsError::OffStep(budget));
        }
        Ok(Self { budget, category })
    }
}

/// Schedule and budget computation for one selection, always fetched and
/// replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerData {
    pub plan: Option<BudgetPlan>,
    pub schedule: Vec<ScheduleEntry>,
}

impl PlannerData {
    pub fn from_raw(schedule: &Value, budget: &Value) -> Self {
        Self {
            plan: BudgetPlanNormalizer.normalize(Some(budget)),
            schedule: ScheduleNormalizer.normalize(Some(schedule)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerState {
    Idle,
    Loading { params: PlannerParams },
    Populated { params: PlannerParams, data: PlannerData },
    Failed { params: PlannerParams, message: String },
}

/// Issued by [`PlannerAggregator::begin`]; identifies one fetch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerTicket {
    pub generation: Generation,
    pub params: PlannerParams,
}

#[derive(Debug)]
pub struct PlannerAggregator {
    latest: Generation,
    state: PlannerState,
}

impl Default for PlannerAggregator {
    fn default() -> Self {
        Self {
            latest: Generation::default(),
            state: PlannerState::Idle,
        }
    }
}

impl PlannerAggregator {
    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn begin(&mut self, params: PlannerParams) -> PlannerTicket {
        self.latest = self.latest.next();
        self.state = PlannerState::Loading { params };
        tracing::debug!(generation = self.latest.value(), budget = params.budget, category = %params.category, "planner fetch issued");
        PlannerTicket {
            generation: self.latest,
            params,
        }
    }

    /// Apply a completed fetch pair. Anything but the latest generation, or a
    /// second result for it, is dropped.
    pub fn apply(&mut self, env: Envelope<Result<PlannerData, UpstreamError>>) -> ApplyOutcome {
        let params = match self.state {
            PlannerState::Loading { params } if env.generation == self.latest => params,
            _ => {
                metrics::counter!("planner_stale_responses_total").increment(1);
                tracing::debug!(
                    generation = env.generation.value(),
                    latest = self.latest.value(),
                    "discarding stale planner response"
                );
                return ApplyOutcome::Stale;
            }
        };

        self.state = match env.payload {
            Ok(data) => PlannerState::Populated { params, data },
            Err(e) => {
                tracing::warn!(error = %e, budget = params.budget, "planner fetch failed");
                PlannerState::Failed {
                    params,
                    message: format!("Could not load the energy plan: {e}"),
                }
            }
        };
        ApplyOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(budget: u32) -> PlannerParams {
        PlannerParams::new(budget, BudgetCategory::Total).unwrap()
    }

    fn data(total_cost: f64) -> PlannerData {
        PlannerData::from_raw(&json!([]), &json!({ "total_cost": total_cost }))
    }

    fn total_cost(state: &PlannerState) -> Option<f64> {
        match state {
            PlannerState::Populated { data, .. } => data.plan.as_ref().map(|p| p.total_cost),
            _ => None,
        }
    }

    #[test]
    fn params_are_validated() {
        assert!(PlannerParams::new(500, BudgetCategory::Kitchen).is_ok());
        assert_eq!(PlannerParams::new(50, BudgetCategory::Total), Err(ParamsError::OutOfRange(50)));
        assert_eq!(PlannerParams::new(2050, BudgetCategory::Total), Err(ParamsError::OutOfRange(2050)));
        assert_eq!(PlannerParams::new(525, BudgetCategory::Total), Err(ParamsError::OffStep(525)));
    }

    #[test]
    fn starts_idle_and_loads_on_begin() {
        let mut planner = PlannerAggregator::default();
        assert_eq!(planner.state(), &PlannerState::Idle);

        let ticket = planner.begin(params(500));

        assert_eq!(planner.state(), &PlannerState::Loading { params: params(500) });
        assert_eq!(ticket.params, params(500));
    }

    #[test]
    fn matching_generation_populates() {
        let mut planner = PlannerAggregator::default();
        let ticket = planner.begin(params(500));

        let outcome = planner.apply(Envelope::new(Ok(data(420.0)), ticket.generation));

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(total_cost(planner.state()), Some(420.0));
    }

    #[test]
    fn older_pair_arriving_last_never_overwrites_newer() {
        let mut planner = PlannerAggregator::default();
        let a = planner.begin(params(500));
        let b = planner.begin(params(800));

        assert_eq!(planner.apply(Envelope::new(Ok(data(800.0)), b.generation)), ApplyOutcome::Applied);
        assert_eq!(planner.apply(Envelope::new(Ok(data(500.0)), a.generation)), ApplyOutcome::Stale);

        assert!(matches!(planner.state(), PlannerState::Populated { params, .. } if params.budget == 800));
        assert_eq!(total_cost(planner.state()), Some(800.0));
    }

    #[test]
    fn older_pair_arriving_first_keeps_newer_loading() {
        let mut planner = PlannerAggregator::default();
        let a = planner.begin(params(500));
        let _b = planner.begin(params(800));

        assert_eq!(planner.apply(Envelope::new(Ok(data(500.0)), a.generation)), ApplyOutcome::Stale);
        assert_eq!(planner.state(), &PlannerState::Loading { params: params(800) });
    }

    #[test]
    fn transport_failure_fails_without_partial_data() {
        let mut planner = PlannerAggregator::default();
        let ticket = planner.begin(params(500));

        let err = UpstreamError::Connection("refused".to_string());
        planner.apply(Envelope::new(Err(err), ticket.generation));

        assert!(matches!(planner.state(), PlannerState::Failed { message, .. } if message.contains("refused")));
    }

    #[test]
    fn duplicate_result_for_same_generation_is_stale() {
        let mut planner = PlannerAggregator::default();
        let ticket = planner.begin(params(500));

        planner.apply(Envelope::new(Ok(data(1.0)), ticket.generation));
        let second = planner.apply(Envelope::new(Ok(data(2.0)), ticket.generation));

        assert_eq!(second, ApplyOutcome::Stale);
        assert_eq!(total_cost(planner.state()), Some(1.0));
    }
}
