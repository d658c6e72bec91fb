use analytics_client::domain::{BudgetCategory, ScheduleEntry};
use serde::Serialize;

use super::ViewState;
use crate::{
    config::DisplayConfig,
    planner::{PlannerData, PlannerParams, PlannerState},
    timestamps,
};

/// Bar width per recommended hour, capped at 100.
const BAR_PERCENT_PER_HOUR: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStats {
    pub total_cost: f64,
    pub hours_allowed: f64,
    pub remaining_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub time: String,
    pub level: &'static str,
    /// Lower-case level, used as a styling hook.
    pub level_class: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub appliance: String,
    pub display_name: String,
    pub hours: String,
    pub bar_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerModel {
    pub budget: u32,
    pub category: BudgetCategory,
    pub currency: &'static str,
    pub stats: Option<BudgetStats>,
    pub schedule: Vec<ScheduleRow>,
    pub allocations: Vec<Allocation>,
}

pub fn planner_view(state: &PlannerState, display: &DisplayConfig) -> ViewState<PlannerModel> {
    match state {
        PlannerState::Idle => ViewState::NoData,
        PlannerState::Loading { .. } => ViewState::Loading,
        PlannerState::Failed { message, .. } => ViewState::Failed {
            message: message.clone(),
        },
        PlannerState::Populated { params, data } => {
            if data.plan.is_none() && data.schedule.is_empty() {
                return ViewState::Empty;
            }
            ViewState::Populated(build(*params, data, display))
        }
    }
}

fn build(params: PlannerParams, data: &PlannerData, display: &DisplayConfig) -> PlannerModel {
    let stats = data.plan.as_ref().map(|plan| BudgetStats {
        total_cost: plan.total_cost,
        hours_allowed: plan.hours_allowed,
        remaining_budget: plan.remaining_budget,
    });

    let allocations = data
        .plan
        .iter()
        .flat_map(|plan| plan.recommended_hours_per_appliance.iter())
        .map(|(appliance, hours)| Allocation {
            appliance: appliance.clone(),
            display_name: appliance.replacen('_', " ", 1),
            hours: format!("{hours:.1}"),
            bar_percent: (hours * BAR_PERCENT_PER_HOUR).min(100.0),
        })
        .collect();

    PlannerModel {
        budget: params.budget,
        category: params.category,
        currency: display.currency.symbol(),
        stats,
        schedule: data.schedule.iter().map(schedule_row).collect(),
        allocations,
    }
}

fn schedule_row(entry: &ScheduleEntry) -> ScheduleRow {
    let level = entry.usage_level.label();
    ScheduleRow {
        time: timestamps::clock_label(&entry.datetime).unwrap_or_else(|| entry.datetime.clone()),
        level,
        level_class: level.to_ascii_lowercase(),
        total_cost: entry.total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> PlannerParams {
        PlannerParams::new(500, BudgetCategory::Laundry).unwrap()
    }

    #[test]
    fn non_populated_states_map_directly() {
        let display = DisplayConfig::default();

        assert_eq!(planner_view(&PlannerState::Idle, &display), ViewState::NoData);
        assert_eq!(
            planner_view(&PlannerState::Loading { params: params() }, &display),
            ViewState::Loading
        );
        assert_eq!(
            planner_view(
                &PlannerState::Failed {
                    params: params(),
                    message: "Could not load the energy plan: down".to_string(),
                },
                &display
            ),
            ViewState::Failed {
                message: "Could not load the energy plan: down".to_string()
            }
        );
    }

    #[test]
    fn populated_planner_builds_rows_and_bars() {
        let data = PlannerData::from_raw(
            &json!([{"datetime": "2024-01-01 18:00:00", "usage_level": "High", "total_cost": 12.0}]),
            &json!({
                "total_cost": 420.0,
                "hours_allowed": 40,
                "remaining_budget": 80,
                "recommended_hours_per_appliance": {"washing_machine_main": 6, "ac_unit": 30}
            }),
        );
        let state = PlannerState::Populated { params: params(), data };

        let ViewState::Populated(model) = planner_view(&state, &DisplayConfig::default()) else {
            panic!("expected populated planner");
        };

        assert_eq!(model.stats.as_ref().map(|s| s.remaining_budget), Some(80.0));
        assert_eq!(model.schedule[0].time, "18:00");
        assert_eq!(model.schedule[0].level_class, "high");

        // BTreeMap order
        assert_eq!(model.allocations[0].display_name, "ac unit");
        assert_eq!(model.allocations[0].bar_percent, 100.0);
        assert_eq!(model.allocations[1].display_name, "washing machine_main");
        assert_eq!(model.allocations[1].hours, "6.0");
        assert_eq!(model.allocations[1].bar_percent, 24.0);
    }

    #[test]
    fn populated_with_nothing_usable_is_empty() {
        let data = PlannerData::from_raw(&json!([]), &json!(null));
        let state = PlannerState::Populated { params: params(), data };
        assert_eq!(planner_view(&state, &DisplayConfig::default()), ViewState::Empty);
    }
}
