use analytics_client::domain::{BudgetPlan, ScheduleEntry, UsageLevel};
use serde_json::Value;

use super::{coerce_f64, coerce_string, number_or_zero, record_unrecognized};
use crate::pipeline::Normalize;

pub fn normalize_schedule(raw: Option<&Value>) -> Vec<ScheduleEntry> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| ScheduleEntry {
            datetime: entry.get("datetime").and_then(coerce_string).unwrap_or_default(),
            usage_level: entry
                .get("usage_level")
                .and_then(Value::as_str)
                .map(UsageLevel::parse)
                .unwrap_or(UsageLevel::Unknown),
            total_cost: number_or_zero(entry, &["total_cost"]),
        })
        .collect()
}

/// Budget computation document; anything but an object yields `None`.
pub fn normalize_budget_plan(raw: Option<&Value>) -> Option<BudgetPlan> {
    let doc = raw?.as_object()?;

    let recommended_hours_per_appliance = doc
        .get("recommended_hours_per_appliance")
        .and_then(Value::as_object)
        .map(|hours| {
            hours
                .iter()
                .map(|(appliance, h)| (appliance.clone(), coerce_f64(h).unwrap_or(0.0).max(0.0)))
                .collect()
        })
        .unwrap_or_default();

    Some(BudgetPlan {
        total_cost: number_or_zero(doc, &["total_cost"]),
        hours_allowed: number_or_zero(doc, &["hours_allowed"]),
        remaining_budget: number_or_zero(doc, &["remaining_budget"]),
        recommended_hours_per_appliance,
    })
}

#[derive(Clone, Default)]
pub struct ScheduleNormalizer;

impl Normalize<Vec<ScheduleEntry>> for ScheduleNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Vec<ScheduleEntry> {
        if !matches!(raw, None | Some(Value::Null | Value::Array(_))) {
            record_unrecognized("schedule");
        }
        normalize_schedule(raw)
    }
}

#[derive(Clone, Default)]
pub struct BudgetPlanNormalizer;

impl Normalize<Option<BudgetPlan>> for BudgetPlanNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Option<BudgetPlan> {
        let plan = normalize_budget_plan(raw);
        if plan.is_none() && !matches!(raw, None | Some(Value::Null)) {
            record_unrecognized("budget_plan");
        }
        plan
    }
}
