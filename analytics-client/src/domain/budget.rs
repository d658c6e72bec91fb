use std::{collections::BTreeMap, fmt};

/// Optimization focus passed to the planner endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BudgetCategory {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "total"))]
    Total,
    #[cfg_attr(feature = "serde", serde(rename = "kitchen"))]
    Kitchen,
    #[cfg_attr(feature = "serde", serde(rename = "laundry"))]
    Laundry,
    #[cfg_attr(feature = "serde", serde(rename = "HVAC_lights"))]
    HvacLights,
    #[cfg_attr(feature = "serde", serde(rename = "other"))]
    Other,
}

impl BudgetCategory {
    /// Wire value used in upstream query strings.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Kitchen => "kitchen",
            Self::Laundry => "laundry",
            Self::HvacLights => "HVAC_lights",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UsageLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl UsageLevel {
    /// Case-insensitive; anything unrecognised maps to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleEntry {
    pub datetime: String,
    pub usage_level: UsageLevel,
    pub total_cost: f64,
}

/// Budget computation for one `(budget, category)` selection.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BudgetPlan {
    pub total_cost: f64,
    pub hours_allowed: f64,
    pub remaining_budget: f64,
    pub recommended_hours_per_appliance: BTreeMap<String, f64>,
}
