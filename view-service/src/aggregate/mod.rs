//! Pure aggregations over canonical values. Nothing here touches shared state.

pub mod anomalies;
pub mod categories;
pub mod efficiency;
pub mod report;

pub use anomalies::{extract_anomalies, is_hvac_heavy};
pub use categories::{aggregate_categories, CategoryBreakdown, CategorySlice, CategoryTotals};
pub use efficiency::{compute_efficiency, efficiency_score, vampire_load, Efficiency};
pub use report::{aggregate_report, ReportSummary, SAVINGS_RATE};

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
