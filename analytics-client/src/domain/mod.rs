pub mod budget;
pub mod forecast;
pub mod reading;
pub mod report;

pub use budget::{BudgetCategory, BudgetPlan, ScheduleEntry, UsageLevel};
pub use forecast::ForecastPoint;
pub use reading::{Dataset, DatasetSummary, HourlyReading};
pub use report::ReportRow;
