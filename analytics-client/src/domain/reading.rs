/// One hour of measured or predicted household consumption.
///
/// All kWh fields are non-negative. `total_kwh` is reported upstream and only
/// approximately equals the sum of the four category fields.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HourlyReading {
    pub datetime: String,
    pub kitchen_kwh: f64,
    pub laundry_kwh: f64,
    pub hvac_lights_kwh: f64,
    pub other_kwh: f64,
    pub total_kwh: f64,
    pub anomaly: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DatasetSummary {
    pub total_kwh: f64,
    pub estimated_bill: Option<f64>,
}

/// One uploaded file's worth of analysis. Replaced wholesale on every upload.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dataset {
    pub readings: Vec<HourlyReading>,
    pub summary: DatasetSummary,
    pub recommendations: Vec<String>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
