use analytics_client::domain::HourlyReading;

/// Readings flagged upstream as anomalous, in original order.
pub fn extract_anomalies(readings: &[HourlyReading]) -> Vec<&HourlyReading> {
    readings.iter().filter(|r| r.anomaly).collect()
}

/// Advisory label only; never used to filter.
pub fn is_hvac_heavy(reading: &HourlyReading) -> bool {
    reading.hvac_lights_kwh > reading.kitchen_kwh + reading.laundry_kwh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_flagged_readings_in_order() {
        let readings: Vec<HourlyReading> = (0..6)
            .map(|i| HourlyReading {
                datetime: format!("2024-01-01 0{i}:00"),
                anomaly: i % 2 == 1,
                ..Default::default()
            })
            .collect();

        let flagged: Vec<&str> = extract_anomalies(&readings).iter().map(|r| r.datetime.as_str()).collect();

        assert_eq!(flagged, ["2024-01-01 01:00", "2024-01-01 03:00", "2024-01-01 05:00"]);
    }

    #[test]
    fn hvac_heavy_requires_strictly_more_than_kitchen_and_laundry() {
        let mut r = HourlyReading {
            kitchen_kwh: 1.0,
            laundry_kwh: 0.5,
            hvac_lights_kwh: 1.5,
            ..Default::default()
        };
        assert!(!is_hvac_heavy(&r));

        r.hvac_lights_kwh = 1.6;
        assert!(is_hvac_heavy(&r));
    }
}
