use analytics_client::domain::{Dataset, HourlyReading};

use super::{extract_anomalies, round_to};
use crate::timestamps::hour_token;

const SCORE_CEILING: usize = 100;
const SCORE_FLOOR: usize = 60;
const PENALTY_PER_ANOMALY: usize = 10;

/// Late-night standby window, by hour-of-day.
const VAMPIRE_HOURS: [u8; 3] = [23, 0, 1];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Efficiency {
    /// 60..=100 with a dataset, 0 without.
    pub score: u8,
    pub vampire_load_kwh: f64,
}

impl Efficiency {
    pub const NONE: Efficiency = Efficiency {
        score: 0,
        vampire_load_kwh: 0.0,
    };

    pub fn vampire_load_display(&self) -> String {
        format!("{:.2}", self.vampire_load_kwh)
    }
}

/// `max(100 - 10 * anomalies, 60)`.
///
/// The floor means four or more anomalies all score 60.
pub fn efficiency_score(anomaly_count: usize) -> u8 {
    let score = SCORE_CEILING
        .saturating_sub(anomaly_count.saturating_mul(PENALTY_PER_ANOMALY))
        .max(SCORE_FLOOR);
    score as u8
}

/// Sum of `total_kwh` for readings stamped 23:xx, 00:xx or 01:xx, rounded to
/// two decimals.
pub fn vampire_load(readings: &[HourlyReading]) -> f64 {
    let sum = readings
        .iter()
        .filter(|r| hour_token(&r.datetime).is_some_and(|h| VAMPIRE_HOURS.contains(&h)))
        .fold(0.0, |acc, r| acc + r.total_kwh);
    round_to(sum, 2)
}

pub fn compute_efficiency(dataset: Option<&Dataset>) -> Efficiency {
    let Some(dataset) = dataset else {
        return Efficiency::NONE;
    };

    Efficiency {
        score: efficiency_score(extract_anomalies(&dataset.readings).len()),
        vampire_load_kwh: vampire_load(&dataset.readings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(datetime: &str, total_kwh: f64, anomaly: bool) -> HourlyReading {
        HourlyReading {
            datetime: datetime.to_string(),
            total_kwh,
            anomaly,
            ..Default::default()
        }
    }

    #[test]
    fn two_anomalies_in_ten_score_eighty() {
        let readings: Vec<HourlyReading> = (0..10)
            .map(|i| at(&format!("2024-01-01T{i:02}:00:00"), 1.0, i < 2))
            .collect();
        let dataset = Dataset {
            readings,
            ..Default::default()
        };

        assert_eq!(compute_efficiency(Some(&dataset)).score, 80);
    }

    #[test]
    fn score_is_bounded_and_non_increasing() {
        let mut previous = efficiency_score(0);
        assert_eq!(previous, 100);

        for count in 1..50 {
            let score = efficiency_score(count);
            assert!((60..=100).contains(&score));
            assert!(score <= previous);
            previous = score;
        }
        assert_eq!(efficiency_score(4), 60);
        assert_eq!(efficiency_score(usize::MAX), 60);
    }

    #[test]
    fn no_dataset_is_the_zero_sentinel() {
        let efficiency = compute_efficiency(None);

        assert_eq!(efficiency, Efficiency::NONE);
        assert_eq!(efficiency.vampire_load_display(), "0.00");
    }

    #[test]
    fn empty_dataset_still_scores() {
        let efficiency = compute_efficiency(Some(&Dataset::default()));

        assert_eq!(efficiency.score, 100);
        assert_eq!(efficiency.vampire_load_display(), "0.00");
    }

    #[test]
    fn daytime_only_dataset_shows_unsigned_zero_vampire_load() {
        let dataset = Dataset {
            readings: vec![at("2024-01-01T12:00:00", 3.0, false)],
            ..Default::default()
        };

        let efficiency = compute_efficiency(Some(&dataset));

        assert!(efficiency.vampire_load_kwh.is_sign_positive());
        assert_eq!(efficiency.vampire_load_display(), "0.00");
    }

    #[test]
    fn vampire_load_counts_only_late_night_hours() {
        let readings = [
            at("2024-01-01T23:00:00", 1.5, false),
            at("2024-01-02T00:00:00", 2.5, false),
            at("2024-01-02T05:00:00", 9.0, false),
        ];
        let dataset = Dataset {
            readings: readings.to_vec(),
            ..Default::default()
        };

        assert_eq!(compute_efficiency(Some(&dataset)).vampire_load_display(), "4.00");
    }

    #[test]
    fn vampire_load_understands_spaced_timestamps() {
        let readings: Vec<HourlyReading> = (0..24)
            .map(|h| at(&format!("2024-01-01 {h:02}:00"), 1.0, false))
            .collect();

        assert_eq!(vampire_load(&readings), 3.0);
    }

    #[test]
    fn hours_two_through_twenty_two_never_contribute() {
        let readings: Vec<HourlyReading> = (2..=22)
            .map(|h| at(&format!("2024-01-01T{h:02}:30:00"), 5.0, false))
            .collect();

        assert_eq!(vampire_load(&readings), 0.0);
    }
}
