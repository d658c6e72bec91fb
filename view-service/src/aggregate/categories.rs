use analytics_client::domain::HourlyReading;
use serde::Serialize;

use super::round_to;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub kitchen: f64,
    pub laundry: f64,
    pub hvac: f64,
    pub other: f64,
}

/// Per-category usage, or `Empty` when there was nothing to sum.
///
/// `Empty` is a display affordance, not a measurement: renderers draw it as a
/// single neutral slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryBreakdown {
    Empty,
    Totals(CategoryTotals),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: &'static str,
    pub value: f64,
}

pub const NO_DATA_LABEL: &str = "No Data";

impl CategoryBreakdown {
    pub fn slices(&self) -> Vec<CategorySlice> {
        match self {
            Self::Empty => vec![CategorySlice {
                name: NO_DATA_LABEL,
                value: 1.0,
            }],
            Self::Totals(t) => vec![
                CategorySlice { name: "Kitchen Appliances", value: t.kitchen },
                CategorySlice { name: "Laundry", value: t.laundry },
                CategorySlice { name: "HVAC & Lighting", value: t.hvac },
                CategorySlice { name: "Other", value: t.other },
            ],
        }
    }
}

pub fn aggregate_categories(readings: &[HourlyReading]) -> CategoryBreakdown {
    if readings.is_empty() {
        return CategoryBreakdown::Empty;
    }

    let raw = readings.iter().fold(CategoryTotals::default(), |mut acc, r| {
        acc.kitchen += r.kitchen_kwh;
        acc.laundry += r.laundry_kwh;
        acc.hvac += r.hvac_lights_kwh;
        acc.other += r.other_kwh;
        acc
    });

    CategoryBreakdown::Totals(CategoryTotals {
        kitchen: round_to(raw.kitchen, 2),
        laundry: round_to(raw.laundry, 2),
        hvac: round_to(raw.hvac, 2),
        other: round_to(raw.other, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(kitchen: f64, laundry: f64, hvac: f64, other: f64) -> HourlyReading {
        HourlyReading {
            kitchen_kwh: kitchen,
            laundry_kwh: laundry,
            hvac_lights_kwh: hvac,
            other_kwh: other,
            total_kwh: kitchen + laundry + hvac + other,
            ..Default::default()
        }
    }

    #[test]
    fn kitchen_only_readings() {
        let readings = [reading(1.0, 0.0, 0.0, 0.0), reading(2.0, 0.0, 0.0, 0.0), reading(3.0, 0.0, 0.0, 0.0)];

        assert_eq!(
            aggregate_categories(&readings),
            CategoryBreakdown::Totals(CategoryTotals {
                kitchen: 6.0,
                laundry: 0.0,
                hvac: 0.0,
                other: 0.0,
            })
        );
    }

    #[test]
    fn empty_input_is_the_placeholder_variant() {
        let breakdown = aggregate_categories(&[]);

        assert_eq!(breakdown, CategoryBreakdown::Empty);
        assert_eq!(
            breakdown.slices(),
            vec![CategorySlice {
                name: NO_DATA_LABEL,
                value: 1.0
            }]
        );
    }

    #[test]
    fn totals_track_summed_total_kwh_within_rounding() {
        let readings: Vec<HourlyReading> = (0..48)
            .map(|i| {
                let x = f64::from(i);
                reading(0.013 * x, 0.2071, 1.0 / 3.0, 0.0049 * x)
            })
            .collect();
        let expected: f64 = readings.iter().map(|r| r.total_kwh).sum();

        let CategoryBreakdown::Totals(totals) = aggregate_categories(&readings) else {
            panic!("expected totals");
        };

        // four independent roundings to 2 places
        let summed = totals.kitchen + totals.laundry + totals.hvac + totals.other;
        assert!((summed - expected).abs() <= 4.0 * 0.005 + 1e-9);
    }

    #[test]
    fn slices_are_labelled_in_display_order() {
        let names: Vec<&str> = aggregate_categories(&[reading(1.0, 1.0, 1.0, 1.0)])
            .slices()
            .iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, ["Kitchen Appliances", "Laundry", "HVAC & Lighting", "Other"]);
    }
}
