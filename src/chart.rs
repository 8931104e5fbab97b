// 📜 Numerology Chart - everything computed for one person
// Record -> core numbers -> digit multiset -> frequencies -> planes
//
// Transient: recomputed from scratch for every request, nothing is stored.

use crate::birth::BirthRecord;
use crate::core_numbers::{self, CalculationOptions, CoreNumbers, DigitMultiset};
use crate::grid::{render_grid, FrequencyTable, GridCell};
use crate::planes::{classify_planes, PlaneClassification};
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumerologyChart {
    pub record: BirthRecord,
    pub core: CoreNumbers,
    pub multiset: DigitMultiset,
    pub frequencies: FrequencyTable,
    pub planes: PlaneClassification,
    /// Date the chart was computed for (drives the current-year number)
    pub computed_on: NaiveDate,
}

impl NumerologyChart {
    pub fn compute(record: BirthRecord, options: &CalculationOptions, today: NaiveDate) -> Self {
        let core = core_numbers::calculate(&record, options, today);
        let multiset = DigitMultiset::from_parts(&record.date_digits(), &core);
        let frequencies = FrequencyTable::from_multiset(&multiset);
        let planes = classify_planes(&frequencies);

        tracing::debug!(
            name = record.name(),
            missing = ?frequencies.missing(),
            complete_planes = planes.complete.len(),
            "chart computed"
        );

        NumerologyChart {
            record,
            core,
            multiset,
            frequencies,
            planes,
            computed_on: today,
        }
    }

    /// Compute as of today's local date
    pub fn compute_now(record: BirthRecord, options: &CalculationOptions) -> Self {
        Self::compute(record, options, Local::now().date_naive())
    }

    pub fn grid(&self, placeholder: &str) -> [[GridCell; 3]; 3] {
        render_grid(&self.frequencies, placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::Gender;
    use crate::config::ValidationConfig;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn chart(name: &str, day: u32, month: u32, year: i32, gender: Gender) -> NumerologyChart {
        let record = BirthRecord::new_as_of(
            name,
            day,
            month,
            year,
            gender,
            &ValidationConfig::default(),
            today(),
        )
        .unwrap();
        NumerologyChart::compute(record, &CalculationOptions::default(), today())
    }

    #[test]
    fn test_aseem_chart() {
        let chart = chart("Aseem", 15, 8, 1990, Gender::Male);

        assert_eq!(chart.core.psychic, 6);
        assert_eq!(chart.frequencies.count(1), 3);
        assert_eq!(chart.frequencies.missing(), vec![2, 3, 4]);
        assert_eq!(chart.planes.complete.len(), 2);
        assert_eq!(chart.planes.incomplete.len(), 6);
        assert_eq!(chart.computed_on, today());
        assert_eq!(chart.grid("—")[1][1].text, "5");
    }

    #[test]
    fn test_frequency_total_matches_multiset() {
        // 01-01-2000: date digits 0 1 0 1 2 0 0 0 -> nonzero 1 1 2
        let chart = chart("Anna", 1, 1, 2000, Gender::Female);
        assert_eq!(chart.multiset.len(), 3 + 4);
        assert_eq!(chart.frequencies.total() as usize, chart.multiset.len());
    }

    #[test]
    fn test_chart_serializes_for_api() {
        let chart = chart("Aseem", 15, 8, 1990, Gender::Male);
        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["record"]["name"], "Aseem");
        assert_eq!(json["record"]["birth_date"], "1990-08-15");
        assert_eq!(json["record"]["gender"], "Male");
        assert_eq!(json["core"]["kua"], 1);
        assert_eq!(json["frequencies"]["9"], 2);
        assert_eq!(json["planes"]["complete"][0]["name"], "Practical Plane");
        assert_eq!(json["multiset"].as_array().unwrap().len(), 10);
    }
}
