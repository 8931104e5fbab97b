// 🧮 Core Numbers - Psychic, Destiny, Kua, Name (+ current year)
//
// 1. DDMMYYYY digits          15-08-1990 -> 1 5 0 8 1 9 9 0
// 2. Psychic = reduce(day)    Destiny = reduce(sum of date digits)
//    Year sum = reduce(year)
// 3. Kua from year sum + gender
// 4. Name number from the letter chart
// 5. Grid multiset = nonzero date digits ++ [psychic, destiny, kua, name]

use crate::birth::{date_digits, BirthRecord, Gender};
use crate::config::{CalculationConfig, ValidationConfig};
use crate::error::NumerologyResult;
use crate::name_chart;
use crate::reduction::{digit_sum, reduce_to_digit};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Remap a Kua of 5 to 2 (male) / 8 (female). Older revisions always did this.
    pub apply_kua5_legacy_remap: bool,

    /// Fill `CoreNumbers::current_year_number`
    pub include_current_year_number: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        CalculationOptions {
            apply_kua5_legacy_remap: false,
            include_current_year_number: true,
        }
    }
}

impl From<&CalculationConfig> for CalculationOptions {
    fn from(config: &CalculationConfig) -> Self {
        CalculationOptions {
            apply_kua5_legacy_remap: config.apply_kua5_legacy_remap,
            include_current_year_number: config.include_current_year_number,
        }
    }
}

// ============================================================================
// CORE NUMBERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreNumbers {
    /// Birth day reduced
    pub psychic: u8,
    /// Every digit of the birth date, summed and reduced
    pub destiny: u8,
    /// Birth year reduced (intermediate for Kua)
    pub year_sum: u8,
    pub kua: u8,
    pub name_number: u8,
    /// Personal year number for the calendar year the chart was computed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_year_number: Option<u8>,
}

/// Kua number from the reduced birth year.
///
/// Male: 11 - year_sum (10 counts as 1). Female: 4 + year_sum, reduced.
pub fn kua_number(year_sum: u8, gender: Gender, apply_kua5_legacy_remap: bool) -> u8 {
    let kua = match gender {
        Gender::Male => {
            let raw = 11u64.saturating_sub(u64::from(year_sum));
            if raw == 10 {
                1
            } else {
                reduce_to_digit(raw)
            }
        }
        Gender::Female => reduce_to_digit(4 + u64::from(year_sum)),
    };

    match (apply_kua5_legacy_remap, kua, gender) {
        (true, 5, Gender::Male) => 2,
        (true, 5, Gender::Female) => 8,
        _ => kua,
    }
}

/// Personal year number: `DD MM <year>` digits summed and reduced, like Destiny
pub fn personal_year_number(day: u32, month: u32, year: i32) -> u8 {
    let sum: u64 = date_digits(day, month, year).iter().map(|&d| u64::from(d)).sum();
    reduce_to_digit(sum)
}

/// Personal year number for the calendar year of `today`
pub fn current_year_number(day: u32, month: u32, today: NaiveDate) -> u8 {
    personal_year_number(day, month, today.year())
}

/// Personal year number for the current local year. Time dependent: never cache.
pub fn current_year_number_today(day: u32, month: u32) -> u8 {
    current_year_number(day, month, Local::now().date_naive())
}

/// Compute every core number of a validated record as of `today`
pub fn calculate(record: &BirthRecord, options: &CalculationOptions, today: NaiveDate) -> CoreNumbers {
    let digits = record.date_digits();

    let psychic = reduce_to_digit(u64::from(record.day()));
    let destiny = reduce_to_digit(digits.iter().map(|&d| u64::from(d)).sum());
    let year_sum = reduce_to_digit(digit_sum(record.year().unsigned_abs().into()));
    let kua = kua_number(year_sum, record.gender(), options.apply_kua5_legacy_remap);
    let name_number = name_chart::name_number(record.name());

    let current_year_number = options
        .include_current_year_number
        .then(|| current_year_number(record.day(), record.month(), today));

    tracing::debug!(
        name = record.name(),
        date = %record.birth_date(),
        psychic,
        destiny,
        year_sum,
        kua,
        name_number,
        "core numbers calculated"
    );

    CoreNumbers {
        psychic,
        destiny,
        year_sum,
        kua,
        name_number,
        current_year_number,
    }
}

/// Entry point for raw input: validate, then calculate as of today
pub fn calculate_core_numbers(
    name: &str,
    day: u32,
    month: u32,
    year: i32,
    gender: Gender,
    options: &CalculationOptions,
) -> NumerologyResult<CoreNumbers> {
    let record = BirthRecord::new(name, day, month, year, gender, &ValidationConfig::default())?;
    Ok(calculate(&record, options, Local::now().date_naive()))
}

// ============================================================================
// DIGIT MULTISET
// ============================================================================

/// Ordered digits (1-9 only) feeding the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitMultiset(Vec<u8>);

impl DigitMultiset {
    /// Nonzero date digits followed by psychic, destiny, kua and name number.
    /// Zeros (date padding, or a degenerate 0 number) are dropped.
    pub fn from_parts(date_digits: &[u8], core: &CoreNumbers) -> Self {
        let digits = date_digits
            .iter()
            .copied()
            .chain([core.psychic, core.destiny, core.kua, core.name_number])
            .filter(|d| (1..=9).contains(d))
            .collect();
        DigitMultiset(digits)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
