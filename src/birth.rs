// 🎂 Birth Record - validated input to every calculation
// Built once from user input, never mutated afterwards

use crate::config::ValidationConfig;
use crate::error::{NumerologyError, NumerologyResult};
use crate::name_chart;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = NumerologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(NumerologyError::UnknownGender(s.to_string())),
        }
    }
}

// ============================================================================
// BIRTH RECORD
// ============================================================================

/// Name, birth date and gender of one person.
///
/// Invariants (checked by the constructors):
/// - day/month/year form a real calendar date
/// - year lies in `[min_year, current year]`
/// - the name has at least one letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthRecord {
    name: String,
    birth_date: NaiveDate,
    gender: Gender,
}

impl BirthRecord {
    /// Validate against today's local date
    pub fn new(
        name: &str,
        day: u32,
        month: u32,
        year: i32,
        gender: Gender,
        validation: &ValidationConfig,
    ) -> NumerologyResult<Self> {
        Self::new_as_of(name, day, month, year, gender, validation, Local::now().date_naive())
    }

    /// Validate against an explicit "today"
    pub fn new_as_of(
        name: &str,
        day: u32,
        month: u32,
        year: i32,
        gender: Gender,
        validation: &ValidationConfig,
        today: NaiveDate,
    ) -> NumerologyResult<Self> {
        let birth_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(NumerologyError::InvalidDate { day, month, year })?;

        let max_year = today.year();
        if year < validation.min_year || year > max_year {
            return Err(NumerologyError::YearOutOfRange {
                year,
                min: validation.min_year,
                max: max_year,
            });
        }

        let name = name.trim();
        if !name_chart::has_letters(name) {
            return Err(NumerologyError::InvalidName(name.to_string()));
        }

        Ok(BirthRecord {
            name: name.to_string(),
            birth_date,
            gender,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn day(&self) -> u32 {
        self.birth_date.day()
    }

    pub fn month(&self) -> u32 {
        self.birth_date.month()
    }

    pub fn year(&self) -> i32 {
        self.birth_date.year()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// The digits of `DDMMYYYY`, zero padding included (e.g. 15-08-1990 -> 1,5,0,8,1,9,9,0)
    pub fn date_digits(&self) -> Vec<u8> {
        date_digits(self.day(), self.month(), self.year())
    }

    /// "15-8-1990", the way the date is shown to readers
    pub fn display_date(&self) -> String {
        format!("{}-{}-{}", self.day(), self.month(), self.year())
    }
}

/// Digits of the concatenated, zero-padded `DDMMYYYY` string
pub fn date_digits(day: u32, month: u32, year: i32) -> Vec<u8> {
    format!("{:02}{:02}{}", day, month, year)
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}
