// ⚠️ Domain Errors
// Everything that can stop a chart from being computed

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumerologyError {
    /// Day/month/year do not name a real calendar day (e.g. 31/04, 29/02 in a common year)
    #[error("invalid date: {day:02}-{month:02}-{year} is not a real calendar date")]
    InvalidDate { day: u32, month: u32, year: i32 },

    #[error("year {year} is outside the accepted range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    /// Name contains no letter of the chart, so it has no name number
    #[error("invalid name {0:?}: at least one letter A-Z is required")]
    InvalidName(String),

    #[error("unknown gender {0:?} (expected male or female)")]
    UnknownGender(String),
}

impl NumerologyError {
    /// Short machine-readable code, used by the JSON API
    pub fn code(&self) -> &'static str {
        match self {
            NumerologyError::InvalidDate { .. } => "invalid_date",
            NumerologyError::YearOutOfRange { .. } => "year_out_of_range",
            NumerologyError::InvalidName(_) => "invalid_name",
            NumerologyError::UnknownGender(_) => "unknown_gender",
        }
    }
}

pub type NumerologyResult<T> = Result<T, NumerologyError>;
