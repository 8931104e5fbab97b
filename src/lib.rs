// Lo Shu Numerology - Core Library
// Exposes the engine for the CLI, the TUI, the API server and tests

pub mod reduction;
pub mod name_chart;
pub mod error;
pub mod config;
pub mod birth;
pub mod core_numbers;
pub mod grid;
pub mod planes;
pub mod chart;
pub mod report;     // Prompt + plain-text chart
pub mod narrative;  // Remote language-model readings

// Re-export commonly used types
pub use reduction::{digit_sum, reduce_to_digit};
pub use name_chart::{letter_value, name_number, name_sum};
pub use error::{NumerologyError, NumerologyResult};
pub use config::{
    AppConfig, CalculationConfig, GridConfig, NarrativeConfig, ServerConfig, ValidationConfig,
};
pub use birth::{date_digits, BirthRecord, Gender};
pub use core_numbers::{
    calculate, calculate_core_numbers, current_year_number, current_year_number_today,
    kua_number, personal_year_number, CalculationOptions, CoreNumbers, DigitMultiset,
};
pub use grid::{
    build_frequency_table, render_grid, FrequencyTable, GridCell, COLUMN_LABELS, LO_SHU_LAYOUT,
    ROW_LABELS,
};
pub use planes::{classify_planes, Plane, PlaneClassification, PlaneKind, PLANES};
pub use chart::NumerologyChart;
pub use report::{
    build_reading_prompt, missing_numbers_summary, present_numbers_summary, render_text_chart,
};
pub use narrative::{
    generate_reading, FakeNarrativeClient, HttpNarrativeClient, NarrativeClient, NarrativeError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
