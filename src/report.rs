// 📝 Report - plain-text chart and the reading prompt
// Pure string formatting over a computed chart

use crate::chart::NumerologyChart;
use crate::grid::{FrequencyTable, COLUMN_LABELS, ROW_LABELS};
use std::fmt::Write;

/// System prompt sent with every reading request
pub const READING_SYSTEM_PROMPT: &str =
    "You are an expert numerologist specializing in the Lo Shu Grid system.";

/// "1 (appears 3 times), 5 (appears 1 time)"; empty when nothing is present
pub fn present_numbers_summary(table: &FrequencyTable) -> String {
    table
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(digit, count)| {
            format!(
                "{} (appears {} time{})",
                digit,
                count,
                if count > 1 { "s" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// "2, 3, 4"; empty when every digit is present
pub fn missing_numbers_summary(table: &FrequencyTable) -> String {
    table
        .missing()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_none(text: &str) -> &str {
    if text.is_empty() {
        "None"
    } else {
        text
    }
}

/// Full prompt for the narrative reading
pub fn build_reading_prompt(chart: &NumerologyChart) -> String {
    let record = &chart.record;
    let core = &chart.core;
    let name = record.name();

    let present = present_numbers_summary(&chart.frequencies);
    let missing = missing_numbers_summary(&chart.frequencies);
    let complete = chart.planes.complete_labels().join(", ");
    let incomplete = chart.planes.incomplete_labels().join(", ");

    let mut prompt = String::new();

    // write! into a String cannot fail
    let _ = write!(
        prompt,
        "Provide a detailed, insightful, and positive analysis for a person with the following details.\n\
         Structure the response with clear headings (using ## for main headings and ### for sub-headings) and paragraphs.\n\
         Do not use markdown for bolding, use plain text.\n\
         \n\
         Person's Data:\n\
         - First Name: {name}\n\
         - Date of Birth: {date}\n\
         - Gender: {gender}\n\
         - Psychic Number (Birth Number): {psychic}\n\
         - Destiny Number (Life Path Number): {destiny}\n\
         - Name Number (Expression Number): {name_number}\n\
         - Kua Number: {kua}\n",
        name = name,
        date = record.display_date(),
        gender = record.gender(),
        psychic = core.psychic,
        destiny = core.destiny,
        name_number = core.name_number,
        kua = core.kua,
    );

    if let Some(year_number) = core.current_year_number {
        let _ = writeln!(prompt, "- Personal Year Number (current year): {}", year_number);
    }

    let _ = write!(
        prompt,
        "- Numbers in their chart: {present}\n\
         - Missing Numbers: {missing}\n\
         - Completed Planes: {complete}\n\
         - Incomplete Planes: {incomplete}\n\
         \n\
         Analysis Request:\n\
         Please provide a comprehensive reading covering the following aspects:\n\
         \n\
         ## Core Personality Analysis\n\
         ### Psychic Number ({psychic})\n\
         Explain what the Psychic number reveals about their inner self, desires, and basic character.\n\
         ### Destiny Number ({destiny})\n\
         Explain what the Destiny number reveals about their life's purpose, path, and the lessons they are here to learn.\n\
         ### Name Number ({name_number})\n\
         Explain what the Name Number (derived from '{name}') reveals about their talents, abilities, and potential in the world. This is their mode of expression.\n\
         ### Kua Number ({kua})\n\
         Briefly explain what the Kua number suggests about their personal energy and compatibility with directions.\n\
         \n\
         ## The Lo Shu Grid Breakdown\n\
         ### Strengths (Based on Present Numbers)\n\
         Analyze the meaning of the numbers present in their grid ({present}). What strengths and talents do these numbers indicate?\n\
         ### Challenges (Based on Missing Numbers)\n\
         Analyze the meaning of the numbers missing from their grid ({missing}). What challenges or areas for growth do these absences suggest?\n\
         \n\
         ## Analysis of Planes\n\
         ### Completed Planes Analysis\n\
         If there are completed planes ({complete}), explain the powerful characteristics and abilities these bestow upon the individual.\n\
         ### Guidance for Missing Planes\n\
         For the incomplete planes ({incomplete}), offer constructive advice on how the person can compensate for the energies of missing planes in their life.\n",
        present = or_none(&present),
        missing = or_none(&missing),
        complete = or_none(&complete),
        incomplete = or_none(&incomplete),
        psychic = core.psychic,
        destiny = core.destiny,
        name_number = core.name_number,
        kua = core.kua,
        name = name,
    );

    if let Some(year_number) = core.current_year_number {
        let _ = write!(
            prompt,
            "\n## The Year Ahead\n\
             ### Personal Year Number ({})\n\
             Describe the themes and opportunities this personal year number brings for the current year.\n",
            year_number
        );
    }

    let _ = write!(
        prompt,
        "\n## Summary and Overall Guidance\n\
         Provide a concluding summary that synthesizes the key points of the reading. \
         Offer one or two key pieces of actionable advice for {} to lead a more fulfilling life \
         based on their unique numerological chart.\n",
        name
    );

    prompt
}

/// Plain-text chart: core numbers, the 3x3 grid and the planes
pub fn render_text_chart(chart: &NumerologyChart, placeholder: &str) -> String {
    let core = &chart.core;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} - born {} ({})",
        chart.record.name(),
        chart.record.display_date(),
        chart.record.gender()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Psychic Number  {}", core.psychic);
    let _ = writeln!(out, "Destiny Number  {}", core.destiny);
    let _ = writeln!(out, "Name Number     {}", core.name_number);
    let _ = writeln!(out, "Kua Number      {}", core.kua);
    if let Some(year_number) = core.current_year_number {
        let _ = writeln!(out, "Year Number     {}  ({})", year_number, chart.computed_on.format("%Y"));
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<17}{:^8}{:^8}{:^8}",
        "", COLUMN_LABELS[0], COLUMN_LABELS[1], COLUMN_LABELS[2]
    );
    for (label, row) in ROW_LABELS.iter().zip(chart.grid(placeholder).iter()) {
        let _ = writeln!(
            out,
            "{:<17}{:^8}{:^8}{:^8}",
            label, row[0].text, row[1].text, row[2].text
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Completed Planes");
    if chart.planes.complete.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for label in chart.planes.complete_labels() {
        let _ = writeln!(out, "  ✓ {}", label);
    }

    let _ = writeln!(out, "Incomplete Planes");
    if chart.planes.incomplete.is_empty() {
        let _ = writeln!(out, "  none - every plane is complete");
    }
    for label in chart.planes.incomplete_labels() {
        let _ = writeln!(out, "  ✗ {}", label);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::{BirthRecord, Gender};
    use crate::config::ValidationConfig;
    use crate::core_numbers::CalculationOptions;
    use chrono::NaiveDate;

    fn aseem() -> NumerologyChart {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let record = BirthRecord::new_as_of(
            "Aseem",
            15,
            8,
            1990,
            Gender::Male,
            &ValidationConfig::default(),
            today,
        )
        .unwrap();
        NumerologyChart::compute(record, &CalculationOptions::default(), today)
    }

    #[test]
    fn test_present_numbers_summary() {
        let table = FrequencyTable::from_digits(&[1, 1, 5]);
        assert_eq!(
            present_numbers_summary(&table),
            "1 (appears 2 times), 5 (appears 1 time)"
        );
        assert_eq!(present_numbers_summary(&FrequencyTable::default()), "");
    }

    #[test]
    fn test_missing_numbers_summary() {
        let table = FrequencyTable::from_digits(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(missing_numbers_summary(&table), "8, 9");
        let full = FrequencyTable::from_digits(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(missing_numbers_summary(&full), "");
    }

    #[test]
    fn test_prompt_contains_chart_values() {
        let prompt = build_reading_prompt(&aseem());

        assert!(prompt.contains("- First Name: Aseem"));
        assert!(prompt.contains("- Date of Birth: 15-8-1990"));
        assert!(prompt.contains("- Gender: Male"));
        assert!(prompt.contains("- Psychic Number (Birth Number): 6"));
        assert!(prompt.contains("- Kua Number: 1"));
        assert!(prompt.contains("- Personal Year Number (current year): 6"));
        assert!(prompt.contains("- Missing Numbers: 2, 3, 4"));
        assert!(prompt.contains("1 (appears 3 times)"));
        assert!(prompt.contains("- Completed Planes: Practical Plane (8-1-6), Will Plane (9-5-1)"));
        assert!(prompt.contains("### Name Number (7)"));
        assert!(prompt.contains("derived from 'Aseem'"));
        assert!(prompt.contains("## The Year Ahead"));
        assert!(prompt.trim_end().ends_with("based on their unique numerological chart."));
    }

    #[test]
    fn test_prompt_without_year_number() {
        let mut chart = aseem();
        chart.core.current_year_number = None;
        let prompt = build_reading_prompt(&chart);
        assert!(!prompt.contains("Personal Year Number"));
        assert!(!prompt.contains("## The Year Ahead"));
    }

    #[test]
    fn test_text_chart_layout() {
        let text = render_text_chart(&aseem(), "-");

        assert!(text.starts_with("Aseem - born 15-8-1990 (Male)"));
        assert!(text.contains("Kua Number      1"));
        assert!(text.contains("Year Number     6  (2026)"));
        let mental = text.lines().find(|l| l.starts_with("Mental Plane")).unwrap();
        assert_eq!(mental.split_whitespace().collect::<Vec<_>>(), vec!["Mental", "Plane", "-", "9(2)", "-"]);
        assert!(text.contains("✓ Will Plane (9-5-1)"));
        assert!(text.contains("✗ Mental Plane (4-9-2)"));
    }
}
