// ⊞ Lo Shu Grid - digit frequencies + fixed 3x3 layout
//
//        Thought  Will  Action
// Mental      4     9     2
// Emotional   3     5     7
// Practical   8     1     6

use crate::core_numbers::{CoreNumbers, DigitMultiset};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lo Shu magic square: every row, column and diagonal sums to 15
pub const LO_SHU_LAYOUT: [[u8; 3]; 3] = [[4, 9, 2], [3, 5, 7], [8, 1, 6]];

pub const ROW_LABELS: [&str; 3] = ["Mental Plane", "Emotional Plane", "Practical Plane"];
pub const COLUMN_LABELS: [&str; 3] = ["Thought", "Will", "Action"];

// ============================================================================
// FREQUENCY TABLE
// ============================================================================

/// Occurrence count of every digit 1-9. All nine digits are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FrequencyTable {
    counts: [u32; 9],
}

impl FrequencyTable {
    /// Count a sequence of digits; anything outside 1-9 is ignored
    pub fn from_digits(digits: &[u8]) -> Self {
        let mut counts = [0u32; 9];
        for &d in digits {
            if (1..=9).contains(&d) {
                counts[(d - 1) as usize] += 1;
            }
        }
        FrequencyTable { counts }
    }

    pub fn from_multiset(multiset: &DigitMultiset) -> Self {
        Self::from_digits(multiset.as_slice())
    }

    /// Build directly from nine counts (index 0 is digit 1)
    pub fn from_counts(counts: [u32; 9]) -> Self {
        FrequencyTable { counts }
    }

    /// Count for `digit`; 0 for anything outside 1-9
    pub fn count(&self, digit: u8) -> u32 {
        match digit {
            1..=9 => self.counts[(digit - 1) as usize],
            _ => 0,
        }
    }

    pub fn contains(&self, digit: u8) -> bool {
        self.count(digit) > 0
    }

    /// (digit, count) for 1..=9, in digit order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=9u8).map(move |d| (d, self.count(d)))
    }

    /// Digits that occur at least once, ascending
    pub fn present(&self) -> Vec<u8> {
        self.iter().filter(|&(_, c)| c > 0).map(|(d, _)| d).collect()
    }

    /// Digits that never occur, ascending
    pub fn missing(&self) -> Vec<u8> {
        self.iter().filter(|&(_, c)| c == 0).map(|(d, _)| d).collect()
    }

    /// Total number of digits counted
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(9))?;
        for (digit, count) in self.iter() {
            map.serialize_entry(&digit.to_string(), &count)?;
        }
        map.end()
    }
}

/// Frequency table of a chart: nonzero date digits plus the four derived numbers
pub fn build_frequency_table(core: &CoreNumbers, date_digits: &[u8]) -> FrequencyTable {
    FrequencyTable::from_multiset(&DigitMultiset::from_parts(date_digits, core))
}

// ============================================================================
// RENDERING
// ============================================================================

/// One cell of the rendered 3x3 grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub digit: u8,
    pub count: u32,
    pub text: String,
}

impl GridCell {
    fn new(digit: u8, count: u32, placeholder: &str) -> Self {
        let text = match count {
            0 => placeholder.to_string(),
            1 => digit.to_string(),
            n => format!("{}({})", digit, n),
        };
        GridCell { digit, count, text }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lay the counts out on the Lo Shu square; absent digits show `placeholder`
pub fn render_grid(table: &FrequencyTable, placeholder: &str) -> [[GridCell; 3]; 3] {
    LO_SHU_LAYOUT.map(|row| row.map(|digit| GridCell::new(digit, table.count(digit), placeholder)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_magic_square() {
        for row in LO_SHU_LAYOUT {
            assert_eq!(row.iter().map(|&d| d as u32).sum::<u32>(), 15);
        }
        for col in 0..3 {
            assert_eq!((0..3).map(|r| LO_SHU_LAYOUT[r][col] as u32).sum::<u32>(), 15);
        }
        let mut seen: Vec<u8> = LO_SHU_LAYOUT.iter().flatten().copied().collect();
        seen.sort();
        assert_eq!(seen, (1..=9).collect::<Vec<u8>>());
    }

    #[test]
    fn test_empty_input_has_nine_zero_counts() {
        let table = FrequencyTable::from_digits(&[]);
        assert_eq!(table.iter().count(), 9);
        assert!(table.iter().all(|(_, c)| c == 0));
        assert_eq!(table.missing(), (1..=9).collect::<Vec<u8>>());
        assert!(table.present().is_empty());
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_counts_and_out_of_range_digits() {
        let table = FrequencyTable::from_digits(&[1, 5, 8, 1, 9, 9, 6, 6, 1, 7, 0, 12]);
        assert_eq!(table.count(1), 3);
        assert_eq!(table.count(9), 2);
        assert_eq!(table.count(2), 0);
        assert_eq!(table.count(0), 0);
        assert_eq!(table.count(10), 0);
        assert_eq!(table.total(), 10);
        assert_eq!(table.present(), vec![1, 5, 6, 7, 8, 9]);
        assert_eq!(table.missing(), vec![2, 3, 4]);
    }

    #[test]
    fn test_build_frequency_table_aseem() {
        let core = CoreNumbers {
            psychic: 6,
            destiny: 6,
            year_sum: 1,
            kua: 1,
            name_number: 7,
            current_year_number: Some(6),
        };
        let table = build_frequency_table(&core, &[1, 5, 0, 8, 1, 9, 9, 0]);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![
            (1, 3), (2, 0), (3, 0), (4, 0), (5, 1), (6, 2), (7, 1), (8, 1), (9, 2),
        ]);
    }

    #[test]
    fn test_serializes_all_nine_keys() {
        let table = FrequencyTable::from_digits(&[5, 5]);
        let json = serde_json::to_value(table).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 9);
        assert_eq!(json["5"], 2);
        assert_eq!(json["1"], 0);
    }

    #[test]
    fn test_render_grid_cells() {
        let table = FrequencyTable::from_digits(&[4, 9, 9, 5, 5, 5]);
        let grid = render_grid(&table, "—");

        let texts: Vec<Vec<String>> = grid
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        assert_eq!(texts, vec![
            vec!["4", "9(2)", "—"],
            vec!["—", "5(3)", "—"],
            vec!["—", "—", "—"],
        ]);
        assert_eq!(grid[0][1].count, 2);
        assert_eq!(grid[2][1].digit, 1);
    }

    #[test]
    fn test_render_grid_custom_placeholder() {
        let grid = render_grid(&FrequencyTable::default(), ".");
        assert!(grid.iter().flatten().all(|c| c.text == "."));
    }
}
