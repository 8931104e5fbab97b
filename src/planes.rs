// ▦ Planes - the 8 lines of the Lo Shu square
// A plane is complete when all three of its digits occur in the chart

use crate::grid::FrequencyTable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlaneKind {
    Row,
    Column,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Plane {
    pub name: &'static str,
    pub digits: [u8; 3],
    pub kind: PlaneKind,
}

impl Plane {
    const fn new(name: &'static str, digits: [u8; 3], kind: PlaneKind) -> Self {
        Plane { name, digits, kind }
    }

    /// All three digits have a nonzero count
    pub fn is_complete(&self, table: &FrequencyTable) -> bool {
        self.digits.iter().all(|&d| table.contains(d))
    }

    /// "Mental Plane (4-9-2)"
    pub fn label(&self) -> String {
        format!(
            "{} ({}-{}-{})",
            self.name, self.digits[0], self.digits[1], self.digits[2]
        )
    }
}

/// Rows, then columns, then diagonals of `LO_SHU_LAYOUT`
pub const PLANES: [Plane; 8] = [
    Plane::new("Mental Plane", [4, 9, 2], PlaneKind::Row),
    Plane::new("Emotional Plane", [3, 5, 7], PlaneKind::Row),
    Plane::new("Practical Plane", [8, 1, 6], PlaneKind::Row),
    Plane::new("Thought Plane", [4, 3, 8], PlaneKind::Column),
    Plane::new("Will Plane", [9, 5, 1], PlaneKind::Column),
    Plane::new("Action Plane", [2, 7, 6], PlaneKind::Column),
    Plane::new("Determination Plane", [4, 5, 6], PlaneKind::Diagonal),
    Plane::new("Compassion Plane", [2, 5, 8], PlaneKind::Diagonal),
];

/// Complete and incomplete planes, each in `PLANES` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaneClassification {
    pub complete: Vec<Plane>,
    pub incomplete: Vec<Plane>,
}

impl PlaneClassification {
    pub fn complete_labels(&self) -> Vec<String> {
        self.complete.iter().map(Plane::label).collect()
    }

    pub fn incomplete_labels(&self) -> Vec<String> {
        self.incomplete.iter().map(Plane::label).collect()
    }

    pub fn is_complete(&self, name: &str) -> bool {
        self.complete.iter().any(|p| p.name == name)
    }
}

pub fn classify_planes(table: &FrequencyTable) -> PlaneClassification {
    let (complete, incomplete): (Vec<Plane>, Vec<Plane>) =
        PLANES.iter().partition(|plane| plane.is_complete(table));
    PlaneClassification { complete, incomplete }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LO_SHU_LAYOUT;

    fn names(planes: &[Plane]) -> Vec<&'static str> {
        planes.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_planes_match_layout_lines() {
        for (i, row) in LO_SHU_LAYOUT.iter().enumerate() {
            assert_eq!(PLANES[i].digits, *row);
            assert_eq!(PLANES[i].kind, PlaneKind::Row);
        }
        for col in 0..3 {
            let column = [LO_SHU_LAYOUT[0][col], LO_SHU_LAYOUT[1][col], LO_SHU_LAYOUT[2][col]];
            assert_eq!(PLANES[3 + col].digits, column);
            assert_eq!(PLANES[3 + col].kind, PlaneKind::Column);
        }
        assert_eq!(PLANES[6].digits, [LO_SHU_LAYOUT[0][0], LO_SHU_LAYOUT[1][1], LO_SHU_LAYOUT[2][2]]);
        assert_eq!(PLANES[7].digits, [LO_SHU_LAYOUT[0][2], LO_SHU_LAYOUT[1][1], LO_SHU_LAYOUT[2][0]]);
    }

    #[test]
    fn test_full_table_completes_every_plane() {
        let table = FrequencyTable::from_digits(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let result = classify_planes(&table);
        assert_eq!(result.complete, PLANES.to_vec());
        assert!(result.incomplete.is_empty());
    }

    #[test]
    fn test_empty_table_completes_nothing() {
        let result = classify_planes(&FrequencyTable::default());
        assert!(result.complete.is_empty());
        assert_eq!(result.incomplete, PLANES.to_vec());
    }

    #[test]
    fn test_aseem_chart_planes() {
        // 1(3) 5 6(2) 7 8 9(2); missing 2, 3, 4
        let table = FrequencyTable::from_digits(&[1, 5, 8, 1, 9, 9, 6, 6, 1, 7]);
        let result = classify_planes(&table);

        assert_eq!(names(&result.complete), vec!["Practical Plane", "Will Plane"]);
        assert_eq!(
            names(&result.incomplete),
            vec![
                "Mental Plane",
                "Emotional Plane",
                "Thought Plane",
                "Action Plane",
                "Determination Plane",
                "Compassion Plane",
            ]
        );
        assert!(result.is_complete("Will Plane"));
        assert!(!result.is_complete("Mental Plane"));
        assert_eq!(
            result.complete_labels(),
            vec!["Practical Plane (8-1-6)", "Will Plane (9-5-1)"]
        );
    }

    #[test]
    fn test_repeats_do_not_matter() {
        let once = FrequencyTable::from_digits(&[4, 9, 2]);
        let many = FrequencyTable::from_digits(&[4, 4, 4, 9, 2, 2]);
        assert_eq!(classify_planes(&once), classify_planes(&many));
        assert_eq!(names(&classify_planes(&once).complete), vec!["Mental Plane"]);
    }

    #[test]
    fn test_classification_is_monotonic() {
        // Every subset of digits: adding a missing digit never un-completes a plane
        for mask in 0u32..512 {
            let mut counts = [0u32; 9];
            for (i, count) in counts.iter_mut().enumerate() {
                if mask & (1 << i) != 0 {
                    *count = 1;
                }
            }
            let before = classify_planes(&FrequencyTable::from_counts(counts));

            for i in 0..9 {
                if counts[i] > 0 {
                    continue;
                }
                let mut raised = counts;
                raised[i] = 2;
                let after = classify_planes(&FrequencyTable::from_counts(raised));
                for plane in &before.complete {
                    assert!(after.complete.contains(plane), "mask {:b} digit {}", mask, i + 1);
                }
                assert_eq!(after.complete.len() + after.incomplete.len(), 8);
            }
        }
    }
}
