// 🔤 Name Chart - Pythagorean letter values
// A,J,S=1  B,K,T=2  C,L,U=3  D,M,V=4  E,N,W=5  F,O,X=6  G,P,Y=7  H,Q,Z=8  I,R=9

use crate::reduction::reduce_to_digit;

/// Letter value table indexed by `letter - 'A'`
const LETTER_VALUES: [u8; 26] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, // A..I
    1, 2, 3, 4, 5, 6, 7, 8, 9, // J..R
    1, 2, 3, 4, 5, 6, 7, 8, // S..Z
];

/// Value of a single character; `None` for anything that is not an ASCII letter
pub fn letter_value(c: char) -> Option<u8> {
    if c.is_ascii_alphabetic() {
        let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
        Some(LETTER_VALUES[index])
    } else {
        None
    }
}

/// Raw (unreduced) letter total of a name; non-letters contribute 0
pub fn name_sum(name: &str) -> u64 {
    name.chars()
        .filter_map(letter_value)
        .map(u64::from)
        .sum()
}

/// True if the name has at least one letter that carries a value
pub fn has_letters(name: &str) -> bool {
    name.chars().any(|c| letter_value(c).is_some())
}

/// Name number: reduced letter total.
///
/// Returns 0 for a name without letters. `BirthRecord` rejects such names
/// before any chart is computed, so 0 never reaches a chart.
pub fn name_number(name: &str) -> u8 {
    reduce_to_digit(name_sum(name))
}
