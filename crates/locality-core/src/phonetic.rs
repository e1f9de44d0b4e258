// crates/locality-core/src/phonetic.rs

//! Soundex-style phonetic codes.
//!
//! Codes are stored alongside every record and compared by equality against
//! the code of a live query, so the encoding must stay bit-for-bit stable:
//! changing it invalidates every persisted snapshot.

/// Length of every non-empty code.
pub const CODE_LEN: usize = 4;

/// Digit for characters outside every consonant class (vowels, `H`, `W`,
/// `Y`, punctuation, whitespace, non-ASCII).
const SEPARATOR: char = '0';

/// Consonant classes. First matching class wins.
const CLASSES: [(&str, char); 6] = [
    ("BFPV", '1'),
    ("CGJKQSXZ", '2'),
    ("DT", '3'),
    ("L", '4'),
    ("MN", '5'),
    ("R", '6'),
];

#[inline]
fn digit_for(c: char) -> char {
    CLASSES
        .iter()
        .find(|(members, _)| members.contains(c))
        .map_or(SEPARATOR, |&(_, digit)| digit)
}

/// Encodes `name` into its 4-character phonetic code.
///
/// The first character of the uppercased name is kept verbatim; every
/// following character maps to a class digit. A digit is emitted only when it
/// differs from the digit of the character right before it and is not `0`.
/// The result is padded with `0` and cut to [`CODE_LEN`] characters.
///
/// Empty input yields an empty code.
///
/// ```rust
/// use locality_core::phonetic::encode;
///
/// assert_eq!(encode("Robert"), "R163");
/// assert_eq!(encode("Rupert"), "R163");
/// assert_eq!(encode("Lee"), "L000");
/// assert_eq!(encode(""), "");
/// ```
pub fn encode(name: &str) -> String {
    let upper = name.to_uppercase();
    let mut chars = upper.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(CODE_LEN);
    code.push(first);

    // `previous` tracks the raw digit stream, zeros included, so a vowel
    // between two identical consonants lets the second one through.
    let mut previous = None;
    for c in chars {
        let digit = digit_for(c);
        if previous != Some(digit) && digit != SEPARATOR {
            code.push(digit);
            if code.chars().count() == CODE_LEN {
                break;
            }
        }
        previous = Some(digit);
    }

    while code.chars().count() < CODE_LEN {
        code.push(SEPARATOR);
    }
    code
}

/// Same as [`encode`] for an optional name; a missing name encodes to `""`.
#[inline]
pub fn encode_opt(name: Option<&str>) -> String {
    name.map(encode).unwrap_or_default()
}
