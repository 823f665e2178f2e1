//! Sex decoding from the Italian tax code.
//!
//! Characters 10 and 11 of a codice fiscale hold the day of birth; for women
//! the day is increased by 40.

use crate::models::Sex;

/// Minimum length needed to read the day-of-birth field.
const MIN_CODE_LENGTH: usize = 11;

/// Decodes the sex encoded in a tax code.
///
/// Returns [`Sex::Undetermined`] when the code is absent, shorter than
/// eleven characters, or when characters 10–11 are not two digits.
///
/// # Example
///
/// ```
/// use inps_contributions::calculation::decode_sex;
/// use inps_contributions::models::Sex;
///
/// assert_eq!(decode_sex(Some("RSSMRA80A01H501U")), Sex::Male);
/// assert_eq!(decode_sex(Some("RSSMRA80A41H501U")), Sex::Female);
/// assert_eq!(decode_sex(None), Sex::Undetermined);
/// ```
pub fn decode_sex(tax_code: Option<&str>) -> Sex {
    let Some(code) = tax_code else {
        return Sex::Undetermined;
    };

    let chars: Vec<char> = code.chars().collect();
    if chars.len() < MIN_CODE_LENGTH {
        return Sex::Undetermined;
    }

    let field = &chars[9..11];
    if !field.iter().all(|c| c.is_ascii_digit()) {
        return Sex::Undetermined;
    }

    let day: u32 = field.iter().filter_map(|c| c.to_digit(10)).fold(0, |acc, d| acc * 10 + d);
    if day > 40 { Sex::Female } else { Sex::Male }
}
