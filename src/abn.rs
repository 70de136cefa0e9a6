//! Australian Business Number (ABN) checksum validation.
//!
//! An ABN is 11 digits. The checksum subtracts 1 from the first digit,
//! multiplies each digit by a fixed weight, and requires the weighted sum
//! to be divisible by 89.

const WEIGHTS: [u32; 11] = [10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19];

/// Strip everything but digits. Returns `None` when no digits remain,
/// so formatting characters ("51 824 753 556") are tolerated.
pub fn sanitize_abn(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// Validate an ABN by checksum. Accepts embedded whitespace and punctuation;
/// anything that does not reduce to exactly 11 digits is invalid.
pub fn is_valid_abn(value: &str) -> bool {
    let Some(digits) = sanitize_abn(value) else {
        return false;
    };
    if digits.len() != 11 {
        return false;
    }

    let sum: i64 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let mut digit = i64::from(b - b'0');
            if i == 0 {
                digit -= 1;
            }
            digit * i64::from(WEIGHTS[i])
        })
        .sum();

    sum % 89 == 0
}
