//! Australian Business Number (ABN) check digits.
//!
//! See <https://abr.business.gov.au/Help/AbnFormat>.

const ABN_WEIGHTS: [u32; 11] = [10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19];

/// Check whether `abn` is an 11-digit ABN with valid check digits.
///
/// Subtract 1 from the first digit, weight each digit, and the sum
/// must be a multiple of 89. A leading `0` is never valid.
pub fn is_valid_abn(abn: &str) -> bool {
    let bytes = abn.as_bytes();
    if bytes.len() != ABN_WEIGHTS.len() || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes[0] == b'0' {
        return false;
    }

    let sum: u32 = bytes
        .iter()
        .zip(ABN_WEIGHTS)
        .enumerate()
        .map(|(i, (&b, weight))| {
            let digit = u32::from(b - b'0');
            let digit = if i == 0 { digit - 1 } else { digit };
            digit * weight
        })
        .sum();

    sum % 89 == 0
}
