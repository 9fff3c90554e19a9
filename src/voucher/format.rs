//! Keystroke formatters and date conversions.
//!
//! Formatters never reject input. They reshape whatever was typed towards the
//! shape the validators expect and are applied before every field validation.

use chrono::Local;

const DATE_DIGITS: usize = 6;
const AIRLINE_LETTERS: usize = 3;
const FLIGHT_DIGITS: usize = 4;

/// Reshape raw date input into a partial `DD-MM-YY`.
///
/// Non-digits are dropped, the digits are capped at six and dashes are added
/// once the month or year group has started, e.g. `"0907"` becomes `"09-07"`.
pub fn format_date(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(DATE_DIGITS)
        .collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}-{}", &digits[..2], &digits[2..]),
        _ => format!("{}-{}-{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

/// Reshape raw flight number input into `<letters><digits>`.
///
/// Letters and digits are collected separately wherever they appear, so
/// `"g1a102"` becomes `"GA1102"`. At most three letters and four digits are kept.
pub fn format_flight_number(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();

    let letters = cleaned
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .take(AIRLINE_LETTERS);
    let digits = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(FLIGHT_DIGITS);

    letters.chain(digits).collect()
}

/// Convert a display date (`DD-MM-YY`, single-digit groups allowed) into the
/// canonical `YYYY-MM-DD` used on the wire.
pub fn to_canonical_date(display: &str) -> Option<String> {
    let mut parts = display.split('-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(format!("20{}-{:0>2}-{:0>2}", year, month, day))
}

/// Today's date in `DD-MM-YY`.
pub fn current_display_date() -> String {
    Local::now().format("%d-%m-%y").to_string()
}
