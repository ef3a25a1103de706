// web_app/format.rs - Display helpers for prices and ratings

use rust_decimal::{Decimal, RoundingStrategy};

/// Stars drawn for a rating
pub const TOTAL_STARS: usize = 5;

/// en-US dollar amount: `$1,234.50`, `-$5.00`; a missing price is `$0.00`
pub fn format_currency(value: Option<Decimal>) -> String {
    let value = value.unwrap_or(Decimal::ZERO);
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(whole),
        cents
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fill fraction (0.0..=1.0) of each star for `rating`
pub fn star_fills(rating: f64) -> [f64; TOTAL_STARS] {
    let mut fills = [0.0; TOTAL_STARS];
    if !rating.is_finite() {
        return fills;
    }
    for (index, fill) in fills.iter_mut().enumerate() {
        *fill = (rating - index as f64).clamp(0.0, 1.0);
    }
    fills
}

/// Rating label with one decimal, e.g. `4.5`
pub fn rating_label(rating: f64) -> String {
    format!("{:.1}", (rating * 10.0).round() / 10.0)
}

/// At most `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Option<Decimal> {
        Some(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("1234.5")), "$1,234.50");
        assert_eq!(format_currency(dec("12")), "$12.00");
        assert_eq!(format_currency(dec("0.5")), "$0.50");
        assert_eq!(format_currency(dec("999")), "$999.00");
        assert_eq!(format_currency(dec("1000")), "$1,000.00");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
    }

    #[test]
    fn test_format_currency_negative_and_missing() {
        assert_eq!(format_currency(dec("-5")), "-$5.00");
        assert_eq!(format_currency(None), "$0.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec("2.345")), "$2.35");
        assert_eq!(format_currency(dec("-2.345")), "-$2.35");
        assert_eq!(format_currency(dec("2.344")), "$2.34");
    }

    #[test]
    fn test_star_fills() {
        assert_eq!(star_fills(5.0), [1.0; 5]);
        assert_eq!(star_fills(0.0), [0.0; 5]);
        assert_eq!(star_fills(3.5), [1.0, 1.0, 1.0, 0.5, 0.0]);
        assert_eq!(star_fills(7.0), [1.0; 5]);
        assert_eq!(star_fills(f64::NAN), [0.0; 5]);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(rating_label(4.0), "4.0");
        assert_eq!(rating_label(4.46), "4.5");
        assert_eq!(rating_label(3.333), "3.3");
    }

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("Taza", 10), "Taza");
        assert_eq!(preview("Cerámica pintada", 8), "Cerámica…");
        assert_eq!(preview("abcdef", 6), "abcdef");
    }
}
