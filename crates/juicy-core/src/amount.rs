//! 18-decimal fixed-point token amounts.
//!
//! Balances are plain `u128` counts of base units; one token is [`WAD`] base
//! units. Parsing and formatting convert between base units and decimal token
//! strings without touching floating point.

use crate::constants::{DECIMALS, WAD};
use crate::error::AmountError;

/// Token amount in base units.
pub type Amount = u128;

/// Whole tokens to base units. Saturates at `u128::MAX`.
///
/// # Examples
///
/// ```
/// use juicy_core::amount::tokens;
/// assert_eq!(tokens(2), 2_000_000_000_000_000_000);
/// ```
pub const fn tokens(whole: u128) -> Amount {
    whole.saturating_mul(WAD)
}

/// Render base units as a decimal token string, trimming trailing zeros.
///
/// # Examples
///
/// ```
/// use juicy_core::amount::{format_amount, tokens};
/// assert_eq!(format_amount(tokens(1_500)), "1500");
/// assert_eq!(format_amount(tokens(3) / 2), "1.5");
/// assert_eq!(format_amount(1), "0.000000000000000001");
/// ```
pub fn format_amount(amount: Amount) -> String {
    let whole = amount / WAD;
    let frac = amount % WAD;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}", width = DECIMALS as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parse a decimal token string (e.g. `"1000"`, `"0.25"`) into base units.
pub fn parse_amount(s: &str) -> Result<Amount, AmountError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    let (whole_str, frac_str) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(AmountError::Empty);
    }
    if frac_str.len() > DECIMALS as usize {
        return Err(AmountError::TooPrecise(frac_str.len()));
    }

    let whole = parse_digits(whole_str)?;
    let mut frac = parse_digits(frac_str)?;
    for _ in frac_str.len()..DECIMALS as usize {
        frac *= 10;
    }

    whole
        .checked_mul(WAD)
        .and_then(|w| w.checked_add(frac))
        .ok_or(AmountError::Overflow)
}

fn parse_digits(s: &str) -> Result<u128, AmountError> {
    let mut value: u128 = 0;
    for c in s.chars() {
        let d = c.to_digit(10).ok_or(AmountError::InvalidCharacter(c))?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as u128))
            .ok_or(AmountError::Overflow)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_scales_by_wad() {
        assert_eq!(tokens(0), 0);
        assert_eq!(tokens(1), WAD);
        assert_eq!(tokens(u128::MAX), u128::MAX);
    }

    #[test]
    fn format_whole_and_fractional() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(tokens(1_000_000)), "1000000");
        assert_eq!(format_amount(WAD + WAD / 4), "1.25");
    }

    #[test]
    fn parse_whole() {
        assert_eq!(parse_amount("1000").unwrap(), tokens(1000));
        assert_eq!(parse_amount(" 7 ").unwrap(), tokens(7));
    }

    #[test]
    fn parse_fractional() {
        assert_eq!(parse_amount("0.5").unwrap(), WAD / 2);
        assert_eq!(parse_amount(".5").unwrap(), WAD / 2);
        assert_eq!(parse_amount("3.").unwrap(), tokens(3));
        assert_eq!(parse_amount("0.000000000000000001").unwrap(), 1);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_amount(""), Err(AmountError::Empty));
        assert_eq!(parse_amount("."), Err(AmountError::Empty));
        assert_eq!(parse_amount("1a"), Err(AmountError::InvalidCharacter('a')));
        assert_eq!(parse_amount("-1"), Err(AmountError::InvalidCharacter('-')));
        assert_eq!(
            parse_amount("0.0000000000000000001"),
            Err(AmountError::TooPrecise(19))
        );
    }

    #[test]
    fn parse_rejects_overflow() {
        assert_eq!(
            parse_amount("340282366920938463463374607432"),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn format_output_parses_back() {
        for amount in [0, 1, WAD / 3, tokens(1_499_000) + 123_456_789] {
            assert_eq!(parse_amount(&format_amount(amount)).unwrap(), amount);
        }
    }
}
