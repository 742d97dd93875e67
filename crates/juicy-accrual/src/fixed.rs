//! 18-decimal fixed-point arithmetic for accrual.
//!
//! All computation uses integer arithmetic only. Values are scaled by
//! [`WAD`] (10^18). Every division truncates toward zero, and the series
//! below are cut off as soon as a term truncates to zero, so results never
//! round in the holder's favour by more than the final truncation.
//!
//! Products that can exceed `u128` go through [`mul_div`], which forms the
//! full 256-bit product before dividing.

use juicy_core::constants::{BPS_PRECISION, SECONDS_PER_YEAR, WAD};
use juicy_core::error::MathError;
use primitive_types::U256;

/// `ln(2) * WAD`, truncated.
pub const LN2_WAD: u128 = 693_147_180_559_945_309;

/// Largest binary exponent [`exp_wad`] can scale by before overflowing `u128`.
///
/// The reduced series result is below `2 * WAD < 2^61`, so shifts up to 66
/// stay within 127 bits.
const MAX_EXP_SHIFT: u128 = 66;

/// `floor(a * b / d)` with a 256-bit intermediate, or `None` if `d == 0`
/// or the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use juicy_accrual::fixed::mul_div;
/// assert_eq!(mul_div(u128::MAX, 3, 6), Some(u128::MAX / 2));
/// assert_eq!(mul_div(7, 3, 2), Some(10));
/// assert_eq!(mul_div(1, 1, 0), None);
/// ```
pub fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    let q = U256::from(a)
        .checked_mul(U256::from(b))?
        .checked_div(U256::from(d))?;
    u128::try_from(q).ok()
}

/// `ceil(a * b / d)` with a 256-bit intermediate.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let d = U256::from(d);
    let (q, r) = U256::from(a).checked_mul(U256::from(b))?.div_mod(d);
    let q = if r.is_zero() { q } else { q.checked_add(U256::one())? };
    u128::try_from(q).ok()
}

/// Natural logarithm of `x / WAD`, scaled by `WAD`. Requires `x >= WAD`.
///
/// Reduces `x` into `[1, 2)` by halving, then sums the series
/// `ln(y) = 2 * atanh((y - 1) / (y + 1))`.
pub fn ln_wad(x: u128) -> Result<u128, MathError> {
    if x < WAD {
        return Err(MathError::DomainError);
    }

    let mut y = x;
    let mut k: u128 = 0;
    while y >= 2 * WAD {
        y /= 2;
        k += 1;
    }

    // z = (y - 1) / (y + 1) lies in [0, 1/3).
    let z = mul_div(y - WAD, WAD, y + WAD).ok_or(MathError::ArithmeticOverflow)?;
    let z2 = z * z / WAD;

    let mut sum = z;
    let mut term = z;
    let mut n: u128 = 3;
    loop {
        term = term * z2 / WAD;
        if term == 0 {
            break;
        }
        sum += term / n;
        n += 2;
    }

    Ok(2 * sum + k * LN2_WAD)
}

/// `e^(x / WAD)`, scaled by `WAD`.
///
/// Splits `x = k * ln(2) + r` with `r < ln(2)`, sums the Taylor series for
/// `e^r` and shifts by `k`.
pub fn exp_wad(x: u128) -> Result<u128, MathError> {
    let k = x / LN2_WAD;
    if k > MAX_EXP_SHIFT {
        return Err(MathError::ArithmeticOverflow);
    }
    let r = x - k * LN2_WAD;

    let mut sum = WAD;
    let mut term = WAD;
    let mut n: u128 = 1;
    loop {
        term = term * r / WAD / n;
        if term == 0 {
            break;
        }
        sum += term;
        n += 1;
    }

    Ok(sum << k)
}

/// Annual growth factor applied over `elapsed` seconds, scaled by `WAD`.
///
/// Computes `(multiplier / BPS_PRECISION) ^ (elapsed / SECONDS_PER_YEAR)`:
/// continuous compounding of the annualized rate the multiplier expresses.
/// Multipliers at or below 1.0× never grow.
pub fn growth_factor(elapsed: u64, multiplier: u64) -> Result<u128, MathError> {
    if elapsed == 0 || multiplier <= BPS_PRECISION {
        return Ok(WAD);
    }

    // WAD is a multiple of BPS_PRECISION, so this is exact.
    let base = multiplier as u128 * (WAD / BPS_PRECISION as u128);
    let ln_base = ln_wad(base)?;
    let exponent = mul_div(ln_base, elapsed as u128, SECONDS_PER_YEAR as u128)
        .ok_or(MathError::ArithmeticOverflow)?;
    exp_wad(exponent)
}
