//! Global growth multiplier decay.
//!
//! The multiplier falls linearly from the configured initial value to 1.0×
//! ([`BPS_PRECISION`]) as realized rewards consume the distributable pool:
//!
//! ```text
//! multiplier = initial - ceil((initial - 10_000) * distributed / pool)
//! ```
//!
//! The decrement rounds up, so the rate is never overstated. Once the pool is
//! exhausted the multiplier is exactly 1.0× and wallets stop growing, which is
//! what keeps total supply at or below the cap.

use juicy_core::amount::Amount;
use juicy_core::constants::BPS_PRECISION;

use crate::fixed::mul_div_ceil;

/// Current multiplier for `distributed` realized rewards out of `pool`.
///
/// Returns [`BPS_PRECISION`] for a zero pool, a non-growing initial
/// multiplier, or an exhausted pool.
///
/// # Examples
///
/// ```
/// use juicy_accrual::multiplier::decayed_multiplier;
/// let pool = 4_000_000;
/// assert_eq!(decayed_multiplier(15_000, 0, pool), 15_000);
/// assert_eq!(decayed_multiplier(15_000, 500_000, pool), 14_375);
/// assert_eq!(decayed_multiplier(15_000, pool, pool), 10_000);
/// ```
pub fn decayed_multiplier(initial: u64, distributed: Amount, pool: Amount) -> u64 {
    if pool == 0 || initial <= BPS_PRECISION || distributed >= pool {
        return BPS_PRECISION;
    }

    let span = initial - BPS_PRECISION;
    // distributed < pool, so the decrement is at most `span` and fits u64.
    let decrement = mul_div_ceil(span as u128, distributed, pool).unwrap_or(span as u128);
    let decrement = decrement.min(span as u128) as u64;
    (initial - decrement).max(BPS_PRECISION)
}
