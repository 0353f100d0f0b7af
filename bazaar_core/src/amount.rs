// Fixed-point amount codec for the marketplace token.
// Ledger amounts are unsigned 256-bit integers scaled by 10^18; all
// conversions are exact integer arithmetic, never floating point, since
// on-ledger values routinely exceed f64's safe integer range.

use crate::error::CoreError;
use alloy_primitives::U256;
use once_cell::sync::Lazy;

/// Decimal places carried by the token on the ledger.
pub const TOKEN_DECIMALS: u32 = 18;

/// Decimal places shown to the user.
pub const DISPLAY_DECIMALS: u32 = 2;

static SCALE: Lazy<U256> = Lazy::new(|| pow10(TOKEN_DECIMALS as usize));

// One display cent, in ledger units.
static CENT: Lazy<U256> = Lazy::new(|| pow10((TOKEN_DECIMALS - DISPLAY_DECIMALS) as usize));

fn pow10(n: usize) -> U256 {
    U256::from(10u64).pow(U256::from(n))
}

/// Convert a human-entered decimal string into the ledger's fixed-point
/// integer representation. Fractional digits beyond the ledger scale are
/// truncated. Fails with `InvalidAmount` on empty, signed, or non-numeric
/// input, and on values that overflow 256 bits.
pub fn to_ledger_amount(input: &str) -> Result<U256, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAmount("empty amount".to_string()));
    }
    if trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(CoreError::InvalidAmount(format!(
            "signed amounts are not accepted: {}",
            trimmed
        )));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(CoreError::InvalidAmount(format!("not a number: {}", trimmed)));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CoreError::InvalidAmount(format!("not a number: {}", trimmed)));
    }

    let overflow = || CoreError::InvalidAmount(format!("amount out of ledger range: {}", trimmed));

    let int_value = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).map_err(|_| overflow())?
    };

    // Truncate, not round: the ledger has no representation for anything finer.
    let frac = &frac_part[..frac_part.len().min(TOKEN_DECIMALS as usize)];
    let frac_value = if frac.is_empty() {
        U256::ZERO
    } else {
        let digits = U256::from_str_radix(frac, 10).map_err(|_| overflow())?;
        digits
            .checked_mul(pow10(TOKEN_DECIMALS as usize - frac.len()))
            .ok_or_else(overflow)?
    };

    int_value
        .checked_mul(*SCALE)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

/// Render a ledger amount as a decimal string rounded half-up to two
/// decimal places, e.g. `1500000000000000000` -> `"1.50"`.
pub fn to_display_amount(amount: U256) -> String {
    let mut cents = amount / *CENT;
    let remainder = amount % *CENT;
    if remainder + remainder >= *CENT {
        cents += U256::from(1u64);
    }
    let whole = cents / U256::from(100u64);
    // Fits in one limb: always < 100 after the modulo.
    let frac = (cents % U256::from(100u64)).as_limbs()[0];
    format!("{}.{:02}", whole, frac)
}
