//! Decimal-scaled token amounts.
//!
//! An on-chain ERC20 amount is a uint256 plus the token's `decimals()`.
//! The human-readable quantity `raw / 10^scale` is produced exactly by
//! alloy's unit formatting, so supplies far beyond `u128`/`f64` range keep
//! every digit. Conversion to `f64` happens only at the transport edge.

use std::fmt;

use alloy::primitives::U256;
use alloy::primitives::utils::{format_units, parse_units};

use super::error::LookupError;

/// Largest supported scale: 10^77 is the largest power of ten in uint256,
/// so `raw = display * 10^scale` always round-trips.
pub const MAX_SCALE: u8 = 77;

/// Integer on-chain amount with its decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    raw: U256,
    scale: u8,
}

impl TokenAmount {
    /// Create an amount, rejecting scales outside `0..=MAX_SCALE`.
    pub fn new(raw: U256, scale: u8) -> Result<Self, LookupError> {
        if scale > MAX_SCALE {
            return Err(LookupError::InvalidScale {
                scale,
                max: MAX_SCALE,
            });
        }
        Ok(Self { raw, scale })
    }

    /// Parse a base-10 integer string (as returned by indexing APIs).
    pub fn parse_raw(digits: &str, scale: u8) -> Result<Self, LookupError> {
        let digits = digits.trim();
        if digits.is_empty() {
            return Err(LookupError::Validation("empty integer amount".to_string()));
        }
        let raw = U256::from_str_radix(digits, 10).map_err(|e| {
            LookupError::Validation(format!("invalid integer amount {digits:?}: {e}"))
        })?;
        Self::new(raw, scale)
    }

    /// Parse a human-readable decimal back into raw units at `scale`.
    ///
    /// Fails if the text carries more fractional digits than `scale` or the
    /// result overflows uint256.
    pub fn from_display(text: &str, scale: u8) -> Result<Self, LookupError> {
        let text = text.trim();
        let invalid = |reason: &str| LookupError::Validation(format!("{text:?}: {reason}"));

        let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a non-negative decimal"));
        }
        // parse_units truncates excess precision instead of rejecting it.
        if frac_part.len() > usize::from(scale) {
            return Err(invalid("more fractional digits than token decimals"));
        }
        Self::new(U256::ZERO, scale)?;

        let raw: U256 = parse_units(text, scale)
            .map_err(|e| invalid(&e.to_string()))?
            .into();

        // parse_units wraps on overflow; the integer part must survive.
        let whole = if int_part.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(int_part, 10).map_err(|_| invalid("exceeds uint256"))?
        };
        if raw / U256::from(10u64).pow(U256::from(scale)) != whole {
            return Err(invalid("exceeds uint256"));
        }
        Self::new(raw, scale)
    }

    /// Raw on-chain integer.
    pub const fn raw(&self) -> U256 {
        self.raw
    }

    /// Decimal places.
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Exact `raw / 10^scale` with trailing fractional zeros trimmed.
    pub fn display(&self) -> String {
        // `new` keeps the scale within alloy's unit range.
        let Ok(text) = format_units(self.raw, self.scale) else {
            return self.raw.to_string();
        };
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            text
        }
    }

    /// Nearest `f64`. Lossy; meant for JSON transport only.
    pub fn to_f64(&self) -> f64 {
        self.display().parse().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
