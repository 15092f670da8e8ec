//! Listing price: decimal parsing and digit-budget checks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kindaebay_core::ValueObject;

/// Message for input that is not a plain decimal literal.
pub const INVALID_NUMBER_MESSAGE: &str = "Enter a number.";

/// Digit layout of a submitted decimal literal.
///
/// Counting follows decimal-tuple semantics: leading zeros are not digits,
/// trailing fractional zeros are, and a value with more fractional places
/// than significant digits (`0.001`) counts every fractional place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalShape {
    pub digits: u32,
    pub decimals: u32,
}

impl DecimalShape {
    /// Parse `[+-]digits[.digits]`; returns `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let unsigned = input
            .strip_prefix('-')
            .or_else(|| input.strip_prefix('+'))
            .unwrap_or(input);

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let significant = whole
            .bytes()
            .chain(fraction.bytes())
            .skip_while(|b| *b == b'0')
            .count()
            .max(1) as u32;
        let places = fraction.len() as u32;

        let shape = if places > significant {
            Self {
                digits: places,
                decimals: places,
            }
        } else {
            Self {
                digits: significant,
                decimals: places,
            }
        };
        Some(shape)
    }

    pub fn whole_digits(&self) -> u32 {
        self.digits - self.decimals
    }
}

/// Accepted listing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse and check a submitted price against the digit budget.
    ///
    /// The total-digit and decimal-place checks both run, so a value breaking
    /// both limits reports both. The whole-digit check only runs when the
    /// total fits, since an oversized total already explains the overflow.
    pub fn parse_bounded(raw: &str, max_digits: u32, decimal_places: u32) -> Result<Self, Vec<String>> {
        let raw = raw.trim();
        let Some(shape) = DecimalShape::parse(raw) else {
            return Err(vec![INVALID_NUMBER_MESSAGE.to_string()]);
        };

        let mut problems = Vec::new();
        if shape.digits > max_digits {
            problems.push(format!(
                "Ensure that there are no more than {max_digits} digits in total."
            ));
        }
        if shape.decimals > decimal_places {
            problems.push(format!(
                "Ensure that there are no more than {decimal_places} decimal places."
            ));
        }
        let max_whole = max_digits.saturating_sub(decimal_places);
        if shape.digits <= max_digits && shape.whole_digits() > max_whole {
            problems.push(format!(
                "Ensure that there are no more than {max_whole} digits before the decimal point."
            ));
        }
        if !problems.is_empty() {
            return Err(problems);
        }

        let normalized = raw.strip_prefix('+').unwrap_or(raw);
        Decimal::from_str_exact(normalized)
            .map(Self)
            .map_err(|_| vec![INVALID_NUMBER_MESSAGE.to_string()])
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Price {}
