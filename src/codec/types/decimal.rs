use std::fmt;
use std::str::FromStr;

use arrow_buffer::i256;

/// Fixed-point number stored as an unscaled integer and a decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i256,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: i256, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn from_i128(mantissa: i128, scale: u32) -> Self {
        Self::new(i256::from_i128(mantissa), scale)
    }

    pub fn mantissa(&self) -> i256 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Number of decimal digits in the mantissa, ignoring sign.
    pub fn digits(&self) -> u32 {
        let text = self.mantissa.to_string();
        text.trim_start_matches('-').len() as u32
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.mantissa.to_string();
        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", raw.as_str()),
        };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError(pub String);

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal literal '{}'", self.0)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let valid_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        let negative = int_part.starts_with('-');
        let unsigned_int = int_part.trim_start_matches(['-', '+']);
        if (unsigned_int.is_empty() && frac_part.is_empty())
            || !valid_digits(unsigned_int)
            || !valid_digits(frac_part)
        {
            return Err(ParseDecimalError(s.to_string()));
        }
        let joined = format!("{unsigned_int}{frac_part}");
        let digits = match joined.trim_start_matches('0') {
            "" => "0",
            rest => rest,
        };
        let signed = if negative {
            format!("-{digits}")
        } else {
            digits.to_string()
        };
        let mantissa =
            i256::from_string(&signed).ok_or_else(|| ParseDecimalError(s.to_string()))?;
        Ok(Self::new(mantissa, frac_part.len() as u32))
    }
}
