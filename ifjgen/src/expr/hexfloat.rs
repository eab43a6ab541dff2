//! Exact hexadecimal floating-point text.
//!
//! Output follows the C `%a` conventions: `0x1.8p+3`, `-0x1p-2`, `0x0p+0`,
//! with the mantissa trimmed of trailing zeros and subnormals written as
//! `0x0.<fraction>p-1022`. Non-finite values are written `inf`, `-inf` and
//! `nan`.

use thiserror::Error;

/// Errors produced while parsing hexadecimal float text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexFloatError {
    #[error("empty input")]
    Empty,

    #[error("missing '0x' prefix")]
    MissingPrefix,

    #[error("missing 'p' exponent")]
    MissingExponent,

    #[error("mantissa has no digits")]
    NoDigits,

    #[error("invalid character '{0}'")]
    InvalidChar(char),

    #[error("invalid exponent '{0}'")]
    InvalidExponent(String),

    #[error("value has more significant bits than a double can hold")]
    TooPrecise,

    #[error("value is out of range for a double")]
    OutOfRange,
}

const FRACTION_BITS: u32 = 52;
const FRACTION_MASK: u64 = (1 << FRACTION_BITS) - 1;
const EXPONENT_BIAS: i32 = 1023;
const MIN_NORMAL_EXPONENT: i32 = -1022;
const MIN_SUBNORMAL_EXPONENT: i64 = -1074;

/// Renders `value` as exact hexadecimal float text.
pub fn format_hex_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}inf");
    }

    let bits = value.to_bits();
    let biased = ((bits >> FRACTION_BITS) & 0x7ff) as i32;
    let fraction = bits & FRACTION_MASK;

    if biased == 0 && fraction == 0 {
        return format!("{sign}0x0p+0");
    }

    let (lead, exponent) = if biased == 0 {
        (0, MIN_NORMAL_EXPONENT)
    } else {
        (1, biased - EXPONENT_BIAS)
    };

    let digits = format!("{fraction:013x}");
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        format!("{sign}0x{lead}p{exponent:+}")
    } else {
        format!("{sign}0x{lead}.{digits}p{exponent:+}")
    }
}

/// Parses hexadecimal float text back into a double.
///
/// Accepts everything [`format_hex_float`] produces, as well as untrimmed
/// mantissas such as `0x1.8000000000000p+3`. Every accepted finite value is
/// exact: a mantissa wider than 53 bits, or a subnormal whose lowest set bit
/// falls below 2^-1074, is rejected with [`HexFloatError::TooPrecise`].
pub fn parse_hex_float(text: &str) -> Result<f64, HexFloatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(HexFloatError::Empty);
    }

    let (negative, rest) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let signed = |x: f64| if negative { -x } else { x };

    match rest.to_ascii_lowercase().as_str() {
        "inf" | "infinity" => return Ok(signed(f64::INFINITY)),
        "nan" => return Ok(f64::NAN),
        _ => {}
    }

    let body = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .ok_or(HexFloatError::MissingPrefix)?;
    let (mantissa, exponent) = body
        .split_once(['p', 'P'])
        .ok_or(HexFloatError::MissingExponent)?;

    let exponent: i64 = exponent
        .parse()
        .map_err(|_| HexFloatError::InvalidExponent(exponent.to_string()))?;

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(HexFloatError::NoDigits);
    }

    let mut digits = Vec::with_capacity(int_part.len() + frac_part.len());
    for c in int_part.chars().chain(frac_part.chars()) {
        digits.push(c.to_digit(16).ok_or(HexFloatError::InvalidChar(c))? as u64);
    }

    // Each fraction digit scales the integer mantissa by 2^-4.
    let mut scale = exponent - 4 * frac_part.len() as i64;
    while digits.last() == Some(&0) {
        digits.pop();
        scale += 4;
    }
    let first = digits.iter().position(|&d| d != 0);
    let Some(first) = first else {
        return Ok(signed(0.0));
    };
    let digits = &digits[first..];
    if digits.len() > 16 {
        return Err(HexFloatError::TooPrecise);
    }

    let mut significand = digits.iter().fold(0u64, |acc, &d| (acc << 4) | d);
    while significand >= 1 << 53 {
        if significand & 1 != 0 {
            return Err(HexFloatError::TooPrecise);
        }
        significand >>= 1;
        scale += 1;
    }
    while significand & 1 == 0 {
        significand >>= 1;
        scale += 1;
    }

    let value = scale_by_pow2(significand as f64, scale);
    if value.is_infinite() || value == 0.0 {
        return Err(HexFloatError::OutOfRange);
    }
    if scale < MIN_SUBNORMAL_EXPONENT {
        return Err(HexFloatError::TooPrecise);
    }
    Ok(signed(value))
}

/// Returns 2^exp for exponents in the normal range.
fn pow2(exp: i32) -> f64 {
    debug_assert!((MIN_NORMAL_EXPONENT..=EXPONENT_BIAS).contains(&exp));
    f64::from_bits(((exp + EXPONENT_BIAS) as u64) << FRACTION_BITS)
}

/// Computes `x * 2^exp`, stepping through normal powers of two so that an
/// exactly representable result is produced without rounding.
pub(crate) fn scale_by_pow2(mut x: f64, exp: i64) -> f64 {
    let mut exp = exp.clamp(-4000, 4000) as i32;
    while exp > EXPONENT_BIAS {
        x *= pow2(EXPONENT_BIAS);
        exp -= EXPONENT_BIAS;
    }
    while exp < MIN_NORMAL_EXPONENT {
        x *= pow2(MIN_NORMAL_EXPONENT);
        exp -= MIN_NORMAL_EXPONENT;
    }
    x * pow2(exp)
}
