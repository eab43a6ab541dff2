//! Random arithmetic expression generator.
//!
//! A candidate expression is built by [`Derivation`], its terminal markers
//! are filled with literals, and the text is evaluated by [`evaluate`].
//! Candidates whose value cannot be represented (a divisor that evaluates
//! to zero, or a result that overflows a double) are discarded and a fresh
//! one is derived from the same RNG.

pub mod eval;
pub mod grammar;
pub mod hexfloat;

pub use eval::{evaluate, EvalError, Value};
pub use grammar::{BinOp, Derivation, DerivationStats, Rule, Symbol};
pub use hexfloat::{format_hex_float, parse_hex_float, HexFloatError};

use rand::Rng;
use tracing::debug;

use crate::config::ExprConfig;
use crate::{GenError, GenResult};

/// A generated expression together with its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// The expression source text.
    pub text: String,
    /// The evaluated value.
    pub value: f64,
    /// Statistics of the derivation that produced `text`.
    pub stats: DerivationStats,
    /// Candidates discarded before this one.
    pub rejected: usize,
}

impl Sample {
    /// The value as exact hexadecimal float text.
    pub fn hex_value(&self) -> String {
        format_hex_float(self.value)
    }

    /// Writes the two output lines: expression, then hex value.
    pub fn write_to<W: std::io::Write>(&self, out: &mut W) -> GenResult<()> {
        writeln!(out, "{}", self.text)?;
        writeln!(out, "{}", self.hex_value())?;
        Ok(())
    }
}

/// Derives one candidate expression text.
pub fn derive_text<R: Rng + ?Sized>(rng: &mut R, config: &ExprConfig) -> (String, DerivationStats) {
    let derivation = Derivation::new(config.max_length).run(rng);
    let text = derivation.fill_literals(rng, config.min_literal, config.max_literal);
    (text, derivation.stats())
}

/// Generates an expression whose value is a finite double.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &ExprConfig) -> GenResult<Sample> {
    config.validate()?;

    for attempt in 0..config.max_attempts {
        let (text, stats) = derive_text(rng, config);
        match evaluate(&text) {
            Ok(value) => {
                let value = value.to_f64();
                if value.is_finite() {
                    return Ok(Sample {
                        text,
                        value,
                        stats,
                        rejected: attempt,
                    });
                }
                debug!(attempt, length = text.len(), "rejecting candidate with non-finite value");
            }
            Err(EvalError::DivisionByZero { pos }) => {
                debug!(attempt, pos, "rejecting candidate that divides by zero");
            }
            // Anything else means the derivation produced malformed text.
            Err(e) => return Err(GenError::EvalError(e)),
        }
    }

    Err(GenError::AttemptsExhausted(config.max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generate_default_config() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let sample = generate(&mut rng, &ExprConfig::default()).unwrap();
        assert!(!sample.text.is_empty());
        assert!(sample.value.is_finite());
        assert_eq!(evaluate(&sample.text).unwrap().to_f64().to_bits(), sample.value.to_bits());
    }

    #[test]
    fn test_generate_is_reproducible() {
        let config = ExprConfig::default();
        let a = generate(&mut rand::rngs::StdRng::seed_from_u64(9), &config).unwrap();
        let b = generate(&mut rand::rngs::StdRng::seed_from_u64(9), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_length_yields_single_literal() {
        let config = ExprConfig {
            max_length: 1,
            ..ExprConfig::default()
        };
        for seed in 0..50 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let sample = generate(&mut rng, &config).unwrap();
            let literal: u32 = sample.text.parse().unwrap();
            assert!((1..=100).contains(&literal));
            assert_eq!(sample.value, literal as f64);
            assert_eq!(parse_hex_float(&sample.hex_value()), Ok(literal as f64));
        }
    }

    #[test]
    fn test_write_to_emits_two_lines() {
        let sample = Sample {
            text: "3*4".to_string(),
            value: 12.0,
            stats: DerivationStats::default(),
            rejected: 0,
        };
        let mut out = Vec::new();
        sample.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3*4\n0x1.8p+3\n");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExprConfig {
            min_literal: 0,
            ..ExprConfig::default()
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!(matches!(generate(&mut rng, &config), Err(GenError::ConfigError(_))));
    }
}
