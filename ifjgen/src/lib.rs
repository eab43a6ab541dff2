//! IFJ Test-Data Generators
//!
//! Two independent generators that produce input for the IFJ compiler test
//! suite.
//!
//! # Generators
//!
//! - [`expr`] - random arithmetic expressions built by leftmost derivation,
//!   printed together with their value as an exact hexadecimal float
//! - [`stress`] - a large synthetic source file with thousands of function
//!   declarations and definitions for loading the symbol table
//!
//! # Example
//!
//! ```rust,ignore
//! use ifjgen::{expr, Config};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let sample = expr::generate(&mut rng, &Config::default().expr)?;
//! println!("{}\n{}", sample.text, sample.hex_value());
//! ```

pub mod config;
pub mod expr;
pub mod stress;

pub use config::{Config, ExprConfig, StressConfig, TypeTag};

use thiserror::Error;

use crate::expr::{EvalError, HexFloatError};

/// Errors that can occur while generating test data.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Evaluation error: {0}")]
    EvalError(#[from] EvalError),

    #[error("Hex float error: {0}")]
    HexFloatError(#[from] HexFloatError),

    #[error("No usable expression after {0} attempts")]
    AttemptsExhausted(usize),
}

/// Result type for generator operations.
pub type GenResult<T> = Result<T, GenError>;
