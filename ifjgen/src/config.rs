//! Generator Configuration
//!
//! Defines the tunable constants of both generators. Every field has a
//! default, so a configuration file only needs to name what it changes.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GenError, GenResult};

/// Configuration for both generators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expression generator settings.
    pub expr: ExprConfig,

    /// Symbol-table stress generator settings.
    pub stress: StressConfig,
}

/// Expression generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExprConfig {
    /// Length at which every remaining non-terminal is forced to a terminal.
    pub max_length: usize,

    /// Smallest literal substituted for a terminal marker.
    pub min_literal: u32,

    /// Largest literal substituted for a terminal marker (inclusive).
    pub max_literal: u32,

    /// Candidates to try before giving up on a division by zero or an
    /// overflowing result.
    pub max_attempts: usize,
}

impl Default for ExprConfig {
    fn default() -> Self {
        Self {
            max_length: 500,
            min_literal: 1,
            max_literal: 100,
            max_attempts: 64,
        }
    }
}

/// Symbol-table stress generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Number of declared (and later defined) functions.
    pub functions: usize,

    /// Number of definition-only stub functions.
    pub stubs: usize,

    /// Maximum number of parameters per function (inclusive).
    pub max_params: usize,

    /// Maximum number of return values per function (inclusive).
    pub max_returns: usize,

    /// Maximum number of local variables per function (inclusive).
    pub max_locals: usize,

    /// Types drawn for parameters, returns and locals.
    pub types: Vec<TypeTag>,

    /// Name of the first generated function.
    pub base_name: String,

    /// Prefix of stub function names, followed by the stub number.
    pub stub_prefix: String,

    /// First line of the generated source.
    pub header: String,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            functions: 10_000,
            stubs: 100,
            max_params: 200,
            max_returns: 100,
            max_locals: 200,
            types: TypeTag::ALL.to_vec(),
            base_name: "a".to_string(),
            stub_prefix: "f".to_string(),
            header: "require \"ifj\"".to_string(),
        }
    }
}

/// A type name of the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Integer,
    Nil,
    String,
    Number,
}

impl TypeTag {
    /// The full type universe, in declaration order.
    pub const ALL: [TypeTag; 4] = [
        TypeTag::Integer,
        TypeTag::Nil,
        TypeTag::String,
        TypeTag::Number,
    ];

    /// Returns the keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Integer => "integer",
            TypeTag::Nil => "nil",
            TypeTag::String => "string",
            TypeTag::Number => "number",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a TOML file and validates it.
    pub fn load(path: &Path) -> GenResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> GenResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| GenError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> GenResult<String> {
        toml::to_string_pretty(self).map_err(|e| GenError::ConfigError(e.to_string()))
    }

    /// Checks both sections for values the generators cannot work with.
    pub fn validate(&self) -> GenResult<()> {
        self.expr.validate()?;
        self.stress.validate()
    }
}

impl ExprConfig {
    /// Checks the literal range and attempt budget.
    pub fn validate(&self) -> GenResult<()> {
        // A zero literal would make division by zero reachable from a bare divisor.
        if self.min_literal == 0 {
            return Err(GenError::ConfigError(
                "min_literal must be at least 1".to_string(),
            ));
        }
        if self.min_literal > self.max_literal {
            return Err(GenError::ConfigError(format!(
                "literal range is empty: {}..={}",
                self.min_literal, self.max_literal
            )));
        }
        if self.max_attempts == 0 {
            return Err(GenError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl StressConfig {
    /// Checks the type universe and the identifier settings.
    pub fn validate(&self) -> GenResult<()> {
        if self.types.is_empty() {
            return Err(GenError::ConfigError(
                "type universe must not be empty".to_string(),
            ));
        }
        if self.base_name.is_empty() || !self.base_name.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(GenError::ConfigError(format!(
                "base_name must be non-empty lowercase ASCII letters, got '{}'",
                self.base_name
            )));
        }
        let prefix_ok = self
            .stub_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self
                .stub_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !prefix_ok {
            return Err(GenError::ConfigError(format!(
                "stub_prefix must be a valid identifier, got '{}'",
                self.stub_prefix
            )));
        }
        Ok(())
    }
}
