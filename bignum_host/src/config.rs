//! Facade configuration
//!
//! Loaded from TOML, from the environment, or built with [`Default`].
//!
//! ```toml
//! non_finite = "reject"
//! max_exponent = 65536
//! max_result_bits = 1048576
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Names a TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "BIGNUM_HOST_CONFIG";
/// Overrides [`FacadeConfig::non_finite`] (`zero` or `reject`).
pub const NON_FINITE_VAR: &str = "BIGNUM_HOST_NON_FINITE";

/// Default cap on the size of a `pow` result, in bits
pub const DEFAULT_MAX_RESULT_BITS: u64 = 1 << 29;

/// How float coercion treats NaN and infinities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Convert to a zero magnitude
    #[default]
    Zero,
    /// Fail with `InvalidOperand`
    Reject,
}

impl NonFinitePolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(NonFinitePolicy::Zero),
            "reject" => Ok(NonFinitePolicy::Reject),
            _ => Err(ConfigError::InvalidValue {
                key: NON_FINITE_VAR,
                value: raw.to_string(),
            }),
        }
    }
}

/// Settings shared by every call made through one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacadeConfig {
    pub non_finite: NonFinitePolicy,
    /// Largest exponent `pow` accepts
    pub max_exponent: u32,
    /// Largest `pow` result, estimated as `bits(base) * exponent`
    pub max_result_bits: u64,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            non_finite: NonFinitePolicy::Zero,
            max_exponent: u32::MAX,
            max_result_bits: DEFAULT_MAX_RESULT_BITS,
        }
    }
}

impl FacadeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Read `BIGNUM_HOST_CONFIG` (if set) and apply `BIGNUM_HOST_NON_FINITE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(Path::new(path.trim()))?,
            _ => Self::default(),
        };

        if let Ok(raw) = env::var(NON_FINITE_VAR) {
            config.non_finite = NonFinitePolicy::parse(&raw)?;
        }

        Ok(config)
    }
}
