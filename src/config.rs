// src/config.rs

//! # Graph Rank Engine — Configuration
//!
//! **Layer:** Config / Tunables
//! **Implements:** SPEC-GRAPH-RANK Section 10.3 (Error handling & configuration)
//!
//! Tunables that are not part of a single invocation's mathematical input —
//! safety valves, FFI convenience defaults — live here, loadable from a TOML
//! file the same way the reference engine loads `unit_registry.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating an [`EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O Failure: could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Violation: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config Validation Violation: max_iterations must be > 0, found {0}")]
    InvalidMaxIterations(u64),

    #[error("Config Validation Violation: max_scratch_bytes must be > 0, found {0}")]
    InvalidScratchBudget(u64),
}

/// Process-wide tunables for the graph rank engine.
///
/// # Document IDs
/// Implements: SPEC-GRAPH-RANK Section 10.3
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on power-method iterations (§4.7 supplemented safety valve).
    /// Reaching this cap without `δ ≤ tolerance` is logged as a warning and
    /// reported via `ConvergenceReport::converged = false`; it is not an error.
    pub max_iterations: u64,

    /// Ceiling, in bytes, on the scratch memory peak between stage 6 and
    /// stage 7 (§5). Exceeding it is reported as `EngineError::ScratchBudgetExceeded`
    /// before any allocation is attempted.
    pub max_scratch_bytes: u64,

    /// Default `dampingFactor` used by convenience callers that omit it.
    pub default_damping_factor: f64,

    /// Default `tolerance` used by convenience callers that omit it.
    pub default_tolerance: f64,

    /// Default karma-accumulation mode (§4.8): `true` selects the literal
    /// sequential reference path, `false` the partial-sum-merge parallel path.
    pub default_deterministic_karma: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_scratch_bytes: 8 * 1024 * 1024 * 1024, // 8 GiB
            default_damping_factor: 0.85,
            default_tolerance: 1e-7,
            default_deterministic_karma: false,
        }
    }
}

impl EngineConfig {
    /// Loads an `EngineConfig` from a TOML file, falling back to
    /// [`EngineConfig::default`] values for any field the file omits.
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates internal consistency beyond what `serde` can express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(self.max_iterations));
        }
        if self.max_scratch_bytes == 0 {
            return Err(ConfigError::InvalidScratchBudget(self.max_scratch_bytes));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_iterations = 500").unwrap();
        let config = EngineConfig::load_from_toml(file.path()).unwrap();
        assert_eq!(config.max_iterations, 500);
        // Untouched fields fall back to the default.
        assert!((config.default_damping_factor - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_rejects_zero_max_iterations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_iterations = 0").unwrap();
        let result = EngineConfig::load_from_toml(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidMaxIterations(0))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = EngineConfig::load_from_toml(Path::new("/nonexistent/engine_config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
