use crate::error::{ArtError, ArtResult};
use serde::Deserialize;
use tracing::debug;

/// Execution configuration shared by every engine instance. Loaded from
/// environment variables with the prefix `RESONANCE__` or built in code.
///
/// These knobs control how an operation executes (parallelism, caching,
/// SIMD), never what it computes: outcomes are identical for any valid
/// combination of values.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Worker count for the bounded-parallel category scan.
    #[serde(default = "default_parallelism_level")]
    pub parallelism_level: usize,
    /// Category count at which the scan switches from sequential to parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Upper bound on memoized activation entries per operation.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,
    /// Allow vectorized kernel paths when the CPU supports them.
    #[serde(default = "default_enable_simd")]
    pub enable_simd: bool,
    /// Fraction of the activation cache retained when it overflows.
    #[serde(default = "default_memory_optimization_threshold")]
    pub memory_optimization_threshold: f64,
}

fn default_parallelism_level() -> usize {
    4
}
fn default_parallel_threshold() -> usize {
    64
}
fn default_max_cache_size() -> usize {
    4096
}
fn default_enable_simd() -> bool {
    true
}
fn default_memory_optimization_threshold() -> f64 {
    0.75
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallelism_level: default_parallelism_level(),
            parallel_threshold: default_parallel_threshold(),
            max_cache_size: default_max_cache_size(),
            enable_simd: default_enable_simd(),
            memory_optimization_threshold: default_memory_optimization_threshold(),
        }
    }
}

impl ExecutionConfig {
    /// Load configuration from environment variables.
    pub fn load() -> ArtResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("RESONANCE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ArtError::Parameter(e.to_string()))?;
        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ArtError::Parameter(e.to_string()))?;
        loaded.validate()?;
        debug!(?loaded, "execution config loaded from environment");
        Ok(loaded)
    }

    /// Range-check every field. Invalid values fail here, never inside an
    /// operation.
    pub fn validate(&self) -> ArtResult<()> {
        if self.parallelism_level < 1 {
            return Err(ArtError::parameter(
                "parallelism_level",
                format!("must be >= 1, got {}", self.parallelism_level),
            ));
        }
        if self.parallel_threshold < 1 {
            return Err(ArtError::parameter(
                "parallel_threshold",
                format!("must be >= 1, got {}", self.parallel_threshold),
            ));
        }
        if !(self.memory_optimization_threshold > 0.0
            && self.memory_optimization_threshold <= 1.0)
        {
            return Err(ArtError::parameter(
                "memory_optimization_threshold",
                format!(
                    "must lie in (0, 1], got {}",
                    self.memory_optimization_threshold
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExecutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parallelism_level, 4);
        assert!(config.enable_simd);
    }

    #[test]
    fn test_invalid_parallelism_rejected() {
        let config = ExecutionConfig {
            parallelism_level: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallelism_level"));
    }

    #[test]
    fn test_memory_threshold_bounds() {
        let config = ExecutionConfig {
            memory_optimization_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ExecutionConfig {
            memory_optimization_threshold: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
