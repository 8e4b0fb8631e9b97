//! API configuration
//!
//! Every field can be set through `API_`-prefixed environment variables.
//! Nested pattern thresholds use `__` between levels:
//!
//! ```bash
//! API_PORT=9090
//! API_PATTERNS__PAYER_MIN_CLAIMS=10
//! API_PATTERNS__CRITICAL_DENIAL_RATE=0.25
//! ```

use serde::Deserialize;

use core_kernel::CoreError;
use domain_claims::{PatternConfig, TransitionTable};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Enforce the standard workflow instead of free transitions
    pub strict_transitions: bool,
    /// Pattern detector thresholds
    pub patterns: PatternConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            strict_transitions: false,
            patterns: PatternConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Rejects threshold sets whose tiers are out of order
    pub fn validate(&self) -> Result<(), CoreError> {
        let patterns = &self.patterns;
        if patterns.critical_denial_rate < patterns.elevated_denial_rate {
            return Err(CoreError::configuration(
                "patterns.critical_denial_rate must not be below patterns.elevated_denial_rate",
            ));
        }
        if patterns.payer_critical_multiplier < patterns.payer_rate_multiplier {
            return Err(CoreError::configuration(
                "patterns.payer_critical_multiplier must not be below patterns.payer_rate_multiplier",
            ));
        }
        if patterns.category_critical_share < patterns.category_share {
            return Err(CoreError::configuration(
                "patterns.category_critical_share must not be below patterns.category_share",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Transition table selected by `strict_transitions`
    pub fn transition_table(&self) -> TransitionTable {
        if self.strict_transitions {
            TransitionTable::standard_workflow()
        } else {
            TransitionTable::permissive()
        }
    }
}
