//! Alarm table configuration
//!
//! Re-exports the shared `AlarmsConfig` type from tocsin-types and adds
//! validation and persistence through confy.

use thiserror::Error;
use tracing::warn;

pub use tocsin_types::{AlarmsConfig, DEFAULT_CAPACITY, MAX_CAPACITY};

const APP_NAME: &str = "tocsin";
const CONFIG_NAME: &str = "config";

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("capacity {capacity} is outside 1..={max}")]
    InvalidCapacity { capacity: usize, max: usize },
}

/// Extension trait for AlarmsConfig persistence
pub trait AlarmsConfigExt: Sized {
    fn load() -> Result<Self, ConfigError>;
    fn load_or_default() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl AlarmsConfigExt for AlarmsConfig {
    fn load() -> Result<Self, ConfigError> {
        let config: AlarmsConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the stored config, falling back to defaults on any error
    fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(error = %err, "using default alarm configuration");
            Self::default()
        })
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }
}
