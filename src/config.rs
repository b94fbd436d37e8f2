//! History store configuration.

use crate::error::{HistoryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default capacity of each subscriber's event buffer.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

/// Store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots to retain, including the current one.
    /// Oldest snapshots are evicted past this limit. `None` keeps everything.
    pub max_depth: Option<usize>,

    /// Default buffered events per subscriber before it is dropped.
    pub event_buffer_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl HistoryConfig {
    /// Unbounded history.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// History capped at `max_depth` snapshots.
    pub fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Set the per-subscriber event buffer size.
    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(HistoryError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.event_buffer_size == 0 {
            return Err(HistoryError::InvalidConfig(
                "event_buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HistoryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
