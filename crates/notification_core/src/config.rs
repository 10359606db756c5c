//! Explicit runtime configuration.
//!
//! # Responsibility
//! - Carry the delivery media catalog and boundary hints into services.
//! - Parse and validate JSON configuration supplied by the host application.
//!
//! # Invariants
//! - A validated config has at least one medium, unique medium ids and
//!   non-blank display names.
//! - `feed_item_limit` is within `1..=FEED_ITEM_LIMIT_MAX`.

use crate::logging::default_log_level;
use crate::model::medium::NoticeMedium;
use crate::model::ModelValidationError;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_NOTICES_LOCATION: &str = "/notices/";
pub const DEFAULT_FEED_ITEM_LIMIT: u32 = 20;
pub const FEED_ITEM_LIMIT_MAX: u32 = 100;

/// Configuration error for JSON parsing and semantic validation.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidMedium(ModelValidationError),
    DuplicateMedium(String),
    NoMedia,
    InvalidFeedLimit(u32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid notification config: {err}"),
            Self::InvalidMedium(err) => write!(f, "{err}"),
            Self::DuplicateMedium(id) => write!(f, "medium `{id}` is configured twice"),
            Self::NoMedia => write!(f, "at least one delivery medium must be configured"),
            Self::InvalidFeedLimit(value) => write!(
                f,
                "feed_item_limit {value} is outside 1..={FEED_ITEM_LIMIT_MAX}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidMedium(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Notification engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Delivery media in column order.
    pub media: Vec<NoticeMedium>,
    /// Next-location hint returned after bulk operations.
    pub notices_location: String,
    /// Maximum notices handed to the feed exporter.
    pub feed_item_limit: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            media: vec![NoticeMedium::email(), NoticeMedium::site()],
            notices_location: DEFAULT_NOTICES_LOCATION.to_string(),
            feed_item_limit: DEFAULT_FEED_ITEM_LIMIT,
        }
    }
}

impl NotificationConfig {
    /// Parses a JSON document; missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media.is_empty() {
            return Err(ConfigError::NoMedia);
        }
        let mut seen = HashSet::new();
        for medium in &self.media {
            medium.validate().map_err(ConfigError::InvalidMedium)?;
            if !seen.insert(medium.id.as_str()) {
                return Err(ConfigError::DuplicateMedium(medium.id.clone()));
            }
        }
        if self.feed_item_limit == 0 || self.feed_item_limit > FEED_ITEM_LIMIT_MAX {
            return Err(ConfigError::InvalidFeedLimit(self.feed_item_limit));
        }
        Ok(())
    }

    /// Looks up a configured medium by id.
    pub fn medium(&self, id: &str) -> Option<&NoticeMedium> {
        self.media.iter().find(|medium| medium.id == id)
    }
}

/// Logging bootstrap parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

impl LoggingConfig {
    /// Uses the build-mode default level (see `default_log_level`).
    pub fn with_default_level(log_dir: impl Into<String>) -> Self {
        Self::new(default_log_level(), log_dir)
    }

    pub fn new(level: impl Into<String>, log_dir: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }
}
