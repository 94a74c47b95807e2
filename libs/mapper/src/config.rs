//! Configuration for mapper factories
//!
//! Loaded from TOML with environment overrides:
//!
//! ```toml
//! name = "catalog"
//! materialization_failure = "warn"   # ignore | warn | error
//!
//! [field_copy]
//! lenient_conversion = true
//! ```
//!
//! Environment variables: `MAPPER_NAME`, `MAPPER_MATERIALIZATION_FAILURE`,
//! `MAPPER_LENIENT_CONVERSION`.

use crate::{FieldCopier, MapperError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const ENV_NAME: &str = "MAPPER_NAME";
pub const ENV_MATERIALIZATION_FAILURE: &str = "MAPPER_MATERIALIZATION_FAILURE";
pub const ENV_LENIENT_CONVERSION: &str = "MAPPER_LENIENT_CONVERSION";

/// What the resolver does when a registered mapper cannot be materialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip the mapper, debug log only
    Ignore,
    /// Skip the mapper and log a warning
    #[default]
    Warn,
    /// Fail the resolution with `MapperError::Materialization`
    Error,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Ignore => "ignore",
            FailurePolicy::Warn => "warn",
            FailurePolicy::Error => "error",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(FailurePolicy::Ignore),
            "warn" => Ok(FailurePolicy::Warn),
            "error" | "strict" => Ok(FailurePolicy::Error),
            other => Err(MapperError::invalid_config(format!(
                "unknown materialization failure policy '{}'",
                other
            ))),
        }
    }
}

/// Generic field copy settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldCopyConfig {
    /// Try simple scalar coercions when a value does not fit as-is
    pub lenient_conversion: bool,
}

impl Default for FieldCopyConfig {
    fn default() -> Self {
        Self {
            lenient_conversion: true,
        }
    }
}

impl FieldCopyConfig {
    pub fn copier(&self) -> FieldCopier {
        FieldCopier::new(self.lenient_conversion)
    }
}

/// Mapper factory configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Factory name used in logs
    pub name: String,

    pub materialization_failure: FailurePolicy,

    pub field_copy: FieldCopyConfig,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            materialization_failure: FailurePolicy::default(),
            field_copy: FieldCopyConfig::default(),
        }
    }
}

impl MapperConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(toml_str: &str) -> Result<Self, MapperError> {
        let config: MapperConfig = toml::from_str(toml_str)
            .map_err(|e| MapperError::invalid_config(format!("failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, apply environment overrides, and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapperError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: MapperConfig = toml::from_str(&content).map_err(|e| {
            MapperError::invalid_config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.apply_env_overrides()?;
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            name = %config.name,
            policy = config.materialization_failure.as_str(),
            "Loaded mapper configuration"
        );

        Ok(config)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self, MapperError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), MapperError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_overrides_from<L>(&mut self, lookup: L) -> Result<(), MapperError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ENV_NAME) {
            self.name = name;
        }
        if let Some(policy) = lookup(ENV_MATERIALIZATION_FAILURE) {
            self.materialization_failure = policy.parse()?;
        }
        if let Some(lenient) = lookup(ENV_LENIENT_CONVERSION) {
            self.field_copy.lenient_conversion = parse_bool(ENV_LENIENT_CONVERSION, &lenient)?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), MapperError> {
        if self.name.trim().is_empty() {
            return Err(MapperError::invalid_config("name must not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, MapperError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MapperError::invalid_config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
