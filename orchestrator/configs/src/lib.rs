pub mod constants;
pub mod infra;
pub mod pagination;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

pub use infra::RegionInfra;
use orchestrator_env::keys;
pub use pagination::{PaginationPolicy, UnknownPaginationPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_TESTS_REGION;

#[derive(Debug, Error)]
/// Failures while assembling the orchestrator configuration.
pub enum ConfigError {
    #[error("required configuration value {key} is not set")]
    MissingValue { key: &'static str },
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Process-wide settings, resolved once at start-up and handed to every
/// component.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OrchestratorConfig {
    pub tests_region: String,
    pub tests_table: String,
    pub scenarios_bucket: String,
    pub state_machine_arn: String,
    pub region_infra_table: String,
    pub pagination: PaginationPolicy,
}

/// On-disk YAML form. Every field is optional so the environment can fill the
/// gaps; `region_infra` seeds the local infra table.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub tests_region: Option<String>,
    #[serde(default)]
    pub tests_table: Option<String>,
    #[serde(default)]
    pub scenarios_bucket: Option<String>,
    #[serde(default)]
    pub state_machine_arn: Option<String>,
    #[serde(default)]
    pub region_infra_table: Option<String>,
    #[serde(default)]
    pub pagination: Option<PaginationPolicy>,
    #[serde(default)]
    pub region_infra: BTreeMap<String, RegionInfra>,
}

impl ConfigFile {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl OrchestratorConfig {
    /// Resolve the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(orchestrator_env::lookup)
    }

    /// Resolve the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(&ConfigFile::default(), lookup)
    }

    /// Resolve the configuration from a config file, letting non-empty
    /// environment values take precedence.
    pub fn resolve(
        file: &ConfigFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let pick = |key: &'static str, from_file: &Option<String>| {
            lookup(key)
                .or_else(|| from_file.clone())
                .filter(|value| !value.trim().is_empty())
        };
        let required = |key: &'static str, from_file: &Option<String>| {
            pick(key, from_file).ok_or(ConfigError::MissingValue { key })
        };

        let pagination = match lookup(keys::STATUS_PAGINATION) {
            Some(raw) => raw
                .parse::<PaginationPolicy>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: keys::STATUS_PAGINATION,
                    reason: err.to_string(),
                })?,
            None => file.pagination.unwrap_or_default(),
        };

        Ok(Self {
            tests_region: pick(keys::TESTS_REGION, &file.tests_region)
                .unwrap_or_else(|| DEFAULT_TESTS_REGION.to_owned()),
            tests_table: required(keys::TESTS_TABLE, &file.tests_table)?,
            scenarios_bucket: required(keys::TEST_SCENARIOS_BUCKET, &file.scenarios_bucket)?,
            state_machine_arn: required(keys::STATE_MACHINE_ARN, &file.state_machine_arn)?,
            region_infra_table: required(keys::REGION_INFRA_TABLE, &file.region_infra_table)?,
            pagination,
        })
    }
}
