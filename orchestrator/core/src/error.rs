use orchestrator_config::ConfigError;
use thiserror::Error;

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification callers branch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Dependency,
}

impl ErrorKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Dependency => "dependency",
        }
    }
}

#[derive(Debug, Error)]
/// Caller input that can never succeed as submitted.
pub enum ValidationError {
    #[error("invalid hold-for '{raw}': {reason}")]
    MalformedDuration { raw: String, reason: &'static str },
    #[error("container name is required for container overrides")]
    ContainerNameRequired,
    #[error("subnet ids are required for the task network configuration")]
    SubnetRequired,
    #[error("scenario '{name}' is not defined in the scenario map")]
    ScenarioNotFound { name: String },
    #[error("{field} must be a non-negative integer (got {value})")]
    InvalidSizing { field: &'static str, value: String },
    #[error("scenario definition has no execution block")]
    MissingExecutionBlock,
    #[error("required field {field} is missing or empty")]
    MissingField { field: &'static str },
    #[error("malformed request body: {reason}")]
    MalformedBody { reason: String },
}

#[derive(Debug, Error)]
/// Deployment-scope problems: fatal for the invocation, never transient.
pub enum ConfigurationError {
    #[error("region {region} has no infrastructure configured")]
    RegionNotConfigured { region: String },
    #[error("invalid region provided: {region} (only {supported} is supported)")]
    UnsupportedRegion {
        region: String,
        supported: &'static str,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A collaborator call failed; carries the operation for context.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct DependencyError {
    operation: &'static str,
    #[source]
    source: DynError,
}

impl DependencyError {
    pub fn new(operation: &'static str, source: impl Into<DynError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

impl OrchestratorError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Dependency(_) => ErrorKind::Dependency,
        }
    }

    /// True when the failure means "the thing asked for does not exist".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Configuration(ConfigurationError::RegionNotConfigured { .. })
                | Self::Validation(ValidationError::ScenarioNotFound { .. })
        )
    }
}

impl From<ConfigError> for OrchestratorError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.into())
    }
}
