use std::{env, path::PathBuf};

/// Environment variable names read by the orchestrator.
pub mod keys {
    pub const TESTS_REGION: &str = "TESTS_REGION";
    pub const TESTS_TABLE: &str = "TESTS_TABLE";
    pub const TEST_SCENARIOS_BUCKET: &str = "TEST_SCENARIOS_BUCKET";
    pub const STATE_MACHINE_ARN: &str = "STATE_MACHINE_ARN";
    pub const REGION_INFRA_TABLE: &str = "REGION_INFRA_TABLE";
    pub const STATUS_PAGINATION: &str = "STATUS_PAGINATION";
    pub const ORCHESTRATOR_PORT: &str = "ORCHESTRATOR_PORT";
    pub const ORCHESTRATOR_DATA_DIR: &str = "ORCHESTRATOR_DATA_DIR";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Read a variable, treating blank values as unset.
#[must_use]
pub fn lookup(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub fn orchestrator_port() -> Option<u16> {
    lookup(keys::ORCHESTRATOR_PORT).and_then(|v| v.parse::<u16>().ok())
}

#[must_use]
pub fn orchestrator_data_dir() -> Option<PathBuf> {
    lookup(keys::ORCHESTRATOR_DATA_DIR).map(PathBuf::from)
}

#[must_use]
pub fn rust_log() -> Option<String> {
    lookup(keys::RUST_LOG)
}
