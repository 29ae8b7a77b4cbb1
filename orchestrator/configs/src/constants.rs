/// The only region test runs may be submitted to.
pub const SUPPORTED_REGION: &str = "us-east-1";

/// Region used when neither the submission nor the environment names one.
pub const DEFAULT_TESTS_REGION: &str = SUPPORTED_REGION;

/// Object-store prefix under which scenario blobs are written.
pub const SCENARIO_KEY_PREFIX: &str = "test-scenarios";

/// Path inside the worker container where the XML summary is dumped.
pub const RESULTS_XML_PATH: &str = "/tmp/artifacts/results.xml";

/// Default HTTP port of the orchestrator service.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default directory for the filesystem object store used in local mode.
pub const DEFAULT_DATA_DIR: &str = ".tmp/orchestrator";

/// Object key of the scenario blob for a run.
#[must_use]
pub fn scenario_object_key(test_id: &str, region: &str) -> String {
    format!("{SCENARIO_KEY_PREFIX}/{test_id}-{region}.json")
}
