pub mod error;
pub mod local;
pub mod server;

pub use error::ApiError;
pub use local::LocalBackends;
pub use server::{AppState, SubmitResponse, orchestrator_app};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Install the fmt subscriber. `RUST_LOG` wins when it parses; repeated calls
/// are ignored so tests may share a process.
pub fn init_tracing() {
    let filter = orchestrator_env::rust_log()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
