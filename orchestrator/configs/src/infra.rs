use serde::{Deserialize, Serialize};

/// Region-specific infrastructure record, as stored in the region infra
/// table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegionInfra {
    pub subnet: String,
    pub cluster: String,
    pub task_definition: String,
    pub task_container: String,
}
