use std::collections::BTreeMap;

use orchestrator_config::constants::RESULTS_XML_PATH;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ValidationError;

/// One entry of the scenario's `execution` list. Keys the orchestrator does
/// not interpret are kept in `extra` and written back untouched. Sizing keys
/// are taken as-is from the caller and overwritten by `stamp_sizing`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ExecutionBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(
        rename = "hold-for",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hold_for: Option<String>,
    #[serde(rename = "ramp-up", default, skip_serializing_if = "Option::is_none")]
    pub ramp_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The load-test definition handed to the worker fleet.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ScenarioDefinition {
    #[serde(default)]
    pub execution: Vec<ExecutionBlock>,
    #[serde(default)]
    pub scenarios: BTreeMap<String, Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reporting module every run gets: a final summary plus an XML dump the
/// workers upload with their results.
#[must_use]
pub fn final_stats_reporting() -> Value {
    json!({
        "module": "final-stats",
        "summary": true,
        "percentiles": true,
        "summary-labels": true,
        "test-duration": true,
        "dump-xml": RESULTS_XML_PATH,
    })
}

impl ScenarioDefinition {
    pub fn primary_execution(&self) -> Result<&ExecutionBlock, ValidationError> {
        self.execution
            .first()
            .ok_or(ValidationError::MissingExecutionBlock)
    }

    pub fn primary_execution_mut(&mut self) -> Result<&mut ExecutionBlock, ValidationError> {
        self.execution
            .first_mut()
            .ok_or(ValidationError::MissingExecutionBlock)
    }

    /// Replace the `variables` map of an existing named scenario.
    pub fn inject_variables(
        &mut self,
        scenario: &str,
        variables: Map<String, Value>,
    ) -> Result<(), ValidationError> {
        let entry =
            self.scenarios
                .get_mut(scenario)
                .ok_or_else(|| ValidationError::ScenarioNotFound {
                    name: scenario.to_owned(),
                })?;
        entry.insert("variables".to_owned(), Value::Object(variables));
        Ok(())
    }

    /// Overwrite any caller reporting with the fixed summary block.
    pub fn apply_reporting(&mut self) {
        self.reporting = Some(vec![final_stats_reporting()]);
    }

    pub fn stamp_sizing(&mut self, task_count: u32, concurrency: u32) -> Result<(), ValidationError> {
        let execution = self.primary_execution_mut()?;
        execution.task_count = Some(Value::from(task_count));
        execution.concurrency = Some(Value::from(concurrency));
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
