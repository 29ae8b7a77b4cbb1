use std::sync::Arc;

use tracing::{Instrument as _, Span, debug, info_span, warn};

use crate::{
    collaborators::InfraTable,
    error::{ConfigurationError, DependencyError, OrchestratorError},
    payload::TaskConfig,
};

/// Merges a region's infrastructure record into a run's task configuration.
#[derive(Clone)]
pub struct InfraResolver {
    table: Arc<dyn InfraTable>,
    table_name: String,
    span: Span,
}

impl InfraResolver {
    pub fn new(table: Arc<dyn InfraTable>, table_name: impl Into<String>) -> Self {
        Self {
            table,
            table_name: table_name.into(),
            span: info_span!("infra_resolver"),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Fill `subnet`, `cluster`, `task_definition` and `container_name` from
    /// the region's record. Sizing fields are left alone.
    pub async fn resolve_into(
        &self,
        region: &str,
        config: &mut TaskConfig,
    ) -> Result<(), OrchestratorError> {
        self.lookup_and_merge(region, config)
            .instrument(self.span.clone())
            .await
    }

    async fn lookup_and_merge(
        &self,
        region: &str,
        config: &mut TaskConfig,
    ) -> Result<(), OrchestratorError> {
        let infra = self
            .table
            .region_infra(&self.table_name, region)
            .await
            .map_err(|source| {
                warn!(region, error = %source, "region infra lookup failed");
                DependencyError::new("get_region_infra", source)
            })?
            .ok_or_else(|| ConfigurationError::RegionNotConfigured {
                region: region.to_owned(),
            })?;

        debug!(region, cluster = %infra.cluster, "resolved region infra");

        config.subnet = infra.subnet;
        config.cluster = infra.cluster;
        config.task_definition = infra.task_definition;
        config.container_name = infra.task_container;
        Ok(())
    }
}
