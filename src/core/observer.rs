// progress hooks; the algorithms report here instead of printing
use tracing::{debug, info};

use crate::core::reduce::ReductionSummary;
use crate::core::types::{PropertyId, VertexId, ViolationId};

/// Every hook has a no-op default, implement only what you need.
pub trait AnalysisObserver {
    /// A call-site vertex received an architecture property.
    fn on_property_mapped(&self, _property: PropertyId, _vertex: VertexId) {}

    /// A call-site vertex received a pattern violation.
    fn on_violation_mapped(&self, _violation: ViolationId, _vertex: VertexId) {}

    fn on_graph_reduced(&self, _summary: &ReductionSummary) {}

    /// Mapping is about to start over the annotated vertices.
    fn on_mapping_started(&self, _violation_vertices: usize, _property_vertices: usize) {}

    /// A causal path was found and `property` is now violated.
    fn on_path_found(&self, _property: PropertyId, _violation: ViolationId, _path: &[VertexId]) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// Routes the hooks to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_property_mapped(&self, property: PropertyId, vertex: VertexId) {
        debug!(%property, vertex = vertex.index(), "mapped architecture property to vertex");
    }

    fn on_violation_mapped(&self, violation: ViolationId, vertex: VertexId) {
        debug!(%violation, vertex = vertex.index(), "mapped pattern violation to vertex");
    }

    fn on_graph_reduced(&self, summary: &ReductionSummary) {
        debug!(
            removed = summary.removed,
            flipped = summary.flipped,
            retained = summary.retained,
            "reduced dependence graph"
        );
    }

    fn on_mapping_started(&self, violation_vertices: usize, property_vertices: usize) {
        info!(violation_vertices, property_vertices, "mapping violations to properties");
    }

    fn on_path_found(&self, property: PropertyId, violation: ViolationId, path: &[VertexId]) {
        let hops: Vec<usize> = path.iter().map(|v| v.index()).collect();
        info!(%property, %violation, ?hops, "path found, property violated");
    }
}
