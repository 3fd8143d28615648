// full coupling analysis: annotate -> reduce -> map
use serde::{Deserialize, Serialize};
use tracing::info_span;

use crate::core::graph::{DependenceGraph, GraphError};
use crate::core::mapper::ViolationMapper;
use crate::core::observer::{AnalysisObserver, TracingObserver};
use crate::core::property::{ArchitectureProperty, PatternViolation};
use crate::core::reach::{PathFinder, ReachabilityCache, ShortestPath};
use crate::core::reduce::ReductionSummary;
use crate::core::types::PropertyId;
use crate::mapping::compatibility::PropertyViolationMapping;

/// Tunables for a run. Every field is optional, missing fields take the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Memoise one BFS per violation vertex instead of one query per pair. Default: false.
    pub cache_reachability: Option<bool>,
}

impl AnalysisConfig {
    pub fn effective_cache_reachability(&self) -> bool {
        self.cache_reachability.unwrap_or(false)
    }
}

/// Outcome of one run. `violated` agrees with `is_violated()` on the property list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub violated: Vec<PropertyId>,
    /// vertex indices carrying properties / violations
    pub property_vertices: Vec<usize>,
    pub violation_vertices: Vec<usize>,
    pub reduction: ReductionSummary,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.violated.is_empty()
    }

    pub fn violated_properties<'p>(
        &self,
        properties: &'p [ArchitectureProperty],
    ) -> impl Iterator<Item = &'p ArchitectureProperty> {
        self.violated.iter().filter_map(move |pid| properties.get(pid.0))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CouplingAnalysis {
    config: AnalysisConfig,
}

impl CouplingAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs the pipeline and logs progress through `tracing`.
    pub fn run(
        &self,
        properties: &mut [ArchitectureProperty],
        violations: &[PatternViolation],
        graph: &mut DependenceGraph,
        mapping: &dyn PropertyViolationMapping,
    ) -> Result<AnalysisReport, GraphError> {
        self.run_with_observer(properties, violations, graph, mapping, &TracingObserver)
    }

    /// Annotates and reduces `graph` in place, then marks violated properties.
    /// The graph is left reduced afterwards.
    pub fn run_with_observer(
        &self,
        properties: &mut [ArchitectureProperty],
        violations: &[PatternViolation],
        graph: &mut DependenceGraph,
        mapping: &dyn PropertyViolationMapping,
        observer: &dyn AnalysisObserver,
    ) -> Result<AnalysisReport, GraphError> {
        let _span = info_span!(
            "coupling_analysis",
            properties = properties.len(),
            violations = violations.len(),
            vertices = graph.vertex_count(),
        )
        .entered();

        let annotation = graph.annotate(properties, violations, observer);

        let reduction = graph.reduce_for_mapping()?;
        observer.on_graph_reduced(&reduction);

        let mut cache;
        let mut direct = ShortestPath;
        let paths: &mut dyn PathFinder = if self.config.effective_cache_reachability() {
            cache = ReachabilityCache::new();
            &mut cache
        } else {
            &mut direct
        };

        let violated = ViolationMapper::new(mapping, paths, observer).map(
            graph,
            &annotation.violation_vertices,
            &annotation.property_vertices,
            properties,
            violations,
        )?;

        Ok(AnalysisReport {
            violated,
            property_vertices: annotation.property_vertices.iter().map(|v| v.index()).collect(),
            violation_vertices: annotation.violation_vertices.iter().map(|v| v.index()).collect(),
            reduction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Vertex;
    use crate::core::observer::NoopObserver;
    use crate::core::property::LocationPattern;
    use crate::core::types::{EdgeKind, Location, VertexId, VertexKind};
    use crate::mapping::compatibility::CompatibilityTable;

    fn mk_vertex(label: &str, kind: VertexKind, loc: &str, line: u32) -> Vertex {
        Vertex::new(label, Some(kind), Some(Location::from(loc)), line)
    }

    // c1: CALL in locX line 10 --CL--> e1: ENTR locY
    fn mk_graph() -> (DependenceGraph, VertexId, VertexId) {
        let mut g = DependenceGraph::new();
        let c1 = g.add_vertex(mk_vertex("c1", VertexKind::Call, "locX", 10));
        let e1 = g.add_vertex(mk_vertex("e1", VertexKind::Entr, "locY", 1));
        g.add_edge(c1, e1, EdgeKind::Cl).unwrap();
        (g, c1, e1)
    }

    fn mk_inputs(lines: &[u32]) -> (Vec<ArchitectureProperty>, Vec<PatternViolation>, CompatibilityTable) {
        let props = vec![ArchitectureProperty::call(
            "P",
            "call",
            LocationPattern::exact("locX"),
            LocationPattern::exact("locY"),
        )];
        let viols = vec![PatternViolation::new("V", "misuse", LocationPattern::exact("locX"), lines.iter().copied())];
        (props, viols, CompatibilityTable::new().allow("call", "misuse"))
    }

    #[test]
    fn same_vertex_counts_as_reachable() {
        let (mut g, c1, _) = mk_graph();
        let (mut props, viols, table) = mk_inputs(&[10]);

        let report = CouplingAnalysis::default()
            .run_with_observer(&mut props, &viols, &mut g, &table, &NoopObserver)
            .unwrap();

        assert_eq!(report.violated, vec![PropertyId(0)]);
        assert!(props[0].is_violated());
        assert_eq!(report.property_vertices, vec![c1.index()]);
        assert_eq!(report.violation_vertices, vec![c1.index()]);
        //the CL edge is gone after reduction
        assert_eq!(report.reduction, ReductionSummary { removed: 1, flipped: 0, retained: 0 });
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn unaffected_line_leaves_property_intact() {
        let (mut g, _, _) = mk_graph();
        let (mut props, viols, table) = mk_inputs(&[99]);

        let report = CouplingAnalysis::default()
            .run_with_observer(&mut props, &viols, &mut g, &table, &NoopObserver)
            .unwrap();

        assert!(report.is_clean());
        assert!(report.violation_vertices.is_empty());
        assert!(!props[0].is_violated());
    }

    #[test]
    fn cached_run_gives_same_answer() {
        let (mut g1, _, _) = mk_graph();
        let (mut g2, _, _) = mk_graph();
        let (mut p1, v1, t1) = mk_inputs(&[10]);
        let (mut p2, v2, t2) = mk_inputs(&[10]);

        let plain = CouplingAnalysis::default().run(&mut p1, &v1, &mut g1, &t1).unwrap();
        let cached = CouplingAnalysis::new(AnalysisConfig { cache_reachability: Some(true) })
            .run(&mut p2, &v2, &mut g2, &t2)
            .unwrap();

        assert_eq!(plain, cached);
    }

    #[test]
    fn report_resolves_property_names() {
        let (mut g, _, _) = mk_graph();
        let (mut props, viols, table) = mk_inputs(&[10]);

        let report = CouplingAnalysis::default().run(&mut props, &viols, &mut g, &table).unwrap();

        let names: Vec<&str> = report.violated_properties(&props).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P"]);
    }

    #[test]
    fn config_defaults() {
        assert!(!AnalysisConfig::default().effective_cache_reachability());
        assert!(AnalysisConfig { cache_reachability: Some(true) }.effective_cache_reachability());
    }
}
