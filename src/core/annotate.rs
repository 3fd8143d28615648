// attach properties and violations to the call sites they apply to
use std::collections::HashSet;

use crate::core::graph::DependenceGraph;
use crate::core::observer::AnalysisObserver;
use crate::core::property::{ArchitectureProperty, PatternViolation};
use crate::core::types::{EdgeKind, Location, PropertyId, VertexId, VertexKind, ViolationId};

/// Vertices that carry at least one property / violation, in discovery order, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub property_vertices: Vec<VertexId>,
    pub violation_vertices: Vec<VertexId>,
}

impl DependenceGraph {
    /// Annotate properties first, then violations. Topology is left untouched.
    pub fn annotate(
        &mut self,
        properties: &[ArchitectureProperty],
        violations: &[PatternViolation],
        observer: &dyn AnalysisObserver,
    ) -> Annotation {
        let property_vertices = self.annotate_properties(properties, observer);
        let violation_vertices = self.annotate_violations(violations, observer);
        Annotation { property_vertices, violation_vertices }
    }

    /// Attach every call property to the CALL vertices where a caller invokes a callee.
    /// Non-call properties are skipped.
    pub fn annotate_properties(
        &mut self,
        properties: &[ArchitectureProperty],
        observer: &dyn AnalysisObserver,
    ) -> Vec<VertexId> {
        let mut annotated = Vec::new();
        let mut seen = HashSet::new();

        for (idx, property) in properties.iter().enumerate() {
            if !property.is_call_property() {
                continue;
            }
            let pid = PropertyId(idx);

            //scan read-only first, then write the vertex payloads
            let sites = self.property_sites(property);
            for vid in sites {
                if let Some(v) = self.graph.node_weight_mut(vid) {
                    if v.properties.insert(pid) {
                        observer.on_property_mapped(pid, vid);
                    }
                }
                if seen.insert(vid) {
                    annotated.push(vid);
                }
            }
        }
        annotated
    }

    /// Attach every violation to the CALL vertices inside its error method whose
    /// own source line is affected. The callee only has to be some method entry.
    pub fn annotate_violations(
        &mut self,
        violations: &[PatternViolation],
        observer: &dyn AnalysisObserver,
    ) -> Vec<VertexId> {
        let mut annotated = Vec::new();
        let mut seen = HashSet::new();

        for (idx, violation) in violations.iter().enumerate() {
            let violation_id = ViolationId(idx);

            let sites = self.violation_sites(violation);
            for vid in sites {
                if let Some(v) = self.graph.node_weight_mut(vid) {
                    if v.violations.insert(violation_id) {
                        observer.on_violation_mapped(violation_id, vid);
                    }
                }
                if seen.insert(vid) {
                    annotated.push(vid);
                }
            }
        }
        annotated
    }

    fn property_sites(&self, property: &ArchitectureProperty) -> Vec<VertexId> {
        self.call_sites(|loc| property.is_caller(loc))
            .filter(|&vid| self.calls_entry(vid, |callee| callee.is_some_and(|l| property.is_callee(l))))
            .collect()
    }

    fn violation_sites(&self, violation: &PatternViolation) -> Vec<VertexId> {
        self.call_sites(|loc| violation.is_error_method(loc))
            .filter(|&vid| {
                //callee identity is not checked, any ENTR target will do
                self.calls_entry(vid, |_| true)
                    && self
                        .graph
                        .node_weight(vid)
                        .is_some_and(|v| violation.affects_line(v.source_line))
            })
            .collect()
    }

    //CALL vertices with a location accepted by `in_method`
    fn call_sites<'a>(
        &'a self,
        in_method: impl Fn(&Location) -> bool + 'a,
    ) -> impl Iterator<Item = VertexId> + 'a {
        self.vertices().filter_map(move |(vid, v)| {
            let loc = v.location.as_ref()?;
            (v.is_kind(VertexKind::Call) && in_method(loc)).then_some(vid)
        })
    }

    //does `call` have a CL edge into an ENTR vertex whose location passes `callee`?
    fn calls_entry(&self, call: VertexId, callee: impl Fn(Option<&Location>) -> bool) -> bool {
        self.outgoing_edges(call)
            .filter(|&(_, _, kind)| kind == EdgeKind::Cl)
            .filter_map(|(_, target, _)| self.graph.node_weight(target))
            .any(|t| t.is_kind(VertexKind::Entr) && callee(t.location.as_ref()))
    }
}
