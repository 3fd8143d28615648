// violation -> property mapping over the reduced graph
use crate::core::graph::{DependenceGraph, GraphError};
use crate::core::observer::AnalysisObserver;
use crate::core::property::{ArchitectureProperty, PatternViolation};
use crate::core::reach::PathFinder;
use crate::core::types::{PropertyId, VertexId};
use crate::mapping::compatibility::PropertyViolationMapping;

/// Marks properties as violated when a compatible violation reaches one of their call sites.
pub struct ViolationMapper<'a> {
    mapping: &'a dyn PropertyViolationMapping,
    paths: &'a mut dyn PathFinder,
    observer: &'a dyn AnalysisObserver,
}

impl<'a> ViolationMapper<'a> {
    pub fn new(
        mapping: &'a dyn PropertyViolationMapping,
        paths: &'a mut dyn PathFinder,
        observer: &'a dyn AnalysisObserver,
    ) -> Self {
        Self { mapping, paths, observer }
    }

    /// Returns every property newly marked violated, each exactly once, in marking order.
    ///
    /// For a given property the first (violation vertex, violation) pair, in list order,
    /// that is compatible and has a path violation vertex -> property vertex wins.
    /// Properties already violated on entry are skipped and not returned.
    pub fn map(
        &mut self,
        graph: &DependenceGraph,
        violation_vertices: &[VertexId],
        property_vertices: &[VertexId],
        properties: &mut [ArchitectureProperty],
        violations: &[PatternViolation],
    ) -> Result<Vec<PropertyId>, GraphError> {
        self.observer
            .on_mapping_started(violation_vertices.len(), property_vertices.len());

        let mut violated = Vec::new();

        for &vp in property_vertices {
            for &pid in &graph.vertex(vp)?.properties {
                let property = properties.get(pid.0).ok_or(GraphError::UnknownProperty(pid))?;
                if property.is_violated() {
                    continue;
                }

                let mut hit = None;
                'vertices: for &vv in violation_vertices {
                    for &vid in &graph.vertex(vv)?.violations {
                        let violation = violations.get(vid.0).ok_or(GraphError::UnknownViolation(vid))?;
                        if !self.mapping.is_compatible(property, violation) {
                            continue;
                        }
                        match self.paths.find_path(graph, vv, vp) {
                            Some(path) => {
                                hit = Some((vid, path));
                                break 'vertices;
                            }
                            //reachability only depends on the vertex pair
                            None => continue 'vertices,
                        }
                    }
                }

                if let Some((vid, path)) = hit {
                    if properties[pid.0].mark_violated() {
                        self.observer.on_path_found(pid, vid, &path);
                        violated.push(pid);
                    }
                }
            }
        }
        Ok(violated)
    }
}
