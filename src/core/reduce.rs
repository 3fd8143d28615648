// graph reduction: keep data causality only, oriented violation -> property
use serde::Serialize;

use crate::core::graph::{DependenceGraph, GraphError};
use crate::core::types::{EdgeId, EdgeKind, VertexKind};

/// Counts of what one reduction pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReductionSummary {
    pub removed: usize,
    pub flipped: usize,
    pub retained: usize,
}

/// Edge sets computed before anything is mutated.
#[derive(Debug, Default)]
struct ReductionPlan {
    remove: Vec<EdgeId>,
    flip: Vec<EdgeId>,
    retained: usize,
}

impl DependenceGraph {
    /// Reduce the graph in place for causal path queries:
    /// - PS edges into an ACTI vertex are reversed (still PS)
    /// - every other edge that is not DD or PS is dropped
    /// - DD edges and the remaining PS edges stay as they are
    ///
    /// Meant to run once per analysis. A second pass finds nothing to do, except
    /// for PS edges between two ACTI vertices, which are reversed again.
    pub fn reduce_for_mapping(&mut self) -> Result<ReductionSummary, GraphError> {
        let plan = self.plan_reduction();

        //removals first, then flips
        for &eid in &plan.remove {
            self.remove_edge(eid)?;
        }

        for &eid in &plan.flip {
            let (source, target) = self.edge_endpoints(eid)?;
            self.add_edge(target, source, EdgeKind::Ps)?;
            self.remove_edge(eid)?;
        }

        Ok(ReductionSummary {
            removed: plan.remove.len(),
            flipped: plan.flip.len(),
            retained: plan.retained,
        })
    }

    fn plan_reduction(&self) -> ReductionPlan {
        let mut plan = ReductionPlan::default();

        for (eid, _, target, kind) in self.edges() {
            match kind {
                EdgeKind::Ps => {
                    let into_actual_in = self
                        .graph
                        .node_weight(target)
                        .is_some_and(|t| t.is_kind(VertexKind::Acti));
                    if into_actual_in {
                        plan.flip.push(eid);
                    } else {
                        plan.retained += 1;
                    }
                }
                k if k.is_data_dependence() => plan.retained += 1,
                _ => plan.remove.push(eid),
            }
        }
        plan
    }
}
