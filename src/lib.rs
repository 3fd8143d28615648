//! Coupling analysis over a system dependence graph (SDG).
//!
//! Decides which architectural properties are violated by code pattern
//! violations: both are pinned to call-site vertices, the graph is reduced to
//! its data-causal edges, and a property counts as violated once a compatible
//! violation vertex reaches one of its vertices.
//!
//! ```
//! use coupling_core::prelude::*;
//!
//! let mut graph = DependenceGraph::new();
//! let call = graph.add_vertex(Vertex::new("c1", Some(VertexKind::Call), Some("ui.Page.render()".into()), 10));
//! let entry = graph.add_vertex(Vertex::new("e1", Some(VertexKind::Entr), Some("db.Pool.get()".into()), 1));
//! graph.add_edge(call, entry, EdgeKind::Cl).unwrap();
//!
//! let mut properties = vec![ArchitectureProperty::call(
//!     "ui must not reach db",
//!     "forbidden-call",
//!     LocationPattern::prefix("ui."),
//!     LocationPattern::prefix("db."),
//! )];
//! let violations = vec![PatternViolation::new(
//!     "unclosed connection",
//!     "resource-leak",
//!     LocationPattern::prefix("ui."),
//!     [10],
//! )];
//! let table = CompatibilityTable::new().allow("forbidden-call", "resource-leak");
//!
//! let report = CouplingAnalysis::default()
//!     .run(&mut properties, &violations, &mut graph, &table)
//!     .unwrap();
//! assert_eq!(report.violated, vec![PropertyId(0)]);
//! ```

pub mod core;
pub mod mapping;

pub use crate::core::analysis::{AnalysisConfig, AnalysisReport, CouplingAnalysis};
pub use crate::core::graph::{DependenceGraph, Edge, GraphError, Vertex};
pub use crate::mapping::loader::{LoadError, LoadedAnalysis};

pub mod prelude {
    pub use crate::core::analysis::{AnalysisConfig, AnalysisReport, CouplingAnalysis};
    pub use crate::core::annotate::Annotation;
    pub use crate::core::graph::{DependenceGraph, Edge, GraphError, Vertex};
    pub use crate::core::mapper::ViolationMapper;
    pub use crate::core::observer::{AnalysisObserver, NoopObserver, TracingObserver};
    pub use crate::core::property::{ArchitectureProperty, LocationPattern, LocationRule, PatternViolation, PropertyKind};
    pub use crate::core::reach::{PathFinder, ReachabilityCache, ShortestPath};
    pub use crate::core::reduce::ReductionSummary;
    pub use crate::core::types::{EdgeId, EdgeKind, Location, PropertyId, VertexId, VertexKind, ViolationId};
    pub use crate::mapping::compatibility::{CompatibilityTable, PropertyViolationMapping};
    pub use crate::mapping::loader::{AnalysisDocument, LoadError, LoadedAnalysis};
}
