// dependence graph model
use std::collections::BTreeSet;

use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;

use crate::core::types::{EdgeId, EdgeKind, Location, PropertyId, VertexId, VertexKind, ViolationId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexId),

    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    #[error("unknown architecture property: {0}")]
    UnknownProperty(PropertyId),

    #[error("unknown pattern violation: {0}")]
    UnknownViolation(ViolationId),
}

/// A single program point.
///
/// `properties` and `violations` are filled by the annotator only, and only ever grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub label: String,
    pub kind: Option<VertexKind>,
    pub location: Option<Location>,
    pub source_line: u32,
    pub properties: BTreeSet<PropertyId>,
    pub violations: BTreeSet<ViolationId>,
}

impl Vertex {
    pub fn new(
        label: impl Into<String>,
        kind: Option<VertexKind>,
        location: Option<Location>,
        source_line: u32,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            location,
            source_line,
            properties: BTreeSet::new(),
            violations: BTreeSet::new(),
        }
    }

    pub fn is_kind(&self, kind: VertexKind) -> bool {
        self.kind == Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub kind: EdgeKind,
}

/// Directed multigraph over program points, as delivered by the SDG builder.
///
/// Stable indices: removing an edge never invalidates other vertex/edge ids.
#[derive(Debug, Clone, Default)]
pub struct DependenceGraph {
    pub(crate) graph: StableDiGraph<Vertex, Edge>,
}

impl DependenceGraph {
    pub fn new() -> Self {
        Self { graph: StableDiGraph::new() }
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        self.graph.add_node(vertex)
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, kind: EdgeKind) -> Result<EdgeId, GraphError> {
        //petgraph panics on dangling endpoints, check first
        if !self.graph.contains_node(from) {
            return Err(GraphError::VertexNotFound(from));
        }
        if !self.graph.contains_node(to) {
            return Err(GraphError::VertexNotFound(to));
        }
        Ok(self.graph.add_edge(from, to, Edge { kind }))
    }

    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Result<Edge, GraphError> {
        self.graph.remove_edge(edge_id).ok_or(GraphError::EdgeNotFound(edge_id))
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.graph.node_weight(id).ok_or(GraphError::VertexNotFound(id))
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex, GraphError> {
        self.graph.node_weight_mut(id).ok_or(GraphError::VertexNotFound(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.graph.edge_weight(id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// (source, target) of an edge.
    pub fn edge_endpoints(&self, id: EdgeId) -> Result<(VertexId, VertexId), GraphError> {
        self.graph.edge_endpoints(id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// Outgoing edges of `id` as (edge, target, kind).
    pub fn outgoing_edges(&self, id: VertexId) -> impl Iterator<Item = (EdgeId, VertexId, EdgeKind)> + '_ {
        self.graph
            .edges_directed(id, Direction::Outgoing)
            .map(|e| (e.id(), e.target(), e.weight().kind))
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.graph.node_indices().map(move |id| (id, &self.graph[id]))
    }

    /// All edges as (edge, source, target, kind).
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, VertexId, VertexId, EdgeKind)> + '_ {
        (&self.graph)
            .edge_references()
            .map(|e| (e.id(), e.source(), e.target(), e.weight().kind))
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = (EdgeId, VertexId, VertexId)> + '_ {
        self.edges()
            .filter(move |&(_, _, _, k)| k == kind)
            .map(|(id, from, to, _)| (id, from, to))
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId, kind: EdgeKind) -> bool {
        self.graph
            .edges_directed(from, Direction::Outgoing)
            .any(|e| e.target() == to && e.weight().kind == kind)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
