/*
Inputs (one TOON document):

    vertices       program points of the SDG (id, kind, location, line)
    edges          dependences between them (from, to, kind)
    properties     architecture rules, caller/callee as location patterns
    violations     code pattern violations (error method + affected lines)
    compatibility  which violation categories can break which property categories
    config         optional analysis tunables

Output: a ready-to-run LoadedAnalysis. Vertex ids are only names inside the
document, the graph gets its own indices.
*/
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::analysis::{AnalysisConfig, AnalysisReport, CouplingAnalysis};
use crate::core::graph::{DependenceGraph, GraphError, Vertex};
use crate::core::observer::AnalysisObserver;
use crate::core::property::{ArchitectureProperty, LocationPattern, PatternViolation};
use crate::core::types::{EdgeKind, Location, VertexId, VertexKind};
use crate::mapping::compatibility::CompatibilityTable;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed TOON document: {0}")]
    Decode(String),

    #[error("failed to encode TOON: {0}")]
    Encode(String),

    #[error("duplicate vertex id: {0}")]
    DuplicateVertex(String),

    #[error("edge references unknown vertex: {0}")]
    UnknownVertex(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: String,
    pub kind: Option<VertexKind>,
    pub location: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyRecordKind {
    #[default]
    Call,
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub kind: PropertyRecordKind,
    #[serde(default)]
    pub caller: LocationPattern,
    #[serde(default)]
    pub callee: LocationPattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub error_method: LocationPattern,
    #[serde(default)]
    pub lines: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRecord {
    pub property: String,
    pub violation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDocument {
    pub config: AnalysisConfig,
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
    pub properties: Vec<PropertyRecord>,
    pub violations: Vec<ViolationRecord>,
    pub compatibility: Vec<CompatibilityRecord>,
}

/// Everything a run needs, built from an [`AnalysisDocument`].
#[derive(Debug)]
pub struct LoadedAnalysis {
    pub config: AnalysisConfig,
    pub graph: DependenceGraph,
    pub vertex_ids: HashMap<String, VertexId>,
    pub properties: Vec<ArchitectureProperty>,
    pub violations: Vec<PatternViolation>,
    pub compatibility: CompatibilityTable,
}

pub fn load_document(src: &str) -> Result<AnalysisDocument, LoadError> {
    toon_format::decode_default(src).map_err(|e| LoadError::Decode(e.to_string()))
}

pub fn load_config(src: &str) -> Result<AnalysisConfig, LoadError> {
    toon_format::decode_default(src).map_err(|e| LoadError::Decode(e.to_string()))
}

pub fn encode_report(report: &AnalysisReport) -> Result<String, LoadError> {
    toon_format::encode_default(report).map_err(|e| LoadError::Encode(e.to_string()))
}

impl AnalysisDocument {
    pub fn into_analysis(self) -> Result<LoadedAnalysis, LoadError> {
        let mut graph = DependenceGraph::new();
        let mut vertex_ids = HashMap::with_capacity(self.vertices.len());

        for rec in self.vertices {
            if vertex_ids.contains_key(&rec.id) {
                return Err(LoadError::DuplicateVertex(rec.id));
            }
            let vid = graph.add_vertex(Vertex::new(
                rec.id.clone(),
                rec.kind,
                rec.location.map(Location::new),
                rec.line,
            ));
            vertex_ids.insert(rec.id, vid);
        }

        for rec in self.edges {
            let from = lookup(&vertex_ids, &rec.from)?;
            let to = lookup(&vertex_ids, &rec.to)?;
            graph.add_edge(from, to, rec.kind)?;
        }

        let properties = self
            .properties
            .into_iter()
            .map(|rec| match rec.kind {
                PropertyRecordKind::Call => ArchitectureProperty::call(rec.name, rec.category, rec.caller, rec.callee),
                PropertyRecordKind::Structural => ArchitectureProperty::structural(rec.name, rec.category),
            })
            .collect();

        let violations = self
            .violations
            .into_iter()
            .map(|rec| PatternViolation::new(rec.name, rec.category, rec.error_method, rec.lines))
            .collect();

        let mut compatibility = CompatibilityTable::new();
        for rec in self.compatibility {
            compatibility.insert(rec.property, rec.violation);
        }

        Ok(LoadedAnalysis {
            config: self.config,
            graph,
            vertex_ids,
            properties,
            violations,
            compatibility,
        })
    }
}

fn lookup(ids: &HashMap<String, VertexId>, id: &str) -> Result<VertexId, LoadError> {
    ids.get(id).copied().ok_or_else(|| LoadError::UnknownVertex(id.to_string()))
}

impl LoadedAnalysis {
    pub fn from_toon(src: &str) -> Result<Self, LoadError> {
        load_document(src)?.into_analysis()
    }

    pub fn vertex(&self, id: &str) -> Option<VertexId> {
        self.vertex_ids.get(id).copied()
    }

    pub fn run(&mut self, observer: &dyn AnalysisObserver) -> Result<AnalysisReport, GraphError> {
        CouplingAnalysis::new(self.config.clone()).run_with_observer(
            &mut self.properties,
            &self.violations,
            &mut self.graph,
            &self.compatibility,
            observer,
        )
    }
}
