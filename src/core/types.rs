// tag vocabulary of the dependence graph + identities
use std::fmt;

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

pub type VertexId = NodeIndex;
pub type EdgeId = EdgeIndex;

/// Position of a property in the property list handed to the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub usize);

/// Position of a violation in the violation list handed to the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViolationId(pub usize);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

impl fmt::Display for ViolationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "violation#{}", self.0)
    }
}

/// Vertex tags produced by the SDG builder. Only CALL, ENTR and ACTI matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VertexKind {
    /// call site statement
    Call,
    /// method entry
    Entr,
    /// actual-in parameter binding
    Acti,
    Acto,
    Frmi,
    Frmo,
    Exit,
    Expr,
    Pred,
    Norm,
    Sync,
    Fold,
    /// any tag this crate does not know; never matched
    #[serde(other)]
    Other,
}

/// Edge tags produced by the SDG builder. CL, PS and DD carry meaning, the rest is noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeKind {
    /// call edge, call vertex -> entry of the invoked method
    Cl,
    /// parameter summary
    Ps,
    /// data dependence
    Dd,
    Cd,
    Cf,
    Pi,
    Po,
    Su,
    Dh,
    Da,
    He,
    Un,
    Rf,
    Jf,
    Nf,
    /// any tag this crate does not know; dropped by the reducer
    #[serde(other)]
    Other,
}

impl EdgeKind {
    //the only kind the reducer keeps untouched
    pub fn is_data_dependence(self) -> bool {
        self == EdgeKind::Dd
    }
}

/// Enclosing method of a program point, e.g. `com.acme.ui.LoginPage.submit()`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
