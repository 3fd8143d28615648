// architecture properties + code pattern violations
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Location;

/// Opaque predicate over method locations, supplied by whoever declares the rule.
pub trait LocationRule: Send + Sync {
    fn matches(&self, location: &Location) -> bool;
}

impl<F> LocationRule for F
where
    F: Fn(&Location) -> bool + Send + Sync,
{
    fn matches(&self, location: &Location) -> bool {
        self(location)
    }
}

/// Data-driven rule: a location matches if it equals one of `exact`
/// or starts with one of `prefixes` (package / class prefixes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationPattern {
    pub exact: Vec<String>,
    pub prefixes: Vec<String>,
}

impl LocationPattern {
    pub fn exact(name: impl Into<String>) -> Self {
        Self { exact: vec![name.into()], prefixes: Vec::new() }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self { exact: Vec::new(), prefixes: vec![prefix.into()] }
    }
}

impl LocationRule for LocationPattern {
    fn matches(&self, location: &Location) -> bool {
        let loc = location.as_str();
        self.exact.iter().any(|e| e == loc) || self.prefixes.iter().any(|p| loc.starts_with(p.as_str()))
    }
}

pub enum PropertyKind {
    /// "component `caller` may (not) call component `callee`"
    Call {
        caller: Box<dyn LocationRule>,
        callee: Box<dyn LocationRule>,
    },
    /// any other rule; never attached to a program point, never violated here
    Structural,
}

/// A declared architectural rule.
///
/// `violated` starts out false and is only ever flipped once, by the mapper.
pub struct ArchitectureProperty {
    pub name: String,
    pub category: String,
    pub kind: PropertyKind,
    violated: bool,
}

impl ArchitectureProperty {
    pub fn call(
        name: impl Into<String>,
        category: impl Into<String>,
        caller: impl LocationRule + 'static,
        callee: impl LocationRule + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            kind: PropertyKind::Call { caller: Box::new(caller), callee: Box::new(callee) },
            violated: false,
        }
    }

    pub fn structural(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            kind: PropertyKind::Structural,
            violated: false,
        }
    }

    pub fn is_call_property(&self) -> bool {
        matches!(self.kind, PropertyKind::Call { .. })
    }

    pub fn is_caller(&self, location: &Location) -> bool {
        match &self.kind {
            PropertyKind::Call { caller, .. } => caller.matches(location),
            PropertyKind::Structural => false,
        }
    }

    pub fn is_callee(&self, location: &Location) -> bool {
        match &self.kind {
            PropertyKind::Call { callee, .. } => callee.matches(location),
            PropertyKind::Structural => false,
        }
    }

    pub fn is_violated(&self) -> bool {
        self.violated
    }

    /// Returns true only for the call that actually flipped the flag.
    pub fn mark_violated(&mut self) -> bool {
        if self.violated {
            return false;
        }
        self.violated = true;
        true
    }
}

impl fmt::Debug for ArchitectureProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_call_property() { "call" } else { "structural" };
        f.debug_struct("ArchitectureProperty")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("kind", &kind)
            .field("violated", &self.violated)
            .finish()
    }
}

/// A detected misuse at a specific call site (e.g. a wrong API usage).
pub struct PatternViolation {
    pub name: String,
    pub category: String,
    pub error_method: Box<dyn LocationRule>,
    pub affected_lines: BTreeSet<u32>,
}

impl PatternViolation {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        error_method: impl LocationRule + 'static,
        affected_lines: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            error_method: Box::new(error_method),
            affected_lines: affected_lines.into_iter().collect(),
        }
    }

    pub fn is_error_method(&self, location: &Location) -> bool {
        self.error_method.matches(location)
    }

    pub fn affects_line(&self, line: u32) -> bool {
        self.affected_lines.contains(&line)
    }
}

impl fmt::Debug for PatternViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternViolation")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("affected_lines", &self.affected_lines)
            .finish()
    }
}
