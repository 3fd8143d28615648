// which violation categories can break which property categories
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::property::{ArchitectureProperty, PatternViolation};

/// Oracle deciding whether a code violation can, in principle, violate a property.
pub trait PropertyViolationMapping {
    fn is_compatible(&self, property: &ArchitectureProperty, violation: &PatternViolation) -> bool;
}

impl<F> PropertyViolationMapping for F
where
    F: Fn(&ArchitectureProperty, &PatternViolation) -> bool,
{
    fn is_compatible(&self, property: &ArchitectureProperty, violation: &PatternViolation) -> bool {
        self(property, violation)
    }
}

/// Static table: property category -> violation categories that may violate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl CompatibilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    //builder style, the table is written once and then only read
    pub fn allow(mut self, property_category: impl Into<String>, violation_category: impl Into<String>) -> Self {
        self.insert(property_category, violation_category);
        self
    }

    pub fn insert(&mut self, property_category: impl Into<String>, violation_category: impl Into<String>) {
        self.entries
            .entry(property_category.into())
            .or_default()
            .insert(violation_category.into());
    }

    pub fn allows(&self, property_category: &str, violation_category: &str) -> bool {
        self.entries
            .get(property_category)
            .is_some_and(|cats| cats.contains(violation_category))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyViolationMapping for CompatibilityTable {
    fn is_compatible(&self, property: &ArchitectureProperty, violation: &PatternViolation) -> bool {
        self.allows(&property.category, &violation.category)
    }
}
