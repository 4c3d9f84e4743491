//! Unknowns solved for at each mesh point.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named field components solved for at each mesh point, plus auxiliary
/// (material-parameter) variables carried alongside them.
///
/// Component order is declaration order and is semantic: it fixes the
/// layout of the solution vector the generated hooks see.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unknowns {
    /// Component name to vector width, in declaration order.
    components: IndexMap<String, u32>,
    /// Auxiliary variables appended after the unknowns.
    auxiliary_variables: u32,
}

impl Unknowns {
    /// Empty set of unknowns. Chain [`Unknowns::with`] to populate.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single unnamed block of `count` unknowns, for solvers that do not
    /// name their components.
    pub fn block(count: u32) -> Self {
        Self::new().with("Q", count)
    }

    /// Appends a named component of the given vector width.
    pub fn with(mut self, name: impl Into<String>, width: u32) -> Self {
        self.components.insert(name.into(), width);
        self
    }

    /// Sets the auxiliary variable count.
    pub fn auxiliary(mut self, count: u32) -> Self {
        self.auxiliary_variables = count;
        self
    }

    /// Builds from an already-ordered component map.
    pub fn from_components(components: IndexMap<String, u32>, auxiliary_variables: u32) -> Self {
        Self {
            components,
            auxiliary_variables,
        }
    }

    /// Component name to width, in declaration order.
    pub fn components(&self) -> &IndexMap<String, u32> {
        &self.components
    }

    /// Auxiliary variable count.
    pub fn auxiliary_variables(&self) -> u32 {
        self.auxiliary_variables
    }

    /// Total unknown count: the sum of all component widths.
    pub fn total(&self) -> u32 {
        self.components.values().sum()
    }

    /// Whether no components were declared.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sums_widths() {
        let unknowns = Unknowns::new().with("p", 1).with("v", 2);
        assert_eq!(unknowns.total(), 3);
        assert_eq!(unknowns.auxiliary_variables(), 0);
    }

    #[test]
    fn test_block_is_single_component() {
        let unknowns = Unknowns::block(4);
        assert_eq!(unknowns.total(), 4);
        assert_eq!(unknowns.components().len(), 1);
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let unknowns = Unknowns::new().with("h", 1).with("hu", 2).with("b", 1);
        let names: Vec<&str> = unknowns.components().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["h", "hu", "b"]);
    }

    #[test]
    fn test_auxiliary_count() {
        let unknowns = Unknowns::block(5).auxiliary(2);
        assert_eq!(unknowns.total(), 5);
        assert_eq!(unknowns.auxiliary_variables(), 2);
    }
}
