// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Roster
//!
//! The immutable problem description consumed by the solving engine.
//!
//! A `Roster` fixes a single deterministic agent ordering for the duration of
//! a search: the k-th branching step of the engine always assigns the k-th
//! agent of the roster. Callers that hold their units in an unordered
//! structure must therefore go through the `RosterBuilder`, which freezes the
//! insertion order; the engine never re-derives an ordering mid-search.
//!
//! Construction validates eagerly: every agent's unit type must resolve to a
//! combat class through the supplied `UnitCatalog`, and every coordinate must
//! be finite. The solving engine can then index the roster without further
//! checks.

use crate::{
    catalog::{UnitCatalog, UnitClass, UnitTypeId},
    index::AgentIndex,
    position::Position,
};

/// Represents the theoretical search space size of the group-assignment tree.
///
/// For `N` agents and branch factor `B`, the depth-first tree has
/// $\sum_{k=0}^{N} B^k$ nodes. Since these numbers quickly exceed standard
/// integer limits, this struct stores the value in **Logarithmic Space**
/// ($\log_{10}$).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    /// The base-10 logarithm of the total node count.
    log_val: f64,
}

impl Complexity {
    /// Calculates the complexity for a given number of agents and groups.
    pub fn new(num_agents: usize, branch_factor: usize) -> Self {
        if num_agents == 0 || branch_factor == 0 {
            return Complexity { log_val: 0.0 }; // 1 node (root), log10(1) = 0
        }

        let b_log = (branch_factor as f64).log10();

        // Helper to compute log10(10^a + 10^b)
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            // Factor out 10^max: 10^max * (1 + 10^(min-max))
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        // 'current_level_log' tracks log10(B^k); level 0 has 1 node.
        let mut current_level_log = 0.0;
        let mut total_sum_log = 0.0;

        for _ in 1..=num_agents {
            current_level_log += b_log;
            total_sum_log = log10_add(total_sum_log, current_level_log);
        }

        Complexity {
            log_val: total_sum_log,
        }
    }

    /// Returns the percentage of the search space that was actually explored.
    /// Returns None if the space is too massive to represent as f64.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return Some(0.0);
        }

        let total_size = 10.0_f64.powf(self.log_val);
        if total_size == 0.0 {
            return None;
        }

        Some((nodes_explored as f64 / total_size) * 100.0)
    }

    /// Returns the exponent (order of magnitude).
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the mantissa (coefficient).
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let fractional_part = self.log_val - self.log_val.floor();
        10.0_f64.powf(fractional_part)
    }

    /// Returns the raw Log10 value. Useful for progress bars.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log10={:.4})", self.log_val)
    }
}

/// The error type for roster construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// An agent's unit type is not registered in the catalog.
    UnknownUnitType {
        agent: AgentIndex,
        unit_type: UnitTypeId,
    },
    /// An agent's position has a non-finite coordinate.
    NonFinitePosition { agent: AgentIndex },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::UnknownUnitType { agent, unit_type } => write!(
                f,
                "agent {} has unit type {} which is not in the catalog",
                agent, unit_type
            ),
            RosterError::NonFinitePosition { agent } => {
                write!(f, "agent {} has a non-finite position coordinate", agent)
            }
        }
    }
}

impl std::error::Error for RosterError {}

/// The immutable agent roster with its fixed ordering.
///
/// This struct holds all pre-validated, queryable data in SoA layout:
/// - `unit_types[agent]`: the host's opaque type identifier for each agent.
/// - `classes[agent]`: the combat class resolved through the catalog.
/// - `positions[agent]`: the agent's 2D position.
///
/// Construction:
/// - Use `RosterBuilder` and call `RosterBuilder::build` to obtain a validated `Roster`.
#[derive(Clone, Debug)]
pub struct Roster {
    unit_types: Vec<UnitTypeId>, // len = num_agents
    classes: Vec<UnitClass>,     // len = num_agents
    positions: Vec<Position>,    // len = num_agents
}

impl Roster {
    /// Returns the number of agents in the roster.
    #[inline]
    pub fn num_agents(&self) -> usize {
        self.unit_types.len()
    }

    /// Returns `true` if the roster contains no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.unit_types.is_empty()
    }

    /// Returns the complexity of the assignment tree for the given branch factor.
    #[inline]
    pub fn complexity(&self, branch_factor: usize) -> Complexity {
        Complexity::new(self.num_agents(), branch_factor)
    }

    /// Returns the unit type of an agent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `agent` is out of bounds.
    #[inline]
    pub fn unit_type(&self, agent: AgentIndex) -> UnitTypeId {
        let index = agent.get();
        debug_assert!(
            index < self.num_agents(),
            "called `Roster::unit_type` with agent index out of bounds: the len is {} but the index is {}",
            self.num_agents(),
            index
        );

        self.unit_types[index]
    }

    /// Returns the combat class of an agent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `agent` is out of bounds.
    #[inline]
    pub fn class(&self, agent: AgentIndex) -> UnitClass {
        let index = agent.get();
        debug_assert!(
            index < self.num_agents(),
            "called `Roster::class` with agent index out of bounds: the len is {} but the index is {}",
            self.num_agents(),
            index
        );

        self.classes[index]
    }

    /// Returns the position of an agent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `agent` is out of bounds.
    #[inline]
    pub fn position(&self, agent: AgentIndex) -> Position {
        let index = agent.get();
        debug_assert!(
            index < self.num_agents(),
            "called `Roster::position` with agent index out of bounds: the len is {} but the index is {}",
            self.num_agents(),
            index
        );

        self.positions[index]
    }

    /// Returns a slice of all unit types in roster order.
    #[inline]
    pub fn unit_types(&self) -> &[UnitTypeId] {
        &self.unit_types
    }

    /// Returns a slice of all combat classes in roster order.
    #[inline]
    pub fn classes(&self) -> &[UnitClass] {
        &self.classes
    }

    /// Returns a slice of all positions in roster order.
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

/// A builder that freezes a caller-provided agent sequence into a `Roster`.
///
/// Agents keep the order in which they were added; that order becomes the
/// branching order of the search. The builder itself never fails; all
/// validation happens in `build`, which reports the first offending agent.
#[derive(Clone, Debug)]
pub struct RosterBuilder {
    catalog: UnitCatalog,
    unit_types: Vec<UnitTypeId>,
    positions: Vec<Position>,
}

impl RosterBuilder {
    /// Creates a new `RosterBuilder` using the given unit catalog.
    #[inline]
    pub fn new(catalog: UnitCatalog) -> Self {
        Self {
            catalog,
            unit_types: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Creates a new `RosterBuilder` with preallocated storage for the given
    /// number of agents.
    #[inline]
    pub fn with_capacity(catalog: UnitCatalog, num_agents: usize) -> Self {
        Self {
            catalog,
            unit_types: Vec::with_capacity(num_agents),
            positions: Vec::with_capacity(num_agents),
        }
    }

    /// Appends an agent to the roster under construction and returns its index.
    #[inline]
    pub fn add_agent(&mut self, unit_type: UnitTypeId, position: Position) -> AgentIndex {
        let index = AgentIndex::new(self.unit_types.len());
        self.unit_types.push(unit_type);
        self.positions.push(position);
        index
    }

    /// Returns the number of agents added so far.
    #[inline]
    pub fn num_agents(&self) -> usize {
        self.unit_types.len()
    }

    /// Validates the collected agents and builds the `Roster`.
    ///
    /// Fails on the first agent whose unit type is missing from the catalog
    /// or whose position has a non-finite coordinate.
    pub fn build(self) -> Result<Roster, RosterError> {
        let mut classes = Vec::with_capacity(self.unit_types.len());

        for (index, (&unit_type, position)) in self
            .unit_types
            .iter()
            .zip(self.positions.iter())
            .enumerate()
        {
            let agent = AgentIndex::new(index);

            if !position.is_finite() {
                return Err(RosterError::NonFinitePosition { agent });
            }

            match self.catalog.class_of(unit_type) {
                Some(class) => classes.push(class),
                None => return Err(RosterError::UnknownUnitType { agent, unit_type }),
            }
        }

        Ok(Roster {
            unit_types: self.unit_types,
            classes,
            positions: self.positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> UnitCatalog {
        [
            (UnitTypeId::new(1), UnitClass::Infantry),
            (UnitTypeId::new(2), UnitClass::Grenadier),
            (UnitTypeId::new(3), UnitClass::Medic),
            (UnitTypeId::new(4), UnitClass::Artillery),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_build_preserves_insertion_order() {
        let mut builder = RosterBuilder::new(test_catalog());
        builder.add_agent(UnitTypeId::new(3), Position::new(1.0, 2.0));
        builder.add_agent(UnitTypeId::new(1), Position::new(3.0, 4.0));
        builder.add_agent(UnitTypeId::new(4), Position::new(5.0, 6.0));

        let roster = builder.build().expect("roster should validate");
        assert_eq!(roster.num_agents(), 3);
        assert_eq!(roster.class(AgentIndex::new(0)), UnitClass::Medic);
        assert_eq!(roster.class(AgentIndex::new(1)), UnitClass::Infantry);
        assert_eq!(roster.class(AgentIndex::new(2)), UnitClass::Artillery);
        assert_eq!(roster.position(AgentIndex::new(1)), Position::new(3.0, 4.0));
        assert_eq!(roster.unit_type(AgentIndex::new(2)), UnitTypeId::new(4));
    }

    #[test]
    fn test_build_empty_roster_is_valid() {
        let roster = RosterBuilder::new(test_catalog())
            .build()
            .expect("empty roster should validate");
        assert!(roster.is_empty());
        assert_eq!(roster.num_agents(), 0);
    }

    #[test]
    fn test_build_rejects_unknown_unit_type() {
        let mut builder = RosterBuilder::new(test_catalog());
        builder.add_agent(UnitTypeId::new(1), Position::new(0.0, 0.0));
        builder.add_agent(UnitTypeId::new(99), Position::new(0.0, 0.0));

        let err = builder.build().expect_err("unknown type must be rejected");
        assert_eq!(
            err,
            RosterError::UnknownUnitType {
                agent: AgentIndex::new(1),
                unit_type: UnitTypeId::new(99),
            }
        );
    }

    #[test]
    fn test_build_rejects_non_finite_position() {
        let mut builder = RosterBuilder::new(test_catalog());
        builder.add_agent(UnitTypeId::new(1), Position::new(f64::NAN, 0.0));

        let err = builder.build().expect_err("NaN coordinate must be rejected");
        assert_eq!(
            err,
            RosterError::NonFinitePosition {
                agent: AgentIndex::new(0),
            }
        );
    }

    #[test]
    fn test_add_agent_returns_sequential_indices() {
        let mut builder = RosterBuilder::with_capacity(test_catalog(), 2);
        assert_eq!(
            builder.add_agent(UnitTypeId::new(1), Position::default()),
            AgentIndex::new(0)
        );
        assert_eq!(
            builder.add_agent(UnitTypeId::new(2), Position::default()),
            AgentIndex::new(1)
        );
        assert_eq!(builder.num_agents(), 2);
    }

    #[test]
    fn test_complexity_of_empty_tree_is_single_node() {
        let c = Complexity::new(0, 2);
        assert_eq!(c.raw(), 0.0);
        assert_eq!(c.coverage(1), Some(100.0));
    }

    #[test]
    fn test_complexity_counts_binary_tree_nodes() {
        // N = 3, B = 2: 1 + 2 + 4 + 8 = 15 nodes.
        let c = Complexity::new(3, 2);
        let total = 10.0_f64.powf(c.raw());
        assert!((total - 15.0).abs() < 1e-9, "expected 15 nodes, got {total}");

        let coverage = c.coverage(15).expect("small space must report coverage");
        assert!((coverage - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_complexity_huge_space_reports_zero_coverage() {
        let c = Complexity::new(100, 2);
        assert_eq!(c.coverage(1_000_000), Some(0.0));
    }
}
