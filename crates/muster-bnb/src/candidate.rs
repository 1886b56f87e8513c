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

//! # Candidate Solutions
//!
//! The partial-assignment representation the search manipulates.
//!
//! A `CandidateSolution` is an ordered, growable sequence of `AssignedUnit`s
//! with a cached utility value. The search extends candidates one unit at a
//! time in the roster's fixed ordering, so a candidate of length `k` always
//! covers exactly the first `k` agents and the next agent to branch on is the
//! one at index `k`. The branching cursor is derived from the length rather
//! than stored, which makes the prefix-consistency invariant hold by
//! construction.
//!
//! Extension is a pure constructor: `extended` returns a **new** candidate
//! and leaves the original untouched. Many candidates are alive on the
//! frontier at once, and value semantics keep them from aliasing each other.

use crate::eval::evaluator::UtilityEvaluator;
use muster_model::{
    assignment::Assignment,
    catalog::{UnitClass, UnitTypeId},
    index::{AgentIndex, GroupIndex},
    position::Position,
    roster::Roster,
};

/// A unit that has been assigned to a group: the atom the search manipulates.
///
/// Carries a copy of the agent's roster data plus its agent index, so a
/// complete candidate can be converted into an `Assignment` even when its
/// units were appended out of roster order (the seeder does this).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AssignedUnit {
    agent: AgentIndex,
    unit_type: UnitTypeId,
    class: UnitClass,
    group: GroupIndex,
    position: Position,
}

impl AssignedUnit {
    /// Builds an assigned unit by copying agent data out of the roster.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `agent` is out of bounds.
    #[inline]
    pub fn from_roster(roster: &Roster, agent: AgentIndex, group: GroupIndex) -> Self {
        debug_assert!(
            agent.get() < roster.num_agents(),
            "called `AssignedUnit::from_roster` with agent index out of bounds: the len is {} but the index is {}",
            roster.num_agents(),
            agent.get()
        );

        Self {
            agent,
            unit_type: roster.unit_type(agent),
            class: roster.class(agent),
            group,
            position: roster.position(agent),
        }
    }

    #[inline]
    pub fn agent(&self) -> AgentIndex {
        self.agent
    }

    #[inline]
    pub fn unit_type(&self) -> UnitTypeId {
        self.unit_type
    }

    #[inline]
    pub fn class(&self) -> UnitClass {
        self.class
    }

    #[inline]
    pub fn group(&self) -> GroupIndex {
        self.group
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for AssignedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssignedUnit(agent: {}, class: {}, group: {})",
            self.agent, self.class, self.group
        )
    }
}

/// A partial (or complete) assignment of agents to groups with a cached
/// utility value.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CandidateSolution {
    units: Vec<AssignedUnit>,
    value: f64,
}

impl CandidateSolution {
    /// Creates the empty candidate, the root of the search tree.
    #[inline]
    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            value: 0.0,
        }
    }

    /// Builds a candidate from a full unit list, scoring it once.
    #[inline]
    pub fn with_units<E>(units: Vec<AssignedUnit>, evaluator: &E) -> Self
    where
        E: UtilityEvaluator,
    {
        let value = evaluator.evaluate(&units);
        Self { units, value }
    }

    /// Returns the number of assigned units.
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if no units have been assigned yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns `true` if all agents of a roster with `num_agents` agents have
    /// been assigned.
    #[inline]
    pub fn is_complete(&self, num_agents: usize) -> bool {
        self.units.len() == num_agents
    }

    /// Returns the index of the next agent to branch on.
    ///
    /// Candidates cover a prefix of the roster ordering, so this is simply
    /// the current length.
    #[inline]
    pub fn next_agent_index(&self) -> AgentIndex {
        AgentIndex::new(self.units.len())
    }

    /// Returns the cached utility value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the assigned units.
    #[inline]
    pub fn units(&self) -> &[AssignedUnit] {
        &self.units
    }

    /// Returns a new candidate extended by one unit, with its value freshly
    /// scored by the evaluator. The receiver is left untouched.
    #[inline]
    pub fn extended<E>(&self, unit: AssignedUnit, evaluator: &E) -> Self
    where
        E: UtilityEvaluator,
    {
        let mut units = Vec::with_capacity(self.units.len() + 1);
        units.extend_from_slice(&self.units);
        units.push(unit);
        let value = evaluator.evaluate(&units);
        Self { units, value }
    }

    /// Returns an optimistic ceiling on the value reachable from this
    /// candidate with `remaining` agents still unassigned.
    ///
    /// Structurally, `bound(..) >= value()` always holds because the added
    /// potential is non-negative. Whether the ceiling is *admissible* is up
    /// to the evaluator; see `UtilityEvaluator::remaining_potential`.
    #[inline]
    pub fn bound<E>(&self, evaluator: &E, remaining: usize) -> f64
    where
        E: UtilityEvaluator,
    {
        self.value + evaluator.remaining_potential(remaining)
    }

    /// Converts a complete candidate into the final `Assignment`.
    ///
    /// Units may have been appended in any order; each unit's agent index
    /// determines its slot in the assignment.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the candidate is not complete.
    pub fn to_assignment(&self, num_agents: usize) -> Assignment {
        debug_assert!(
            self.is_complete(num_agents),
            "called `CandidateSolution::to_assignment` on a partial candidate: {} of {} units assigned",
            self.units.len(),
            num_agents
        );

        let mut groups = vec![GroupIndex::PRIMARY; num_agents];
        for unit in &self.units {
            groups[unit.agent().get()] = unit.group();
        }

        Assignment::new(self.value, groups)
    }
}

impl std::fmt::Display for CandidateSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CandidateSolution(len: {}, value: {:.2})",
            self.units.len(),
            self.value
        )
    }
}
