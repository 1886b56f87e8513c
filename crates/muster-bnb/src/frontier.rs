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

use crate::candidate::CandidateSolution;

/// A LIFO stack of pending partial candidates.
///
/// `Frontier` drives the depth-first order of the search: the most recently
/// pushed candidate is explored first. Each entry owns its candidate
/// outright, so popping transfers ownership to the search loop and pruned
/// entries are simply dropped.
///
/// Performance notes:
/// - `preallocated` and `ensure_capacity` help avoid reallocations; the
///   depth-first frontier never holds more than
///   `num_agents * (branch_factor - 1) + 1` entries.
/// - `reset` keeps the allocation for reuse across solves.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    entries: Vec<CandidateSolution>,
}

impl Frontier {
    /// Creates a new, empty `Frontier`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a preallocated `Frontier` based on problem size.
    #[inline]
    pub fn preallocated(num_agents: usize, branch_factor: usize) -> Self {
        Self {
            entries: Vec::with_capacity(Self::capacity_for(num_agents, branch_factor)),
        }
    }

    /// Ensures the frontier has capacity for the given problem size.
    #[inline]
    pub fn ensure_capacity(&mut self, num_agents: usize, branch_factor: usize) {
        let capacity = Self::capacity_for(num_agents, branch_factor);
        if self.entries.capacity() < capacity {
            self.entries.reserve(capacity - self.entries.capacity());
        }
    }

    #[inline]
    fn capacity_for(num_agents: usize, branch_factor: usize) -> usize {
        num_agents
            .saturating_mul(branch_factor.saturating_sub(1))
            .saturating_add(1)
    }

    /// Pushes a candidate onto the frontier.
    #[inline]
    pub fn push(&mut self, candidate: CandidateSolution) {
        self.entries.push(candidate);
    }

    /// Pops the most recently pushed candidate, or `None` if the frontier is
    /// exhausted.
    #[inline]
    pub fn pop(&mut self) -> Option<CandidateSolution> {
        self.entries.pop()
    }

    /// Returns the number of pending candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no candidates are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all pending candidates while keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Display for Frontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frontier(pending: {})", self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::AssignedUnit;
    use crate::eval::cohesion::SquadCohesionEvaluator;
    use muster_model::{
        catalog::{UnitCatalog, UnitClass, UnitTypeId},
        index::{AgentIndex, GroupIndex},
        position::Position,
        roster::RosterBuilder,
    };

    fn one_unit_candidate(group: GroupIndex) -> CandidateSolution {
        let catalog: UnitCatalog = [(UnitTypeId::new(1), UnitClass::Infantry)]
            .into_iter()
            .collect();
        let mut builder = RosterBuilder::new(catalog);
        builder.add_agent(UnitTypeId::new(1), Position::new(0.0, 0.0));
        let roster = builder.build().expect("test roster should validate");

        let evaluator = SquadCohesionEvaluator::new();
        CandidateSolution::empty().extended(
            AssignedUnit::from_roster(&roster, AgentIndex::new(0), group),
            &evaluator,
        )
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut frontier = Frontier::new();
        assert!(frontier.is_empty());

        frontier.push(one_unit_candidate(GroupIndex::PRIMARY));
        frontier.push(one_unit_candidate(GroupIndex::SECONDARY));
        assert_eq!(frontier.len(), 2);

        let top = frontier.pop().expect("frontier should not be empty");
        assert_eq!(top.units()[0].group(), GroupIndex::SECONDARY);
        let next = frontier.pop().expect("frontier should not be empty");
        assert_eq!(next.units()[0].group(), GroupIndex::PRIMARY);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut frontier = Frontier::preallocated(8, 2);
        let capacity = frontier.entries.capacity();
        assert!(capacity >= 9);

        frontier.push(one_unit_candidate(GroupIndex::PRIMARY));
        frontier.reset();
        assert!(frontier.is_empty());
        assert_eq!(frontier.entries.capacity(), capacity);
    }

    #[test]
    fn test_ensure_capacity_is_monotonic() {
        let mut frontier = Frontier::new();
        frontier.ensure_capacity(4, 2);
        let before = frontier.entries.capacity();
        assert!(before >= 5);

        frontier.ensure_capacity(2, 2);
        assert!(frontier.entries.capacity() >= before);
    }
}
