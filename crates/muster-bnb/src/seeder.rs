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

//! # Random Restart Seeder
//!
//! Builds the initial incumbent for the branch-and-bound engine by scoring
//! many random complete assignments and keeping the best one.
//!
//! Each trial draws a target secondary-group size uniformly from
//! `[ceil(0.2 * N), floor(0.6 * N)]`, samples that many agents without
//! replacement into the secondary group, and sends everyone else to the
//! primary group. A strong seed tightens pruning for the exhaustive phase
//! that follows, and because seeding always produces a *complete* candidate,
//! a time-based abort can return it as a valid result at any point.
//!
//! The generator is injected, so tests can seed deterministically while
//! production draws from OS entropy. A weak seed only costs pruning
//! efficiency, never correctness.

use crate::{
    candidate::{AssignedUnit, CandidateSolution},
    eval::evaluator::UtilityEvaluator,
};
use fixedbitset::FixedBitSet;
use muster_model::{
    index::{AgentIndex, GroupIndex},
    roster::Roster,
};
use rand::Rng;

/// Share of the roster that marks the smallest secondary group a trial draws.
const SECONDARY_SHARE_FLOOR: f64 = 0.2;
/// Share of the roster that marks the largest secondary group a trial draws.
const SECONDARY_SHARE_CEILING: f64 = 0.6;

/// Seeds the search with the best of many random complete assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomRestartSeeder {
    trials_per_agent: u32,
}

impl Default for RandomRestartSeeder {
    #[inline]
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRIALS_PER_AGENT)
    }
}

impl RandomRestartSeeder {
    /// Default number of trials per roster agent. At this rate the seed is
    /// usually strong enough to prune most of the tree while staying cheap
    /// relative to the exhaustive phase.
    pub const DEFAULT_TRIALS_PER_AGENT: u32 = 30;

    #[inline]
    pub fn new(trials_per_agent: u32) -> Self {
        Self { trials_per_agent }
    }

    /// Returns the number of trials a seeding run performs for a roster of
    /// the given size.
    #[inline]
    pub fn num_trials(&self, num_agents: usize) -> u64 {
        self.trials_per_agent as u64 * num_agents as u64
    }

    /// Generates random complete assignments and returns the best-scoring
    /// one. Ties keep the earliest trial. An empty roster yields the empty
    /// candidate with value 0.
    pub fn seed<E, R>(&self, roster: &Roster, evaluator: &E, rng: &mut R) -> CandidateSolution
    where
        E: UtilityEvaluator,
        R: Rng,
    {
        let num_agents = roster.num_agents();
        if num_agents == 0 {
            return CandidateSolution::empty();
        }

        let secondary_floor = (SECONDARY_SHARE_FLOOR * num_agents as f64).ceil() as usize;
        let secondary_ceiling =
            ((SECONDARY_SHARE_CEILING * num_agents as f64).floor() as usize).max(secondary_floor);

        let mut best: Option<CandidateSolution> = None;
        let mut is_secondary = FixedBitSet::with_capacity(num_agents);

        for _ in 0..self.num_trials(num_agents) {
            let secondary_size = rng.random_range(secondary_floor..=secondary_ceiling);

            is_secondary.clear();
            let mut units = Vec::with_capacity(num_agents);

            for index in rand::seq::index::sample(rng, num_agents, secondary_size) {
                is_secondary.insert(index);
                units.push(AssignedUnit::from_roster(
                    roster,
                    AgentIndex::new(index),
                    GroupIndex::SECONDARY,
                ));
            }

            for index in 0..num_agents {
                if !is_secondary.contains(index) {
                    units.push(AssignedUnit::from_roster(
                        roster,
                        AgentIndex::new(index),
                        GroupIndex::PRIMARY,
                    ));
                }
            }

            let candidate = CandidateSolution::with_units(units, evaluator);
            let improved = match &best {
                Some(incumbent) => candidate.value() > incumbent.value(),
                None => true,
            };
            if improved {
                best = Some(candidate);
            }
        }

        best.unwrap_or_else(CandidateSolution::empty)
    }
}

impl std::fmt::Display for RandomRestartSeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RandomRestartSeeder(trials_per_agent: {})",
            self.trials_per_agent
        )
    }
}
