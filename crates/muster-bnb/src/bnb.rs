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

//! Branch-and-Bound solver for two-group unit assignment.
//!
//! This module implements a stateful search engine that explores complete
//! group assignments depth-first while pruning branches whose optimistic
//! bound cannot beat the incumbent. The `BnbSolver` owns a reusable frontier
//! to minimize memory churn across repeated solves; a search session object
//! encapsulates per-run state, statistics, and timing.
//!
//! The engine is *anytime*: before the exhaustive phase starts, a randomized
//! seeding phase installs a complete incumbent, so a monitor-driven abort
//! (typically a wall-clock budget) always returns a valid assignment. The
//! seeding time counts against the budget. Degenerate inputs (an empty
//! roster or a branch factor of zero) yield the trivial empty assignment
//! rather than an error, and a branch factor of one collapses to the single
//! all-primary assignment.
//!
//! The exhaustive phase is fully deterministic given the roster ordering and
//! the group order `0..branch_factor`; only the seeder draws randomness, and
//! a weak seed can only cost pruning efficiency, never reachable values.
//! Incumbent replacement uses strictly-greater comparison, so the first-found
//! solution of a given value is retained.

use crate::{
    candidate::{AssignedUnit, CandidateSolution},
    eval::evaluator::UtilityEvaluator,
    frontier::Frontier,
    result::BnbSolverOutcome,
    seeder::RandomRestartSeeder,
    stats::BnbSolverStatistics,
};
use muster_model::{
    assignment::Assignment,
    index::{AgentIndex, GroupIndex},
    roster::Roster,
};
use muster_search::monitor::search_monitor::{SearchCommand, SearchMonitor};
use muster_search::result::TerminationReason;
use rand::Rng;

/// A branch and bound solver for the group-assignment problem using a
/// depth-first search with an incumbent-driven bound. Note that this is just
/// the execution engine: scoring and pruning potential come from a
/// `UtilityEvaluator`, the initial incumbent from a `RandomRestartSeeder`,
/// and termination control from a `SearchMonitor`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    frontier: Frontier,
}

impl BnbSolver {
    /// Create a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            frontier: Frontier::new(),
        }
    }

    /// Create a new solver instance with preallocated frontier storage for
    /// the given problem size.
    ///
    /// # Note
    ///
    /// When you invoke the solver it will internally ensure that the
    /// frontier has sufficient capacity for the given roster. Constructing
    /// the solver with preallocated storage only moves the cost of the
    /// memory allocations to the construction time of the solver.
    #[inline]
    pub fn preallocated(num_agents: usize, branch_factor: usize) -> Self {
        Self {
            frontier: Frontier::preallocated(num_agents, branch_factor),
        }
    }

    /// Solve the given roster using the provided seeder, evaluator, monitor,
    /// and randomness source.
    #[inline]
    pub fn solve<E, S, R>(
        &mut self,
        roster: &Roster,
        branch_factor: usize,
        seeder: &RandomRestartSeeder,
        evaluator: &E,
        monitor: S,
        rng: &mut R,
    ) -> BnbSolverOutcome
    where
        E: UtilityEvaluator,
        S: SearchMonitor,
        R: Rng,
    {
        let session =
            BnbSearchSession::new(self, roster, branch_factor, seeder, evaluator, monitor, rng);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Reset the internal state of the solver.
    ///
    /// # Note
    ///
    /// This does not deallocate the frontier's memory, but only resets its
    /// logical state.
    #[inline]
    fn reset(&mut self) {
        self.frontier.reset();
    }
}

/// A search session for the solver. This struct encapsulates the state and
/// logic of a single search run.
struct BnbSearchSession<'a, E, S, R> {
    solver: &'a mut BnbSolver,
    roster: &'a Roster,
    branch_factor: usize,
    seeder: &'a RandomRestartSeeder,
    evaluator: &'a E,
    monitor: S,
    rng: &'a mut R,
    best: CandidateSolution,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<E, S, R> std::fmt::Debug for BnbSearchSession<'_, E, S, R>
where
    E: UtilityEvaluator,
    S: SearchMonitor,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSearchSession")
            .field("branch_factor", &self.branch_factor)
            .field("best", &self.best)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, E, S, R> BnbSearchSession<'a, E, S, R>
where
    E: UtilityEvaluator,
    S: SearchMonitor,
    R: Rng,
{
    /// Create a new search session.
    #[inline]
    fn new(
        solver: &'a mut BnbSolver,
        roster: &'a Roster,
        branch_factor: usize,
        seeder: &'a RandomRestartSeeder,
        evaluator: &'a E,
        monitor: S,
        rng: &'a mut R,
    ) -> Self {
        Self {
            solver,
            roster,
            branch_factor,
            seeder,
            evaluator,
            monitor,
            rng,
            best: CandidateSolution::empty(),
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Run the search session.
    #[inline]
    fn run(mut self) -> BnbSolverOutcome {
        self.monitor.on_enter_search(self.roster);
        self.start_time = std::time::Instant::now();

        let num_agents = self.roster.num_agents();

        // Degenerate inputs collapse to well-defined trivial results rather
        // than errors.
        if num_agents == 0 || self.branch_factor == 0 {
            return self.finalize_trivial();
        }
        if self.branch_factor == 1 {
            self.install_single_group_incumbent();
            return self.finalize(TerminationReason::FrontierExhausted);
        }

        self.seed_incumbent();

        self.solver
            .frontier
            .ensure_capacity(num_agents, self.branch_factor);
        self.solver.frontier.push(CandidateSolution::empty());

        let termination_reason = loop {
            self.monitor.on_step();

            if let SearchCommand::Terminate(msg) = self.monitor.search_command() {
                break TerminationReason::Aborted(msg);
            }

            let candidate = match self.solver.frontier.pop() {
                Some(candidate) => candidate,
                None => break TerminationReason::FrontierExhausted,
            };
            self.stats.on_node_explored();

            if candidate.is_complete(num_agents) {
                self.handle_complete_candidate(candidate);
            } else {
                self.branch(candidate);
            }
        };

        self.finalize(termination_reason)
    }

    /// Build the initial incumbent from random restarts and report it.
    #[inline]
    fn seed_incumbent(&mut self) {
        let seeding_started = std::time::Instant::now();
        self.best = self
            .seeder
            .seed(self.roster, self.evaluator, self.rng);
        self.stats.set_time_seeding(seeding_started.elapsed());
        self.stats
            .set_seed_trials(self.seeder.num_trials(self.roster.num_agents()));

        self.stats.on_solution_found();
        self.monitor
            .on_solution_found(&self.best.to_assignment(self.roster.num_agents()));
    }

    /// With a branch factor of one the tree holds a single complete
    /// assignment; install it directly instead of seeding and searching.
    #[inline]
    fn install_single_group_incumbent(&mut self) {
        let units = (0..self.roster.num_agents())
            .map(|index| {
                AssignedUnit::from_roster(self.roster, AgentIndex::new(index), GroupIndex::PRIMARY)
            })
            .collect();
        self.best = CandidateSolution::with_units(units, self.evaluator);

        self.stats.on_solution_found();
        self.monitor
            .on_solution_found(&self.best.to_assignment(self.roster.num_agents()));
    }

    /// Promote a complete candidate to incumbent if it strictly improves.
    #[inline(always)]
    fn handle_complete_candidate(&mut self, candidate: CandidateSolution) {
        if candidate.value() > self.best.value() {
            self.best = candidate;
            self.stats.on_solution_found();
            self.monitor
                .on_solution_found(&self.best.to_assignment(self.roster.num_agents()));
        }
    }

    /// Expand a partial candidate: clone-and-extend once per group, pushing
    /// only children whose bound can still beat the incumbent.
    #[inline(always)]
    fn branch(&mut self, candidate: CandidateSolution) {
        let num_agents = self.roster.num_agents();
        let agent = candidate.next_agent_index();

        debug_assert!(
            agent.get() < num_agents,
            "called `BnbSearchSession::branch` with agent index out of bounds: the len is {} but the index is {}",
            num_agents,
            agent.get()
        );

        self.stats.on_depth_update(candidate.len() as u64 + 1);

        for group in 0..self.branch_factor {
            let unit = AssignedUnit::from_roster(self.roster, agent, GroupIndex::new(group));
            let child = candidate.extended(unit, self.evaluator);
            self.stats.on_decision_generated();

            let remaining = num_agents - child.len();
            if child.bound(self.evaluator, remaining) > self.best.value() {
                self.solver.frontier.push(child);
            } else {
                self.stats.on_pruning_bound();
            }
        }
    }

    /// Finalize with the empty assignment, for inputs that admit no
    /// branching at all.
    ///
    /// # Note
    ///
    /// This consumes self.
    #[inline]
    fn finalize_trivial(mut self) -> BnbSolverOutcome {
        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search();
        BnbSolverOutcome::exhausted(Assignment::new(0.0, Vec::new()), self.stats)
    }

    /// Finalize the solver result based on the incumbent and the termination
    /// reason.
    ///
    /// # Note
    ///
    /// This consumes self.
    #[inline]
    fn finalize(mut self, reason: TerminationReason) -> BnbSolverOutcome {
        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search();

        let assignment = self.best.to_assignment(self.roster.num_agents());
        match reason {
            TerminationReason::FrontierExhausted => {
                BnbSolverOutcome::exhausted(assignment, self.stats)
            }
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::truncated(assignment, msg, self.stats)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::cohesion::SquadCohesionEvaluator;
    use muster_model::{
        catalog::{UnitCatalog, UnitClass, UnitTypeId},
        index::AgentIndex,
        position::Position,
        roster::RosterBuilder,
    };
    use muster_search::monitor::{no_op::NoOperationMonitor, time_limit::TimeLimitMonitor};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    const INFANTRY: UnitTypeId = UnitTypeId::new(1);
    const GRENADIER: UnitTypeId = UnitTypeId::new(2);
    const MEDIC: UnitTypeId = UnitTypeId::new(3);
    const ARTILLERY: UnitTypeId = UnitTypeId::new(4);

    fn catalog() -> UnitCatalog {
        [
            (INFANTRY, UnitClass::Infantry),
            (GRENADIER, UnitClass::Grenadier),
            (MEDIC, UnitClass::Medic),
            (ARTILLERY, UnitClass::Artillery),
        ]
        .into_iter()
        .collect()
    }

    /// Builds a roster from `(type, x, y)` triples, preserving order.
    fn roster_of(agents: &[(UnitTypeId, f64, f64)]) -> Roster {
        let mut builder = RosterBuilder::new(catalog());
        for &(unit_type, x, y) in agents {
            builder.add_agent(unit_type, Position::new(x, y));
        }
        builder.build().expect("test roster should validate")
    }

    /// Scores every one of the `2^N` complete assignments and returns the
    /// maximum value.
    fn brute_force_maximum(roster: &Roster) -> f64 {
        let evaluator = SquadCohesionEvaluator::new();
        let num_agents = roster.num_agents();
        let mut best = f64::NEG_INFINITY;

        for mask in 0u32..(1 << num_agents) {
            let units: Vec<AssignedUnit> = (0..num_agents)
                .map(|index| {
                    let group = if mask & (1 << index) != 0 {
                        GroupIndex::SECONDARY
                    } else {
                        GroupIndex::PRIMARY
                    };
                    AssignedUnit::from_roster(roster, AgentIndex::new(index), group)
                })
                .collect();
            best = best.max(evaluator.evaluate(&units));
        }

        best
    }

    fn solve_with_seed(roster: &Roster, rng_seed: u64) -> BnbSolverOutcome {
        let mut solver = BnbSolver::new();
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        solver.solve(
            roster,
            2,
            &RandomRestartSeeder::default(),
            &SquadCohesionEvaluator::new(),
            NoOperationMonitor::new(),
            &mut rng,
        )
    }

    #[test]
    fn test_empty_roster_returns_trivial_result() {
        let roster = roster_of(&[]);
        let outcome = solve_with_seed(&roster, 1);

        assert!(outcome.result().is_exhausted());
        assert_eq!(outcome.assignment().num_agents(), 0);
        assert_eq!(outcome.assignment().objective_value(), 0.0);
    }

    #[test]
    fn test_zero_branch_factor_returns_trivial_result() {
        let roster = roster_of(&[(INFANTRY, 0.0, 0.0), (MEDIC, 0.0, 0.0)]);
        let mut solver = BnbSolver::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = solver.solve(
            &roster,
            0,
            &RandomRestartSeeder::default(),
            &SquadCohesionEvaluator::new(),
            NoOperationMonitor::new(),
            &mut rng,
        );

        assert!(outcome.result().is_exhausted());
        assert_eq!(outcome.assignment().num_agents(), 0);
        assert_eq!(outcome.assignment().objective_value(), 0.0);
    }

    #[test]
    fn test_branch_factor_one_assigns_everyone_primary() {
        let roster = roster_of(&[
            (INFANTRY, 0.0, 0.0),
            (MEDIC, 0.0, 0.0),
            (ARTILLERY, 0.0, 0.0),
        ]);
        let mut solver = BnbSolver::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = solver.solve(
            &roster,
            1,
            &RandomRestartSeeder::default(),
            &SquadCohesionEvaluator::new(),
            NoOperationMonitor::new(),
            &mut rng,
        );

        assert!(outcome.result().is_exhausted());
        assert_eq!(outcome.assignment().num_agents(), 3);
        for index in 0..3 {
            assert_eq!(
                outcome.assignment().group_for_agent(AgentIndex::new(index)),
                GroupIndex::PRIMARY
            );
        }
    }

    #[test]
    fn test_exhaustive_search_matches_brute_force_on_uniform_fixture() {
        // Co-located uniform infantry: along the all-primary path the bound
        // stays strictly above the best completion, so the engine provably
        // reaches the brute-force maximum.
        let roster = roster_of(&[(INFANTRY, 5.0, 5.0); 6]);
        let expected = brute_force_maximum(&roster);

        let outcome = solve_with_seed(&roster, 11);
        assert!(outcome.result().is_exhausted());
        assert!(
            (outcome.assignment().objective_value() - expected).abs() < 1e-9,
            "expected {expected}, got {}",
            outcome.assignment().objective_value()
        );
    }

    #[test]
    fn test_exhaustive_search_matches_brute_force_on_supported_fixture() {
        // Support-first ordering keeps every prefix of the optimal path at
        // full efficiency, so its bound never drops below the optimum and
        // the engine is guaranteed to reach the brute-force maximum.
        let roster = roster_of(&[
            (MEDIC, 1.0, 1.0),
            (MEDIC, 0.0, 2.0),
            (INFANTRY, 0.0, 0.0),
            (INFANTRY, 2.0, 1.0),
            (INFANTRY, 1.0, 0.0),
            (ARTILLERY, 0.0, 2.0),
            (ARTILLERY, 1.0, 3.0),
            (ARTILLERY, 2.0, 2.0),
        ]);
        let expected = brute_force_maximum(&roster);

        let outcome = solve_with_seed(&roster, 23);
        assert!(outcome.result().is_exhausted());
        assert!(
            (outcome.assignment().objective_value() - expected).abs() < 1e-9,
            "expected {expected}, got {}",
            outcome.assignment().objective_value()
        );
    }

    #[test]
    fn test_search_never_below_seed() {
        let roster = roster_of(&[
            (INFANTRY, 0.0, 0.0),
            (INFANTRY, 1.0, 0.0),
            (MEDIC, 0.0, 1.0),
            (ARTILLERY, 1.0, 1.0),
            (ARTILLERY, 2.0, 0.0),
        ]);

        // The engine consumes the RNG exactly like a standalone seeding run,
        // so the same stream reproduces the seed the engine started from.
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let seed = RandomRestartSeeder::default().seed(
            &roster,
            &SquadCohesionEvaluator::new(),
            &mut rng,
        );

        let outcome = solve_with_seed(&roster, 17);
        assert!(outcome.assignment().objective_value() >= seed.value());
    }

    #[test]
    fn test_reference_scenario_splits_artillery_toward_secondary() {
        // 3 infantry, 2 medics, 4 artillery, all co-located. The optimum
        // keeps the supported infantry primary and pushes 3 of the 4
        // artillery into the secondary group: 575 + 300 = 875.
        let roster = roster_of(&[
            (MEDIC, 10.0, 10.0),
            (MEDIC, 10.0, 10.0),
            (INFANTRY, 10.0, 10.0),
            (INFANTRY, 10.0, 10.0),
            (INFANTRY, 10.0, 10.0),
            (ARTILLERY, 10.0, 10.0),
            (ARTILLERY, 10.0, 10.0),
            (ARTILLERY, 10.0, 10.0),
            (ARTILLERY, 10.0, 10.0),
        ]);

        let outcome = solve_with_seed(&roster, 31);
        let assignment = outcome.assignment();
        assert!((assignment.objective_value() - 875.0).abs() < 1e-9);

        // Strictly better than either single-group assignment (800 and 300).
        assert!(assignment.objective_value() > 800.0);

        let secondary_artillery = (5..9)
            .filter(|&index| {
                assignment.group_for_agent(AgentIndex::new(index)) == GroupIndex::SECONDARY
            })
            .count();
        assert_eq!(secondary_artillery, 3);

        // Medics and infantry stay together in the primary group.
        for index in 0..5 {
            assert_eq!(
                assignment.group_for_agent(AgentIndex::new(index)),
                GroupIndex::PRIMARY
            );
        }
    }

    #[test]
    fn test_zero_time_budget_still_returns_complete_assignment() {
        let roster = roster_of(&[
            (INFANTRY, 0.0, 0.0),
            (INFANTRY, 1.0, 0.0),
            (MEDIC, 0.0, 1.0),
            (ARTILLERY, 1.0, 1.0),
        ]);

        let mut solver = BnbSolver::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Mask 0 checks the clock on every step, so the exhausted budget is
        // seen before any node is expanded.
        let outcome = solver.solve(
            &roster,
            2,
            &RandomRestartSeeder::default(),
            &SquadCohesionEvaluator::new(),
            TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0),
            &mut rng,
        );

        // The seeded incumbent carries the run: the result is truncated but
        // complete.
        assert!(outcome.result().is_truncated());
        assert_eq!(outcome.assignment().num_agents(), roster.num_agents());
        assert!(outcome.assignment().objective_value() > 0.0);
        match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => assert!(msg.contains("time limit")),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn test_idempotent_given_same_rng_seed() {
        let roster = roster_of(&[
            (INFANTRY, 0.0, 0.0),
            (GRENADIER, 4.0, 0.0),
            (MEDIC, 0.0, 3.0),
            (ARTILLERY, 4.0, 3.0),
            (INFANTRY, 2.0, 2.0),
            (ARTILLERY, 1.0, 1.0),
        ]);

        let first = solve_with_seed(&roster, 99);
        let second = solve_with_seed(&roster, 99);
        assert_eq!(
            first.assignment().objective_value(),
            second.assignment().objective_value()
        );
    }

    #[test]
    fn test_statistics_reflect_search_effort() {
        let roster = roster_of(&[(INFANTRY, 0.0, 0.0); 5]);
        let outcome = solve_with_seed(&roster, 7);

        let stats = outcome.statistics();
        assert!(stats.nodes_explored > 0);
        assert!(stats.decisions_generated > 0);
        assert_eq!(stats.max_depth, 5);
        assert_eq!(stats.seed_trials, 150); // 30 trials per agent
        assert!(stats.solutions_found >= 1);
        assert!(stats.time_total >= stats.time_seeding);
    }

    #[test]
    fn test_solver_is_reusable_across_solves() {
        let roster = roster_of(&[
            (INFANTRY, 0.0, 0.0),
            (MEDIC, 0.0, 0.0),
            (ARTILLERY, 0.0, 0.0),
        ]);

        let mut solver = BnbSolver::preallocated(roster.num_agents(), 2);
        for run in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let outcome = solver.solve(
                &roster,
                2,
                &RandomRestartSeeder::default(),
                &SquadCohesionEvaluator::new(),
                NoOperationMonitor::new(),
                &mut rng,
            );
            assert!(
                outcome.result().is_exhausted(),
                "run {run} should exhaust the frontier"
            );
            assert_eq!(outcome.assignment().num_agents(), 3);
        }
    }

    #[test]
    fn test_coverage_is_complete_on_small_exhausted_instance() {
        let roster = roster_of(&[(INFANTRY, 0.0, 0.0); 4]);
        let outcome = solve_with_seed(&roster, 13);
        assert!(outcome.result().is_exhausted());

        // Pruning means we explore at most the full tree, never more.
        let coverage = roster
            .complexity(2)
            .coverage(outcome.statistics().nodes_explored)
            .expect("small space must report coverage");
        assert!(coverage > 0.0);
        assert!(coverage <= 100.0 + 1e-9);
    }
}
