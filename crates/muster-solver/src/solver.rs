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

//! # Assignment Solver Facade
//!
//! A high-level entry point that assembles the engine, monitors, seeder, and
//! randomness source behind a single `solve(roster)` call.
//!
//! ## Motivation
//!
//! Hosts that embed the solver in a live decision loop care about two knobs:
//! the time budget and reproducibility. The facade exposes those (plus
//! seeding effort and progress logging) through a builder and hides the
//! monitor and RNG wiring.
//!
//! ## Highlights
//!
//! - Builder pattern: `SolverBuilder` with `with_*` methods, defaults
//!   matching the engine's reference configuration (branch factor 2, 30 seed
//!   trials per agent).
//! - Deterministic replays: `with_rng_seed` pins the seeding phase to a
//!   fixed ChaCha8 stream; without it the stream comes from OS entropy.
//! - `solve` uses the default `SquadCohesionEvaluator`; `solve_with` accepts
//!   any custom `UtilityEvaluator`.
//!
//! ## Usage
//!
//! ```rust
//! use muster_model::catalog::{UnitCatalog, UnitClass, UnitTypeId};
//! use muster_model::position::Position;
//! use muster_model::roster::RosterBuilder;
//! use muster_solver::solver::SolverBuilder;
//! use std::time::Duration;
//!
//! let catalog: UnitCatalog = [(UnitTypeId::new(1), UnitClass::Infantry)]
//!     .into_iter()
//!     .collect();
//! let mut roster = RosterBuilder::new(catalog);
//! roster.add_agent(UnitTypeId::new(1), Position::new(10.0, 20.0));
//! let roster = roster.build().unwrap();
//!
//! let mut solver = SolverBuilder::new()
//!     .with_time_limit(Duration::from_secs(10))
//!     .with_rng_seed(42)
//!     .build();
//!
//! let outcome = solver.solve(&roster);
//! assert_eq!(outcome.assignment().num_agents(), 1);
//! ```

use muster_bnb::{
    bnb::BnbSolver,
    eval::{cohesion::SquadCohesionEvaluator, evaluator::UtilityEvaluator},
    result::BnbSolverOutcome,
    seeder::RandomRestartSeeder,
};
use muster_model::roster::Roster;
use muster_search::monitor::{
    composite::CompositeMonitor, log::LogMonitor, time_limit::TimeLimitMonitor,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The assembled solver. Construct via `SolverBuilder`.
#[derive(Debug, Clone)]
pub struct Solver {
    engine: BnbSolver,
    seeder: RandomRestartSeeder,
    branch_factor: usize,
    time_limit: Option<std::time::Duration>,
    rng_seed: Option<u64>,
    log_progress: bool,
}

impl Solver {
    #[inline]
    pub fn branch_factor(&self) -> usize {
        self.branch_factor
    }

    #[inline]
    pub fn time_limit(&self) -> Option<std::time::Duration> {
        self.time_limit
    }

    #[inline]
    pub fn has_time_limit(&self) -> bool {
        self.time_limit.is_some()
    }

    /// Solves the roster with the default squad-cohesion objective.
    #[inline]
    pub fn solve(&mut self, roster: &Roster) -> BnbSolverOutcome {
        self.solve_with(roster, &SquadCohesionEvaluator::new())
    }

    /// Solves the roster with a custom objective.
    pub fn solve_with<E>(&mut self, roster: &Roster, evaluator: &E) -> BnbSolverOutcome
    where
        E: UtilityEvaluator,
    {
        let mut monitor = CompositeMonitor::new();
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        if self.log_progress {
            monitor.add_monitor(LogMonitor::default());
        }

        let mut rng = match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        self.engine.solve(
            roster,
            self.branch_factor,
            &self.seeder,
            evaluator,
            monitor,
            &mut rng,
        )
    }
}

/// Configures and builds a `Solver`.
#[derive(Debug, Clone)]
pub struct SolverBuilder {
    branch_factor: usize,
    time_limit: Option<std::time::Duration>,
    trials_per_agent: u32,
    rng_seed: Option<u64>,
    log_progress: bool,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            branch_factor: 2,
            time_limit: None,
            trials_per_agent: RandomRestartSeeder::DEFAULT_TRIALS_PER_AGENT,
            rng_seed: None,
            log_progress: false,
        }
    }

    /// Sets the number of groups to partition into. The objective only
    /// values the first two; further groups act as discard bins.
    #[inline]
    pub fn with_branch_factor(mut self, branch_factor: usize) -> Self {
        self.branch_factor = branch_factor;
        self
    }

    /// Caps the wall-clock time of a solve, seeding included.
    #[inline]
    pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the seeding effort in random trials per roster agent.
    #[inline]
    pub fn with_trials_per_agent(mut self, trials_per_agent: u32) -> Self {
        self.trials_per_agent = trials_per_agent;
        self
    }

    /// Pins the randomness source for reproducible runs.
    #[inline]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Prints a periodic progress table during the search.
    #[inline]
    pub fn with_progress_logging(mut self) -> Self {
        self.log_progress = true;
        self
    }

    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            engine: BnbSolver::new(),
            seeder: RandomRestartSeeder::new(self.trials_per_agent),
            branch_factor: self.branch_factor,
            time_limit: self.time_limit,
            rng_seed: self.rng_seed,
            log_progress: self.log_progress,
        }
    }
}
