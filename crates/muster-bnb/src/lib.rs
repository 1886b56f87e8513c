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

//! Muster-BnB: branch-and-bound for two-group unit assignment
//!
//! High-level crate that implements an anytime, depth-first BnB solver that
//! partitions a roster of units into a primary and a secondary group. The
//! solver separates candidate representation, evaluation, seeding, and
//! monitoring so you can swap strategies without touching core search logic.
//!
//! Core flow
//! - Provide a `muster_model::roster::Roster`.
//! - Choose an `eval::UtilityEvaluator` (scoring + pruning potential).
//! - Choose a `seeder::RandomRestartSeeder` configuration and an RNG.
//! - Optionally attach `muster_search` monitors (time budget, logging).
//! - Run `bnb::BnbSolver`.
//!
//! Design highlights
//! - Copy-on-branch: every frontier entry owns its own `CandidateSolution`,
//!   so no aliasing or trail bookkeeping is needed.
//! - Anytime behavior: a randomized seeding phase installs a complete
//!   incumbent before the exhaustive phase starts, so a time-based abort can
//!   always return a valid assignment.
//! - Deterministic exhaustive phase: given the roster ordering and the group
//!   order `0..branch_factor`, only the seeder is randomized, and a weak seed
//!   can only cost pruning efficiency, never reachable values.
//!
//! Assumptions and guarantees
//! - The pruning bound is a documented heuristic, not a certified admissible
//!   bound; `Exhausted` outcomes therefore do not claim proven optimality.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `candidate`: assigned units and partial solutions with cached scores.
//! - `eval`: the utility interface and the squad-cohesion objective.
//! - `frontier`: the LIFO stack of pending candidates.
//! - `result`: solver outcomes with termination reasons.
//! - `seeder`: randomized construction of the initial incumbent.
//! - `stats`: lightweight counters/timing.

pub mod bnb;
pub mod candidate;
pub mod eval;
pub mod frontier;
pub mod result;
pub mod seeder;
pub mod stats;
