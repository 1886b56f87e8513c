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

//! # Muster Model
//!
//! **The Core Domain Model for the Muster Group-Assignment Solver.**
//!
//! This crate defines the fundamental data structures used to represent the
//! **two-group unit partitioning problem**: a fixed set of military units, each
//! with a type and a 2D position, must be split into a primary and a secondary
//! group. It serves as the data interchange layer between the problem
//! definition (user input) and the solving engine (`muster_bnb`).
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation of concerns between
//! **construction** and **solving**:
//!
//! * **`index`**: Strongly-typed wrappers (`AgentIndex`, `GroupIndex`) to prevent logical indexing errors.
//! * **`catalog`**: Unit type identifiers and the configurable mapping from type to combat class.
//! * **`position`**: The minimal 2D position primitive the objective needs.
//! * **`roster`**: The `Roster` (immutable, fixed agent ordering, optimized for solving) and `RosterBuilder` (mutable, optimized for configuration).
//! * **`assignment`**: The output format, a per-agent group labelling plus the objective value.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Indices are distinct types. You cannot accidentally use an `AgentIndex` as a `GroupIndex`.
//! 2.  **Memory Layout**: Agent data is stored in **Structure of Arrays (SoA)** format (flattened vectors) rather than Arrays of Structures (AoS) to maximize cache locality during the branch-and-bound search.
//! 3.  **Fail-Fast**: Builders validate inputs eagerly so the solver never encounters an unknown unit type or a non-finite coordinate.

pub mod assignment;
pub mod catalog;
pub mod index;
pub mod position;
pub mod roster;
