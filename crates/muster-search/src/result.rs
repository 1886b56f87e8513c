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

use muster_model::assignment::Assignment;

/// The result of an anytime search run.
///
/// The engine always holds a complete incumbent (it seeds one before the
/// exhaustive phase starts), so both variants carry an assignment. `Exhausted`
/// means the frontier emptied; note that this deliberately does **not** claim
/// proven optimality, because the engine prunes with a heuristic bound.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// The search explored the full (pruned) tree.
    Exhausted(Assignment),
    /// The search was cut short and returns the best incumbent found so far.
    Truncated(Assignment),
}

impl SolverResult {
    /// Returns the best assignment found, regardless of how the search ended.
    #[inline]
    pub fn best(&self) -> &Assignment {
        match self {
            SolverResult::Exhausted(assignment) => assignment,
            SolverResult::Truncated(assignment) => assignment,
        }
    }

    /// Consumes the result, returning the best assignment found.
    #[inline]
    pub fn into_best(self) -> Assignment {
        match self {
            SolverResult::Exhausted(assignment) => assignment,
            SolverResult::Truncated(assignment) => assignment,
        }
    }

    /// Returns the objective value of the best assignment found.
    #[inline]
    pub fn objective_value(&self) -> f64 {
        self.best().objective_value()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SolverResult::Exhausted(_))
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        matches!(self, SolverResult::Truncated(_))
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Exhausted(assignment) => {
                write!(f, "Exhausted(objective={:.2})", assignment.objective_value())
            }
            SolverResult::Truncated(assignment) => {
                write!(f, "Truncated(objective={:.2})", assignment.objective_value())
            }
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The frontier emptied; every branch was explored or pruned.
    FrontierExhausted,
    /// A monitor requested termination (time budget, external signal, ...).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::FrontierExhausted => write!(f, "Frontier Exhausted"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}
