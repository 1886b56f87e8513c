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

use crate::candidate::AssignedUnit;

/// The value scale of the objective: the most a single unit can contribute.
pub const MAX_UNIT_VALUE: f64 = 100.0;

/// A strategy for scoring candidates and estimating remaining potential.
///
/// `UtilityEvaluator` decouples the solver from a particular objective
/// function. The solver calls:
/// - `evaluate` to score the unit sequence of a candidate; the function must
///   be pure, total (no failure on any well-formed input), and deterministic,
/// - `remaining_potential` to obtain the optimistic headroom the engine adds
///   to a partial candidate's value when deciding whether to prune it.
pub trait UtilityEvaluator {
    /// Returns the name of the utility evaluator.
    fn name(&self) -> &str;

    /// Scores the given unit sequence.
    ///
    /// The result must not depend on the order of units within a group, and
    /// an empty sequence must score 0.
    fn evaluate(&self, units: &[AssignedUnit]) -> f64;

    /// Returns an optimistic ceiling on the value `remaining` unassigned
    /// units could still add.
    ///
    /// The default assumes every unassigned unit reaches the full value
    /// scale. This is **not a certified admissible bound**: assigning a unit
    /// can retroactively change the value of already-assigned units (a medic
    /// raising the support efficiency of previously placed infantry, for
    /// example), so a completion can in principle gain more than
    /// `remaining * MAX_UNIT_VALUE` over the current value. It is an accepted
    /// approximation that prunes well in practice. Override this method to
    /// swap in a tighter or provably admissible bound without touching the
    /// search loop.
    #[inline]
    fn remaining_potential(&self, remaining: usize) -> f64 {
        remaining as f64 * MAX_UNIT_VALUE
    }
}

impl std::fmt::Debug for dyn UtilityEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UtilityEvaluator({})", self.name())
    }
}

impl std::fmt::Display for dyn UtilityEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UtilityEvaluator({})", self.name())
    }
}
