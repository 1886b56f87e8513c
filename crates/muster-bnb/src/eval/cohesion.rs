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

//! # Squad Cohesion Evaluator
//!
//! The concrete objective: values a two-group split by support coverage,
//! spatial cohesion, and secondary-group sizing. The ratios encode common
//! rules of thumb (one medic sustains about eight infantry or four
//! grenadiers), and groups whose members are spread out lose up to half
//! their value.
//!
//! The two groups are scored asymmetrically on purpose:
//! - artillery contributes at a 0.75 discount to the primary group but at
//!   full weight to the secondary group,
//! - only the secondary group is penalized for growing beyond a third of the
//!   assigned units.
//!
//! Every division is floor-guarded, so the score is finite and non-negative
//! for any well-formed input.

use crate::{
    candidate::AssignedUnit,
    eval::evaluator::{MAX_UNIT_VALUE, UtilityEvaluator},
};
use muster_model::{catalog::UnitClass, index::GroupIndex, position::Position};
use smallvec::SmallVec;

/// One medic covers this many infantry.
const SUPPORT_PER_INFANTRY: f64 = 8.0;
/// One medic covers this many grenadiers.
const SUPPORT_PER_GRENADIER: f64 = 4.0;
/// Floor on the support demand, so a group without demand divides cleanly.
const MIN_SUPPORT_DEMAND: f64 = 0.25;
/// A group without support still fights at 40% efficiency.
const MIN_SUPPORT_EFFICIENCY: f64 = 0.4;
/// Mean pairwise distance below which a group is not penalized.
const COHESION_RADIUS: f64 = 50.0;
/// A fully scattered group keeps half its value.
const MIN_DISTANCE_PENALTY: f64 = 0.5;
/// Artillery contribution to the primary group.
const ARTILLERY_DISCOUNT: f64 = 0.75;
/// A secondary group above 1/3 of the assigned units is penalized.
const SECONDARY_OVERSIZE_FACTOR: f64 = 3.0;

/// Per-group aggregation of unit counts and positions.
#[derive(Clone, Debug, Default)]
struct GroupTally {
    counts: [u32; UnitClass::COUNT],
    positions: SmallVec<[Position; 16]>,
}

impl GroupTally {
    #[inline]
    fn record(&mut self, unit: &AssignedUnit) {
        self.counts[unit.class().index()] += 1;
        self.positions.push(unit.position());
    }

    #[inline]
    fn count(&self, class: UnitClass) -> f64 {
        self.counts[class.index()] as f64
    }

    #[inline]
    fn mass(&self) -> f64 {
        self.counts.iter().map(|&c| c as f64).sum()
    }

    /// Mean Euclidean distance over all unordered position pairs, 0 with
    /// fewer than two positions.
    fn mean_pairwise_distance(&self) -> f64 {
        let n = self.positions.len();
        if n < 2 {
            return 0.0;
        }

        let mut sum = 0.0;
        for (i, a) in self.positions.iter().enumerate() {
            for b in &self.positions[i + 1..] {
                sum += a.distance_to(b);
            }
        }

        let num_pairs = (n * (n - 1) / 2) as f64;
        sum / num_pairs
    }
}

/// The default objective of the Muster solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SquadCohesionEvaluator;

impl SquadCohesionEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Fraction of a group's living value it actually realizes, given its
    /// medic coverage.
    #[inline]
    fn support_efficiency(tally: &GroupTally) -> f64 {
        let demand = tally.count(UnitClass::Infantry) / SUPPORT_PER_INFANTRY
            + tally.count(UnitClass::Grenadier) / SUPPORT_PER_GRENADIER;
        (tally.count(UnitClass::Medic) / demand.max(MIN_SUPPORT_DEMAND))
            .clamp(MIN_SUPPORT_EFFICIENCY, 1.0)
    }

    #[inline]
    fn living_value(tally: &GroupTally) -> f64 {
        let living = tally.count(UnitClass::Infantry)
            + tally.count(UnitClass::Grenadier)
            + tally.count(UnitClass::Medic);
        Self::support_efficiency(tally) * living
    }

    #[inline]
    fn distance_penalty(tally: &GroupTally) -> f64 {
        (COHESION_RADIUS / tally.mean_pairwise_distance().max(1.0))
            .clamp(MIN_DISTANCE_PENALTY, 1.0)
    }

    #[inline]
    fn primary_utility(tally: &GroupTally) -> f64 {
        let modifiers = MAX_UNIT_VALUE * Self::distance_penalty(tally);
        (Self::living_value(tally) + ARTILLERY_DISCOUNT * tally.count(UnitClass::Artillery))
            * modifiers
    }

    #[inline]
    fn secondary_utility(tally: &GroupTally, total_assigned: usize) -> f64 {
        let size_weight = (total_assigned as f64
            / (SECONDARY_OVERSIZE_FACTOR * tally.mass()).max(1.0))
        .min(1.0)
        .clamp(0.0, 1.0);

        let modifiers = size_weight * MAX_UNIT_VALUE * Self::distance_penalty(tally);
        // Artillery is deliberately not discounted here; the asymmetry with
        // the primary group is part of the objective.
        (Self::living_value(tally) + tally.count(UnitClass::Artillery)) * modifiers
    }
}

impl UtilityEvaluator for SquadCohesionEvaluator {
    fn name(&self) -> &str {
        "SquadCohesionEvaluator"
    }

    fn evaluate(&self, units: &[AssignedUnit]) -> f64 {
        let mut primary = GroupTally::default();
        let mut secondary = GroupTally::default();

        for unit in units {
            match unit.group() {
                GroupIndex::PRIMARY => primary.record(unit),
                GroupIndex::SECONDARY => secondary.record(unit),
                // Further groups carry no utility of their own.
                _ => {}
            }
        }

        Self::primary_utility(&primary) + Self::secondary_utility(&secondary, units.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::{
        catalog::{UnitCatalog, UnitTypeId},
        index::AgentIndex,
        roster::{Roster, RosterBuilder},
    };

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

    /// Builds a roster plus units from `(type, group, x, y)` tuples.
    fn units_of(layout: &[(UnitTypeId, GroupIndex, f64, f64)]) -> (Roster, Vec<AssignedUnit>) {
        let mut builder = RosterBuilder::new(catalog());
        for &(unit_type, _, x, y) in layout {
            builder.add_agent(unit_type, Position::new(x, y));
        }
        let roster = builder.build().expect("test roster should validate");

        let units = layout
            .iter()
            .enumerate()
            .map(|(index, &(_, group, _, _))| {
                AssignedUnit::from_roster(&roster, AgentIndex::new(index), group)
            })
            .collect();

        (roster, units)
    }

    #[test]
    fn test_empty_sequence_scores_zero() {
        let evaluator = SquadCohesionEvaluator::new();
        assert_eq!(evaluator.evaluate(&[]), 0.0);
    }

    #[test]
    fn test_supported_infantry_scores_at_full_efficiency() {
        // 3 infantry + 2 medics, co-located, all primary. Demand is
        // 3/8 = 0.375, so 2 medics give full efficiency: 1.0 * 5 * 100 = 500.
        let (_, units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 10.0, 10.0),
            (INFANTRY, GroupIndex::PRIMARY, 10.0, 10.0),
            (INFANTRY, GroupIndex::PRIMARY, 10.0, 10.0),
            (MEDIC, GroupIndex::PRIMARY, 10.0, 10.0),
            (MEDIC, GroupIndex::PRIMARY, 10.0, 10.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_infantry_drops_to_minimum_efficiency() {
        // 2 infantry, no medics, co-located primary: efficiency clamps to
        // 0.4, so the value is 0.4 * 2 * 100 = 80.
        let (_, units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_scattered_group_keeps_half_its_value() {
        // Same two infantry but 200 apart: the penalty bottoms out at 0.5.
        let (_, units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (INFANTRY, GroupIndex::PRIMARY, 200.0, 0.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_within_cohesion_radius_is_not_penalized() {
        // 40 apart is inside the 50 radius: 50/40 clamps to 1.0.
        let (_, units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (INFANTRY, GroupIndex::PRIMARY, 40.0, 0.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_artillery_discounted_in_primary_only() {
        let evaluator = SquadCohesionEvaluator::new();

        // 2 artillery primary, co-located: (0 + 0.75 * 2) * 100 = 150.
        let (_, primary_units) = units_of(&[
            (ARTILLERY, GroupIndex::PRIMARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::PRIMARY, 0.0, 0.0),
        ]);
        assert!((evaluator.evaluate(&primary_units) - 150.0).abs() < 1e-9);

        // 2 artillery secondary, co-located, 2 assigned in total:
        // size weight is min(2 / 6, 1) = 1/3, value (0 + 2) * (1/3) * 100.
        let (_, secondary_units) = units_of(&[
            (ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0),
        ]);
        assert!((evaluator.evaluate(&secondary_units) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_secondary_group_is_penalized() {
        // 5 infantry primary + 4 artillery secondary, co-located.
        // Primary: 0.4 * 5 * 100 = 200.
        // Secondary: mass 4, size weight min(9 / 12, 1) = 0.75, so
        // 4 * 0.75 * 100 = 300.
        let mut layout = vec![(INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0); 5];
        layout.extend(vec![(ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0); 4]);
        let (_, units) = units_of(&layout);

        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_optimum_of_reference_scenario() {
        // 3 infantry + 2 medics + 1 artillery primary, 3 artillery secondary,
        // co-located: 575 + 300 = 875.
        let (_, units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (MEDIC, GroupIndex::PRIMARY, 0.0, 0.0),
            (MEDIC, GroupIndex::PRIMARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::PRIMARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0),
            (ARTILLERY, GroupIndex::SECONDARY, 0.0, 0.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        assert!((evaluator.evaluate(&units) - 875.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_invariant_under_reordering() {
        let (_, mut units) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (MEDIC, GroupIndex::PRIMARY, 30.0, 10.0),
            (ARTILLERY, GroupIndex::SECONDARY, 80.0, 80.0),
            (GRENADIER, GroupIndex::SECONDARY, 90.0, 70.0),
            (INFANTRY, GroupIndex::PRIMARY, 20.0, 5.0),
        ]);
        let evaluator = SquadCohesionEvaluator::new();
        let reference = evaluator.evaluate(&units);

        units.reverse();
        assert!((evaluator.evaluate(&units) - reference).abs() < 1e-9);

        units.swap(0, 2);
        units.swap(1, 4);
        assert!((evaluator.evaluate(&units) - reference).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_non_negative_and_finite_over_count_grid() {
        let evaluator = SquadCohesionEvaluator::new();
        let types = [INFANTRY, GRENADIER, MEDIC, ARTILLERY];

        // Every distribution of 0..=2 units per class per group.
        for mask in 0u32..6561 {
            let mut layout = Vec::new();
            let mut remainder = mask;
            for group in [GroupIndex::PRIMARY, GroupIndex::SECONDARY] {
                for &unit_type in &types {
                    let count = remainder % 3;
                    remainder /= 3;
                    for _ in 0..count {
                        layout.push((unit_type, group, 0.0, 0.0));
                    }
                }
            }
            if layout.is_empty() {
                continue;
            }

            let (_, units) = units_of(&layout);
            let score = evaluator.evaluate(&units);
            assert!(score.is_finite(), "score must be finite for mask {mask}");
            assert!(score >= 0.0, "score must be non-negative for mask {mask}");
        }
    }

    #[test]
    fn test_single_group_assignments_leave_other_group_at_zero() {
        let evaluator = SquadCohesionEvaluator::new();

        // All primary: the secondary term contributes exactly 0.
        let (_, all_primary) = units_of(&[
            (INFANTRY, GroupIndex::PRIMARY, 0.0, 0.0),
            (MEDIC, GroupIndex::PRIMARY, 0.0, 0.0),
        ]);
        // 0.4 is irrelevant here: demand 1/8, one medic => efficiency 1.0.
        assert!((evaluator.evaluate(&all_primary) - 200.0).abs() < 1e-9);

        // All secondary: the primary term contributes exactly 0.
        let (_, all_secondary) = units_of(&[
            (INFANTRY, GroupIndex::SECONDARY, 0.0, 0.0),
            (MEDIC, GroupIndex::SECONDARY, 0.0, 0.0),
        ]);
        // Mass 2, size weight min(2 / 6, 1) = 1/3: 2 * 100 / 3.
        assert!((evaluator.evaluate(&all_secondary) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_pairwise_distance_averages_all_pairs() {
        let mut tally = GroupTally::default();
        assert_eq!(tally.mean_pairwise_distance(), 0.0);

        tally.positions.push(Position::new(0.0, 0.0));
        assert_eq!(tally.mean_pairwise_distance(), 0.0);

        // Distances: 3, 4, 5 => mean 4.
        tally.positions.push(Position::new(3.0, 0.0));
        tally.positions.push(Position::new(3.0, 4.0));
        tally.counts[UnitClass::Infantry.index()] = 3;
        assert!((tally.mean_pairwise_distance() - 4.0).abs() < 1e-9);
    }
}
