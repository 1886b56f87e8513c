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

use crate::index::{AgentIndex, GroupIndex};

/// The final group assignment for a roster.
///
/// This struct uses a Structure of Arrays (SoA) layout: `groups[a]` is the
/// group assigned to agent `a` of the roster's fixed ordering. Mapping the
/// labels back to live domain objects (by index, or by matching on unit type
/// and position) is the host's responsibility.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// The utility value of this assignment.
    objective_value: f64,

    /// The assigned group for each agent.
    groups: Vec<GroupIndex>,
}

impl Assignment {
    /// Constructs a new `Assignment`.
    #[inline]
    pub fn new(objective_value: f64, groups: Vec<GroupIndex>) -> Self {
        Self {
            objective_value,
            groups,
        }
    }

    /// Returns the assigned group for a specific agent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `agent` is out of bounds.
    #[inline]
    pub fn group_for_agent(&self, agent: AgentIndex) -> GroupIndex {
        let index = agent.get();
        debug_assert!(
            index < self.num_agents(),
            "called `Assignment::group_for_agent` with agent index out of bounds: the len is {} but the index is {}",
            self.num_agents(),
            index
        );

        self.groups[index]
    }

    /// Returns the number of agents in this assignment.
    #[inline]
    pub fn num_agents(&self) -> usize {
        self.groups.len()
    }

    /// Returns the utility value of this assignment.
    #[inline]
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Returns a slice of assigned groups for all agents.
    #[inline]
    pub fn groups(&self) -> &[GroupIndex] {
        &self.groups
    }

    /// Returns an iterator over the agents assigned to the given group.
    #[inline]
    pub fn agents_in_group(&self, group: GroupIndex) -> impl Iterator<Item = AgentIndex> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(move |(_, &g)| g == group)
            .map(|(index, _)| AgentIndex::new(index))
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Assignment Summary")?;
        writeln!(f, "   Objective Value: {:.2}", self.objective_value)?;
        writeln!(f)?;

        if self.num_agents() == 0 {
            writeln!(f, "   (No agents assigned)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10}", "Agent", "Group")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (index, group) in self.groups.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", index, group.to_string())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gi(i: usize) -> GroupIndex {
        GroupIndex::new(i)
    }

    #[test]
    fn test_new_and_basic_accessors() {
        let groups = vec![gi(0), gi(1), gi(0)];
        let assignment = Assignment::new(450.0, groups.clone());

        assert_eq!(assignment.objective_value(), 450.0);
        assert_eq!(assignment.num_agents(), 3);
        assert_eq!(assignment.groups(), &groups[..]);

        assert_eq!(
            assignment.group_for_agent(AgentIndex::new(0)),
            GroupIndex::PRIMARY
        );
        assert_eq!(
            assignment.group_for_agent(AgentIndex::new(1)),
            GroupIndex::SECONDARY
        );
        assert_eq!(
            assignment.group_for_agent(AgentIndex::new(2)),
            GroupIndex::PRIMARY
        );
    }

    #[test]
    fn test_empty_assignment_is_valid() {
        let assignment = Assignment::new(0.0, Vec::new());
        assert_eq!(assignment.objective_value(), 0.0);
        assert_eq!(assignment.num_agents(), 0);
        assert_eq!(assignment.groups(), &[]);
    }

    #[test]
    fn test_agents_in_group_filters_by_label() {
        let assignment = Assignment::new(100.0, vec![gi(1), gi(0), gi(1), gi(1)]);

        let secondary: Vec<usize> = assignment
            .agents_in_group(GroupIndex::SECONDARY)
            .map(|a| a.get())
            .collect();
        assert_eq!(secondary, vec![0, 2, 3]);

        let primary: Vec<usize> = assignment
            .agents_in_group(GroupIndex::PRIMARY)
            .map(|a| a.get())
            .collect();
        assert_eq!(primary, vec![1]);
    }

    #[test]
    fn test_display_formatting_example() {
        let assignment = Assignment::new(250.0, vec![gi(0), gi(1)]);

        let displayed = format!("{}", assignment);

        let mut expected = String::new();
        expected.push_str("Assignment Summary\n");
        expected.push_str("   Objective Value: 250.00\n");
        expected.push('\n');
        expected.push_str("   Agent      | Group     \n");
        expected.push_str("   -----------+-----------\n");
        expected.push_str("   0          | primary   \n");
        expected.push_str("   1          | secondary \n");

        assert_eq!(displayed, expected);
    }
}
