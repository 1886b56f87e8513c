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

//! Periodic progress logging for long search runs.
//!
//! Prints a header when the search starts, then one table line per logging
//! interval. The clock is only consulted on steps selected by a bitmask
//! filter, keeping the hot loop cheap.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use muster_model::{assignment::Assignment, roster::Roster};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
    solutions_found: u64,
    best_objective: Option<f64>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            steps: 0,
            solutions_found: 0,
            best_objective: None,
        }
    }

    #[inline(always)]
    fn print_header(&self) {
        println!(
            "{:<9} | {:<14} | {:<14} | {:<10}",
            "Elapsed", "Steps", "Best Value", "Solutions"
        );
        println!("{}", "-".repeat(56));
    }

    #[inline(always)]
    fn log_line(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best_obj_str = if let Some(value) = self.best_objective {
            format!("{:.2}", value)
        } else {
            "None".to_string()
        };

        let elapsed_field = format!("{:.1}s", elapsed);

        println!(
            "{:<9} | {:<14} | {:<14} | {:<10}",
            elapsed_field, self.steps, best_obj_str, self.solutions_found
        );

        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, roster: &Roster) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        self.solutions_found = 0;
        self.best_objective = None; // Reset
        println!("Searching assignment for {} agents", roster.num_agents());
        self.print_header();
    }

    fn on_exit_search(&mut self) {
        println!("{}", "-".repeat(56));
        println!("Search finished.");
    }

    fn on_solution_found(&mut self, assignment: &Assignment) {
        self.solutions_found += 1;
        self.best_objective = Some(assignment.objective_value());
    }

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line();
        }
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_monitor_never_terminates() {
        let mut mon = LogMonitor::default();
        for _ in 0..100 {
            mon.on_step();
        }
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_solution_updates_best_objective() {
        let mut mon = LogMonitor::default();
        assert_eq!(mon.best_objective, None);

        let assignment = Assignment::new(321.5, Vec::new());
        mon.on_solution_found(&assignment);
        assert_eq!(mon.best_objective, Some(321.5));
        assert_eq!(mon.solutions_found, 1);
    }
}
