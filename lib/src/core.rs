//! This module contains the definition of a single processing core
use log::debug;

/// A core is only described by the time at which it next becomes free.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Core {
    pub free_time: i64,
    pub total_proc_time: i64,
}

impl Core {
    pub fn is_idle(&self, current_time: i64) -> bool {
        self.free_time <= current_time
    }

    /// Run `exec_time` units of work from `start_time` and return the finish time.
    ///
    /// A core still busy at `start_time` starts the work once it is free.
    /// Times saturate at `i64::MAX`.
    pub fn allocate(&mut self, start_time: i64, exec_time: i64) -> i64 {
        if !self.is_idle(start_time) {
            debug!(
                "Core is busy until {}, work requested at {} is delayed",
                self.free_time, start_time
            );
        }
        self.free_time = start_time.max(self.free_time).saturating_add(exec_time);
        self.total_proc_time = self.total_proc_time.saturating_add(exec_time);
        self.free_time
    }
}
