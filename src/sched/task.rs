// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Task descriptors.

use core::fmt;

/// Dispatch priority. Higher runs first when several tasks are due.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Idle,
    Low,
    Normal,
    High,
    Critical,
}

/// Lifecycle state of a task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Running,
    Blocked,
    Suspended,
}

/// Registered periodic task.
#[derive(Copy, Clone, Debug)]
pub struct Task<K> {
    pub(crate) kind: K,
    pub(crate) name: &'static str,
    pub(crate) period_ms: u32,
    pub(crate) last_run: u32,
    pub(crate) priority: Priority,
    pub(crate) state: TaskState,
    pub(crate) enabled: bool,
}

impl<K: Copy> Task<K> {
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn last_run(&self) -> u32 {
        self.last_run
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Scheduler control failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// A task with this name is already registered.
    DuplicateName,
    /// No free slot in the task table.
    TableFull,
    /// No task with this name.
    NotFound,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchedulerError::DuplicateName => "duplicate task name",
            SchedulerError::TableFull => "task table full",
            SchedulerError::NotFound => "no such task",
        };
        f.write_str(s)
    }
}
