// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cooperative task scheduling.

pub mod scheduler;
pub mod task;

pub use scheduler::{Dispatch, Scheduler, MAX_TASKS};
pub use task::{Priority, SchedulerError, Task, TaskState};
