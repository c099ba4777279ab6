// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cooperative, priority-driven scheduler.
//!
//! Every [`Scheduler::tick`] runs at most one task: the highest-priority enabled task whose period
//! has elapsed. Equal priorities go to the task registered first. A task runs to completion, so
//! anything that busy-waits inside a task stalls the whole loop until it returns.
//!
//! Tasks are identified by a closed kind type `K` (normally an enum) and run through the owning
//! context's [`Dispatch`] implementation.

use heapless::Vec;
use log::{info, warn};

use crate::sched::task::{Priority, SchedulerError, Task, TaskState};
use crate::time::elapsed;

/// Task table size.
pub const MAX_TASKS: usize = 10;

/// Runs a task of kind `K` against the owning context.
pub trait Dispatch<K> {
    fn run(&mut self, task: K, now: u32);
}

pub struct Scheduler<K, const N: usize = MAX_TASKS> {
    tasks: Vec<Task<K>, N>,
}

impl<K: Copy, const N: usize> Scheduler<K, N> {
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task. It becomes due once `period_ms` has passed since tick 0.
    pub fn register(
        &mut self,
        kind: K,
        period_ms: u32,
        priority: Priority,
        name: &'static str,
    ) -> Result<(), SchedulerError> {
        if self.position(name).is_some() {
            warn!("task '{}' already registered", name);
            return Err(SchedulerError::DuplicateName);
        }

        let task = Task {
            kind,
            name,
            period_ms,
            last_run: 0,
            priority,
            state: TaskState::Ready,
            enabled: true,
        };
        self.tasks.push(task).map_err(|_| {
            warn!("task table full, '{}' not registered", name);
            SchedulerError::TableFull
        })?;

        info!(
            "task '{}' registered: every {} ms, {:?}",
            name, period_ms, priority
        );
        Ok(())
    }

    /// Run the most urgent due task, if any. Returns the kind that ran.
    pub fn tick<C: Dispatch<K>>(&mut self, now: u32, ctx: &mut C) -> Option<K> {
        let mut best: Option<(usize, Priority)> = None;
        for (i, t) in self.tasks.iter().enumerate() {
            if !t.enabled || t.state != TaskState::Ready {
                continue;
            }
            if elapsed(now, t.last_run) < t.period_ms {
                continue;
            }
            match best {
                Some((_, p)) if t.priority <= p => {}
                _ => best = Some((i, t.priority)),
            }
        }

        let (index, _) = best?;
        let kind = {
            let task = &mut self.tasks[index];
            task.state = TaskState::Running;
            task.last_run = now;
            task.kind
        };

        ctx.run(kind, now);

        self.tasks[index].state = TaskState::Ready;
        Some(kind)
    }

    /// Stop scheduling `name` until resumed.
    pub fn suspend(&mut self, name: &str) -> Result<(), SchedulerError> {
        let task = self.find_mut(name)?;
        task.enabled = false;
        task.state = TaskState::Suspended;
        Ok(())
    }

    /// Re-enable `name`. Its next run is a full period after `now`.
    pub fn resume(&mut self, name: &str, now: u32) -> Result<(), SchedulerError> {
        let task = self.find_mut(name)?;
        task.enabled = true;
        task.state = TaskState::Ready;
        task.last_run = now;
        Ok(())
    }

    /// Remove `name`, keeping the remaining tasks in registration order.
    pub fn delete(&mut self, name: &str) -> Result<(), SchedulerError> {
        let index = self.position(name).ok_or(SchedulerError::NotFound)?;
        self.tasks.remove(index);
        Ok(())
    }

    pub fn task(&self, name: &str) -> Option<&Task<K>> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task<K>> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Dump the task table to the log.
    pub fn log_table(&self, now: u32) {
        info!("{} task(s) at {} ms", self.tasks.len(), now);
        for t in self.tasks.iter() {
            info!(
                "  {:<8} {:>5} ms {:?} {:?} last {} ms ago",
                t.name,
                t.period_ms,
                t.priority,
                t.state,
                elapsed(now, t.last_run)
            );
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Task<K>, SchedulerError> {
        self.tasks
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or(SchedulerError::NotFound)
    }
}

impl<K: Copy, const N: usize> Default for Scheduler<K, N> {
    fn default() -> Self {
        Self::new()
    }
}
