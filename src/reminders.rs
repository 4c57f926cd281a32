//! One-shot reminder timers keyed by task and reminder time.
//!
//! Timers are deadlines owned by the scheduler; the event loop delivers the
//! ones that are due through [`ReminderScheduler::fire_due`]. Cancelling a
//! timer removes it from the map, so a cancelled timer can never fire.

use crate::domain::Task;
use crate::notifications::Notifier;
use chrono::{DateTime, Local};
use log::{debug, info};
use std::collections::BTreeMap;

const DEFAULT_REMINDER_BODY: &str = "You have a task reminder!";

/// Identity of a scheduled reminder
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderKey {
    pub task_id: String,
    pub reminder_time: DateTime<Local>,
}

/// Opaque handle of an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct ArmedTimer {
    handle: TimerHandle,
    deadline: DateTime<Local>,
    title: String,
    body: String,
}

/// Bookkeeping for live reminder timers
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    entries: BTreeMap<ReminderKey, ArmedTimer>,
    next_handle: u64,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer for the task's reminder.
    ///
    /// Nothing happens when the task is completed, has no reminder, the
    /// reminder is not in the future, or the same reminder is already armed.
    pub fn schedule(&mut self, task: &Task, now: DateTime<Local>) -> Option<TimerHandle> {
        if task.completed {
            return None;
        }
        let reminder_time = task.reminder_time?;

        let delay = reminder_time - now;
        if delay <= chrono::Duration::zero() {
            debug!(
                "event=reminder_skip module=reminders reason=past task_id={}",
                task.id
            );
            return None;
        }

        let key = ReminderKey {
            task_id: task.id.clone(),
            reminder_time,
        };
        if self.entries.contains_key(&key) {
            return None;
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let body = if task.description.is_empty() {
            DEFAULT_REMINDER_BODY.to_string()
        } else {
            task.description.clone()
        };
        self.entries.insert(
            key,
            ArmedTimer {
                handle,
                deadline: now + delay,
                title: format!("Reminder: {}", task.title),
                body,
            },
        );

        debug!(
            "event=reminder_armed module=reminders task_id={} delay_secs={}",
            task.id,
            delay.num_seconds()
        );
        Some(handle)
    }

    /// Cancel every timer belonging to `task_id`. Returns how many were removed.
    pub fn cancel(&mut self, task_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.task_id != task_id);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(
                "event=reminder_cancel module=reminders task_id={} count={}",
                task_id, removed
            );
        }
        removed
    }

    /// Cancel any existing timer for the task, then schedule from its current data
    pub fn reschedule(&mut self, task: &Task, now: DateTime<Local>) -> Option<TimerHandle> {
        self.cancel(&task.id);
        self.schedule(task, now)
    }

    /// Arm timers for every pending task with a reminder. Already armed
    /// reminders are left alone. Returns how many new timers were armed.
    pub fn resync(&mut self, tasks: &[Task], now: DateTime<Local>) -> usize {
        tasks
            .iter()
            .filter(|t| !t.completed && t.reminder_time.is_some())
            .filter_map(|t| self.schedule(t, now))
            .count()
    }

    /// Drop timers that no longer match the task collection: the task is
    /// gone, completed, or its reminder time moved.
    pub fn retain_current(&mut self, tasks: &[Task]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| {
            tasks.iter().any(|t| {
                t.id == key.task_id && !t.completed && t.reminder_time == Some(key.reminder_time)
            })
        });
        before - self.entries.len()
    }

    /// Deliver every timer whose deadline has passed, earliest first.
    /// Each timer fires once and is removed.
    pub fn fire_due(&mut self, now: DateTime<Local>, notifier: &dyn Notifier) -> usize {
        let mut due: Vec<(ReminderKey, DateTime<Local>)> = self
            .entries
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .map(|(key, timer)| (key.clone(), timer.deadline))
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);

        let mut fired = 0;
        for (key, _) in due {
            if let Some(timer) = self.entries.remove(&key) {
                info!(
                    "event=reminder_fired module=reminders task_id={} handle={}",
                    key.task_id, timer.handle.0
                );
                notifier.notify(&timer.title, &timer.body);
                fired += 1;
            }
        }
        fired
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.entries.values().map(|t| t.deadline).min()
    }

    pub fn is_scheduled(&self, task_id: &str) -> bool {
        self.entries.keys().any(|k| k.task_id == task_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
