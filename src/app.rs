use crate::domain::{
    compute_counts, filter_tasks, sort_tasks, Filter, NewTask, SortKey, Tag, Task, TaskCounts,
    TaskPatch,
};
use crate::error::TaskError;
use crate::logging::{log_event, LogLevel};
use crate::notifications::Notifier;
use crate::persistence::{load, save, KeyValueStore, TAGS_KEY, TASKS_KEY};
use crate::reminders::ReminderScheduler;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde_json::{json, Value};

/// Application state: the task and tag collections plus their reminder timers.
///
/// Every mutation goes through this type. Each one replaces the affected
/// collection, writes it back to the store in full, and keeps the reminder
/// scheduler in step with the new task state.
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    reminders: ReminderScheduler,
    store: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load both collections (falling back to defaults) and arm pending reminders
    pub fn load(store: S, now: DateTime<Local>) -> Self {
        let tasks = load_tasks(&store);
        let tags: Vec<Tag> = load(&store, TAGS_KEY, Tag::defaults());

        let mut app = Self {
            tasks,
            tags,
            reminders: ReminderScheduler::new(),
            store,
        };
        let armed = app.reminders.resync(&app.tasks, now);
        debug!(
            "event=store_loaded module=app tasks={} tags={} reminders={}",
            app.tasks.len(),
            app.tags.len(),
            armed
        );
        app
    }

    /// Re-read the task collection from the store, e.g. after another
    /// process changed it. Timers that no longer match are dropped.
    pub fn reload(&mut self, now: DateTime<Local>) {
        self.tasks = load_tasks(&self.store);
        self.tags = load(&self.store, TAGS_KEY, Tag::defaults());
        let dropped = self.reminders.retain_current(&self.tasks);
        let armed = self.reminders.resync(&self.tasks, now);
        if dropped > 0 || armed > 0 {
            debug!(
                "event=store_reloaded module=app dropped={} armed={}",
                dropped, armed
            );
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolve a full id or an unambiguous id prefix to a task id
    pub fn resolve_id(&self, prefix: &str) -> Result<String, TaskError> {
        let prefix = prefix.trim();
        if let Some(task) = self.find_task(prefix) {
            return Ok(task.id.clone());
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|t| !prefix.is_empty() && t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task.id.clone()),
            (Some(_), Some(_)) => Err(TaskError::AmbiguousTask(prefix.to_string())),
            _ => Err(TaskError::UnknownTask(prefix.to_string())),
        }
    }

    /// Resolve a tag by id or by case-insensitive name
    pub fn resolve_tag_id(&self, name_or_id: &str) -> Result<String, TaskError> {
        let needle = name_or_id.trim();
        self.tags
            .iter()
            .find(|t| t.id == needle)
            .or_else(|| self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(needle)))
            .map(|t| t.id.clone())
            .ok_or_else(|| TaskError::UnknownTag(needle.to_string()))
    }

    /// Create a task and put it at the front of the list
    pub fn add_task(&mut self, data: NewTask, now: DateTime<Local>) -> Result<&Task, TaskError> {
        let task = Task::from_new(data, now).ok_or(TaskError::EmptyTitle)?;

        log_event(
            LogLevel::Info,
            &format!("Task created: {}", task.title),
            json!({
                "taskId": task.id,
                "priority": task.priority.as_str(),
                "hasDueDate": task.due_date.is_some(),
            }),
        );

        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(task);
        tasks.extend(self.tasks.iter().cloned());
        self.commit_tasks(tasks);

        self.reminders.schedule(&self.tasks[0], now);
        Ok(&self.tasks[0])
    }

    /// Apply a patch to a task. Unknown ids and blank titles are ignored.
    pub fn edit_task(&mut self, id: &str, patch: TaskPatch, now: DateTime<Local>) -> bool {
        let Some(current) = self.find_task(id) else {
            return false;
        };
        if patch.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return false;
        }
        let merged = current.merged(&patch);

        // Old timer goes before the new state lands
        self.reminders.reschedule(&merged, now);

        let tasks = self
            .tasks
            .iter()
            .map(|t| if t.id == id { merged.clone() } else { t.clone() })
            .collect();
        self.commit_tasks(tasks);
        info!("event=task_edited module=app task_id={}", id);
        true
    }

    /// Remove a task and cancel its reminders
    pub fn delete_task(&mut self, id: &str) -> bool {
        if self.find_task(id).is_none() {
            return false;
        }

        self.reminders.cancel(id);
        let tasks = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.commit_tasks(tasks);

        log_event(LogLevel::Info, "Task deleted", json!({ "taskId": id }));
        true
    }

    /// Flip a task's completion state. Returns the new state, or `None` for an unknown id.
    pub fn toggle_complete(&mut self, id: &str, now: DateTime<Local>) -> Option<bool> {
        let mut toggled = self.find_task(id)?.clone();
        toggled.completed = !toggled.completed;

        if toggled.completed {
            self.reminders.cancel(id);
        }

        let tasks = self
            .tasks
            .iter()
            .map(|t| if t.id == id { toggled.clone() } else { t.clone() })
            .collect();
        self.commit_tasks(tasks);

        if !toggled.completed {
            self.reminders.schedule(&toggled, now);
        }

        log_event(
            LogLevel::Info,
            if toggled.completed { "Task completed" } else { "Task reopened" },
            json!({ "taskId": id }),
        );
        Some(toggled.completed)
    }

    /// Append a tag
    pub fn add_tag(&mut self, name: &str, color: Option<&str>) -> Result<&Tag, TaskError> {
        let tag = Tag::new(name, color).ok_or(TaskError::EmptyTagName)?;

        let mut tags = self.tags.clone();
        tags.push(tag);
        self.commit_tags(tags);

        info!("event=tag_added module=app count={}", self.tags.len());
        Ok(&self.tags[self.tags.len() - 1])
    }

    /// Remove a tag. Tasks keep the now-dangling id.
    pub fn delete_tag(&mut self, id: &str) -> bool {
        if !self.tags.iter().any(|t| t.id == id) {
            return false;
        }
        let tags = self.tags.iter().filter(|t| t.id != id).cloned().collect();
        self.commit_tags(tags);
        info!("event=tag_deleted module=app tag_id={}", id);
        true
    }

    pub fn counts(&self, now: DateTime<Local>) -> TaskCounts {
        compute_counts(&self.tasks, now)
    }

    /// Filtered and sorted copy of the task list
    pub fn view(&self, filter: &Filter, sort: SortKey, now: DateTime<Local>) -> Vec<Task> {
        sort_tasks(&filter_tasks(&self.tasks, filter, now), sort)
    }

    /// Deliver reminders that are due at `now`.
    ///
    /// When a timer is due the store is re-read first, so a task deleted,
    /// completed or rescheduled by another process never fires a stale timer.
    pub fn fire_due_reminders(&mut self, now: DateTime<Local>, notifier: &dyn Notifier) -> usize {
        if self.reminders.next_deadline().is_some_and(|deadline| deadline <= now) {
            self.reload(now);
        }
        self.reminders.fire_due(now, notifier)
    }

    fn commit_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        save(&mut self.store, TASKS_KEY, &self.tasks);
    }

    fn commit_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
        save(&mut self.store, TAGS_KEY, &self.tags);
    }
}

/// Read the task collection record by record. A record that cannot be
/// read, or whose title is blank, is skipped instead of discarding the rest.
fn load_tasks<S: KeyValueStore>(store: &S) -> Vec<Task> {
    let records: Vec<Value> = load(store, TASKS_KEY, Vec::new());
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Task>(record) {
            Ok(task) if task.title.trim().is_empty() => {
                warn!("event=task_skipped module=app reason=blank_title task_id={}", task.id);
                None
            }
            Ok(task) => Some(task),
            Err(e) => {
                warn!("event=task_skipped module=app reason=invalid error={}", e);
                None
            }
        })
        .collect()
}
