use super::enums::{Filter, Priority, PriorityMeta, SortKey};
use super::task::{Tag, Task};
use chrono::{DateTime, Local};
use std::cmp::Ordering;

/// Format a timestamp for display, e.g. "18 Oct 2026, 14:30". Absent dates format as "".
pub fn format_date(date: Option<DateTime<Local>>) -> String {
    match date {
        Some(d) => d.format("%d %b %Y, %H:%M").to_string(),
        None => String::new(),
    }
}

/// A due date is overdue once it lies strictly in the past
pub fn is_overdue(due_date: Option<DateTime<Local>>, now: DateTime<Local>) -> bool {
    due_date.is_some_and(|due| due < now)
}

pub fn priority_meta(priority: Priority) -> PriorityMeta {
    priority.meta()
}

fn matches_filter(task: &Task, filter: &Filter, now: DateTime<Local>) -> bool {
    match filter {
        Filter::All => true,
        Filter::Completed => task.completed,
        // Overdue tasks are still pending
        Filter::Pending => !task.completed,
        Filter::Overdue => !task.completed && is_overdue(task.due_date, now),
        Filter::ByTag(tag_id) => task.has_tag(tag_id),
    }
}

/// Select the tasks belonging to a view. The input is left untouched.
pub fn filter_tasks(tasks: &[Task], filter: &Filter, now: DateTime<Local>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| matches_filter(task, filter, now))
        .cloned()
        .collect()
}

/// Compare titles the way a human reads them: case-insensitive first,
/// lowercase before uppercase on ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Return a sorted copy of `tasks`. The sort is stable for every key.
pub fn sort_tasks(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut sorted = tasks.to_vec();

    match key {
        SortKey::DueDate => sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Priority => {
            sorted.sort_by(|a, b| b.priority.meta().rank.cmp(&a.priority.meta().rank))
        }
        SortKey::Name => sorted.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortKey::CreatedAt => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    sorted
}

/// Sidebar counters, recomputed on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub fn compute_counts(tasks: &[Task], now: DateTime<Local>) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks
        .iter()
        .filter(|t| !t.completed && is_overdue(t.due_date, now))
        .count();

    TaskCounts {
        total: tasks.len(),
        pending: tasks.len() - completed,
        completed,
        overdue,
    }
}

/// Heading shown above a task view
pub fn page_title(filter: &Filter, tags: &[Tag]) -> String {
    match filter {
        Filter::All => "All Tasks".to_string(),
        Filter::Pending => "Pending Tasks".to_string(),
        Filter::Completed => "Completed Tasks".to_string(),
        Filter::Overdue => "Overdue Tasks".to_string(),
        Filter::ByTag(id) => tags
            .iter()
            .find(|t| &t.id == id)
            .map(|t| format!("{} Tasks", t.name))
            .unwrap_or_else(|| "All Tasks".to_string()),
    }
}

/// Tags of `task` that still exist, in the task's order
pub fn resolve_tags<'a>(task: &Task, tags: &'a [Tag]) -> Vec<&'a Tag> {
    task.tags
        .iter()
        .filter_map(|id| tags.iter().find(|t| &t.id == id))
        .collect()
}

/// Percentage (0..=100) of the window between creation and due date that has elapsed
pub fn time_progress(
    created_at: DateTime<Local>,
    due_date: Option<DateTime<Local>>,
    now: DateTime<Local>,
) -> Option<f64> {
    let due = due_date?;
    let total = (due - created_at).num_milliseconds();
    let elapsed = (now - created_at).num_milliseconds();

    let percent = if total > 0 {
        (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    } else if now > due {
        100.0
    } else {
        0.0
    };
    Some(percent)
}
