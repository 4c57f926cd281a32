//! Plain-text rendering of tasks, tags and statistics for the terminal.

pub mod styles;

use crate::domain::{
    format_date, is_overdue, page_title, priority_meta, resolve_tags, time_progress, Filter, Tag,
    Task, TaskCounts, Urgency,
};
use crate::focus::PomodoroTimer;
use crate::report::{DashboardStats, QuickStats};
use chrono::{DateTime, Local};
use styles::{
    done_style, muted_style, overdue_style, priority_style, tag_style, title_style, urgency_style,
};

/// Number of id characters shown in lists
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// One-line summary of a task
pub fn render_task_line(task: &Task, tags: &[Tag], now: DateTime<Local>) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let title = if task.completed {
        done_style().apply(task.title.as_str()).to_string()
    } else {
        task.title.clone()
    };
    let meta = priority_meta(task.priority);

    let mut line = format!(
        "{} {} {} {}",
        check,
        muted_style().apply(short_id(&task.id)),
        title,
        priority_style(task.priority).apply(format!("({})", meta.label)),
    );

    if task.due_date.is_some() {
        line.push_str(&format!("  due {}", format_date(task.due_date)));
        if !task.completed && is_overdue(task.due_date, now) {
            line.push_str(&format!(" {}", overdue_style().apply("OVERDUE")));
        }
    }
    if task.reminder_time.is_some() && !task.completed {
        line.push_str(&format!("  ⏰ {}", format_date(task.reminder_time)));
    }
    for tag in resolve_tags(task, tags) {
        line.push_str(&format!(" {}", tag_style(&tag.color).apply(format!("#{}", tag.name))));
    }
    line
}

/// Heading plus one line per task
pub fn render_task_list(
    filter: &Filter,
    tasks: &[Task],
    tags: &[Tag],
    now: DateTime<Local>,
) -> String {
    let mut out = format!(
        "{} ({})\n",
        title_style().apply(page_title(filter, tags)),
        tasks.len()
    );
    if tasks.is_empty() {
        out.push_str("  No tasks found\n");
    }
    for task in tasks {
        out.push_str(&render_task_line(task, tags, now));
        out.push('\n');
    }
    out
}

/// Full details of a single task
pub fn render_task_detail(task: &Task, tags: &[Tag], now: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", title_style().apply(task.title.as_str())));
    out.push_str(&format!("ID:          {}\n", task.id));
    out.push_str(&format!(
        "Status:      {}\n",
        if task.completed { "Completed" } else { "Pending" }
    ));
    out.push_str(&format!("Priority:    {}\n", priority_meta(task.priority).label));
    if !task.description.is_empty() {
        out.push_str(&format!("Description: {}\n", task.description));
    }
    if task.due_date.is_some() {
        out.push_str(&format!("Due:         {}\n", format_date(task.due_date)));
    }
    if let Some(percent) = time_progress(task.created_at, task.due_date, now) {
        let readout = format!("{:.0}% of time used", percent);
        out.push_str(&format!(
            "Progress:    {}\n",
            urgency_style(Urgency::from_percent(percent)).apply(readout)
        ));
    }
    if task.reminder_time.is_some() {
        out.push_str(&format!("Reminder:    {}\n", format_date(task.reminder_time)));
    }
    let names: Vec<&str> = resolve_tags(task, tags).iter().map(|t| t.name.as_str()).collect();
    if !names.is_empty() {
        out.push_str(&format!("Tags:        {}\n", names.join(", ")));
    }
    out.push_str(&format!("Created:     {}\n", format_date(Some(task.created_at))));
    out
}

/// Sidebar counters
pub fn render_counts(counts: &TaskCounts) -> String {
    format!(
        "All Tasks: {}  Pending: {}  Completed: {}  Overdue: {}",
        counts.total, counts.pending, counts.completed, counts.overdue
    )
}

/// Dashboard headline numbers and progress bar
pub fn render_dashboard(stats: &DashboardStats, quick: &QuickStats) -> String {
    const BAR_WIDTH: usize = 20;
    let filled = (stats.completion_rate as usize * BAR_WIDTH) / 100;

    let mut out = format!("{}\n", title_style().apply("Dashboard"));
    out.push_str(&format!(
        "Total: {}  Completed: {}  Pending: {}  Overdue: {}\n",
        stats.total, stats.completed, stats.pending, stats.overdue
    ));
    out.push_str(&format!(
        "Progress: [{}{}] {}%\n",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        stats.completion_rate
    ));
    out.push_str(&format!(
        "Due today: {}  Due this week: {}  High priority: {}\n",
        quick.due_today, quick.due_this_week, quick.high_priority
    ));
    out
}

/// Tag listing with the number of tasks using each tag
pub fn render_tags(tags: &[Tag], tasks: &[Task]) -> String {
    let mut out = format!("{}\n", title_style().apply("Tags"));
    for tag in tags {
        let count = tasks.iter().filter(|t| t.has_tag(&tag.id)).count();
        out.push_str(&format!(
            "{} {} ({})\n",
            muted_style().apply(short_id(&tag.id)),
            tag_style(&tag.color).apply(tag.name.as_str()),
            count
        ));
    }
    out
}

/// Single status line for the focus timer
pub fn render_focus_status(timer: &PomodoroTimer) -> String {
    format!(
        "{} {} - {} ({:.0}%)",
        timer.mode.name(),
        timer.format_time(),
        timer.task_title.as_deref().unwrap_or("No task selected"),
        timer.progress_percent()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, Priority};
    use chrono::Duration;

    fn sample(now: DateTime<Local>) -> Task {
        let data = NewTask {
            priority: Priority::High,
            due_date: Some(now - Duration::hours(1)),
            tags: vec!["1".to_string(), "gone".to_string()],
            ..NewTask::titled("Pay rent")
        };
        Task::from_new(data, now - Duration::days(1)).unwrap()
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abcdefghijkl"), "abcdefgh");
        assert_eq!(short_id("1"), "1");
    }

    #[test]
    fn test_render_task_line() {
        let now = Local::now();
        let task = sample(now);
        let line = render_task_line(&task, &Tag::defaults(), now);

        assert!(line.starts_with("[ ]"));
        assert!(line.contains("Pay rent"));
        assert!(line.contains("(High)"));
        assert!(line.contains("OVERDUE"));
        assert!(line.contains("#Work"));
        assert!(!line.contains("gone"));
    }

    #[test]
    fn test_completed_task_is_not_overdue() {
        let now = Local::now();
        let mut task = sample(now);
        task.completed = true;
        let line = render_task_line(&task, &[], now);
        assert!(line.starts_with("[x]"));
        assert!(!line.contains("OVERDUE"));
    }

    #[test]
    fn test_render_task_list_empty() {
        let out = render_task_list(&Filter::Overdue, &[], &[], Local::now());
        assert!(out.contains("Overdue Tasks"));
        assert!(out.contains("No tasks found"));
    }

    #[test]
    fn test_render_task_detail() {
        let now = Local::now();
        let out = render_task_detail(&sample(now), &Tag::defaults(), now);
        assert!(out.contains("Priority:    High"));
        assert!(out.contains("Tags:        Work\n"));
        assert!(out.contains("100% of time used"));
    }

    #[test]
    fn test_render_counts() {
        let counts = TaskCounts {
            total: 4,
            pending: 3,
            completed: 1,
            overdue: 2,
        };
        assert_eq!(
            render_counts(&counts),
            "All Tasks: 4  Pending: 3  Completed: 1  Overdue: 2"
        );
    }

    #[test]
    fn test_render_dashboard_bar() {
        let stats = DashboardStats {
            total: 4,
            completed: 2,
            pending: 2,
            overdue: 0,
            completion_rate: 50,
        };
        let quick = QuickStats {
            due_today: 0,
            due_this_week: 1,
            high_priority: 0,
        };
        let out = render_dashboard(&stats, &quick);
        assert!(out.contains("[##########----------] 50%"));
    }

    #[test]
    fn test_render_focus_status() {
        let timer = PomodoroTimer::default();
        assert_eq!(
            render_focus_status(&timer),
            "Focus Time 25:00 - No task selected (0%)"
        );
    }
}
