use crate::domain::{format_date, resolve_tags, Tag, Task};
use crate::persistence::{atomic_write, report_file};
use crate::report::stats::{
    calculate_dashboard_stats, calculate_quick_stats, calculate_tag_summaries, upcoming_tasks,
};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Render the task overview as markdown
pub fn render_report(tasks: &[Task], tags: &[Tag], now: DateTime<Local>) -> String {
    let stats = calculate_dashboard_stats(tasks, now);
    let quick = calculate_quick_stats(tasks, now);
    let upcoming = upcoming_tasks(tasks, now);
    let tag_summaries = calculate_tag_summaries(tasks, tags);

    let mut report = String::new();

    report.push_str(&format!("# Task Overview - {}\n\n", now.format("%Y-%m-%d")));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Total Tasks:** {}\n", stats.total));
    report.push_str(&format!("- **Completed:** {}\n", stats.completed));
    report.push_str(&format!("- **Pending:** {}\n", stats.pending));
    report.push_str(&format!("- **Overdue:** {}\n", stats.overdue));
    report.push_str(&format!("- **Completion Rate:** {}%\n\n", stats.completion_rate));

    // Quick Stats Section
    report.push_str("## Quick Stats\n\n");
    report.push_str(&format!("- **Due Today:** {}\n", quick.due_today));
    report.push_str(&format!("- **Due This Week:** {}\n", quick.due_this_week));
    report.push_str(&format!("- **High Priority Open:** {}\n\n", quick.high_priority));

    // Upcoming Section
    report.push_str("## Upcoming Tasks\n\n");
    if upcoming.is_empty() {
        report.push_str("No upcoming tasks in the next 7 days\n\n");
    } else {
        for task in &upcoming {
            report.push_str(&format!(
                "- **{}** ({}) - Due: {}\n",
                task.title,
                task.priority,
                format_date(task.due_date)
            ));
        }
        report.push('\n');
    }

    // Tag Section
    let used: Vec<_> = tag_summaries.iter().filter(|s| s.total > 0).collect();
    if !used.is_empty() {
        report.push_str("## Tags\n\n");
        for summary in used {
            report.push_str(&format!(
                "- **{}:** {} tasks ({} done)\n",
                summary.name, summary.total, summary.completed
            ));
        }
        report.push('\n');
    }

    // Open tasks
    let open: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    if !open.is_empty() {
        report.push_str("## Open Tasks\n\n");
        for task in open {
            let names: Vec<&str> = resolve_tags(task, tags).iter().map(|t| t.name.as_str()).collect();
            let tags_str = if names.is_empty() {
                String::new()
            } else {
                format!(" ({})", names.join(", "))
            };
            report.push_str(&format!("- [ ] **{}**{}\n", task.title, tags_str));
        }
        report.push('\n');
    }

    report
}

/// Write the overview report, by default to `report-YYYY-MM-DD.md` in the data directory
pub fn generate_report(
    tasks: &[Task],
    tags: &[Tag],
    now: DateTime<Local>,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let output = match output_path {
        Some(path) => path,
        None => report_file(now.date_naive())?,
    };

    atomic_write(&output, &render_report(tasks, tags, now))?;
    Ok(output)
}
