use crate::domain::{is_overdue, Priority, Tag, Task};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// How far ahead the upcoming list looks
pub const UPCOMING_WINDOW_DAYS: i64 = 7;
/// Maximum number of upcoming tasks shown
pub const UPCOMING_LIMIT: usize = 5;

/// Dashboard headline numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    /// Incomplete and not overdue
    pub pending: usize,
    pub overdue: usize,
    /// Whole percent of tasks completed
    pub completion_rate: u32,
}

/// Counts for the quick-stats panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStats {
    pub due_today: usize,
    pub due_this_week: usize,
    pub high_priority: usize,
}

/// Per-tag task counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub name: String,
    pub total: usize,
    pub completed: usize,
}

/// Calculate dashboard statistics. Unlike the sidebar counts, overdue
/// tasks are not counted as pending here.
pub fn calculate_dashboard_stats(tasks: &[Task], now: DateTime<Local>) -> DashboardStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks
        .iter()
        .filter(|t| !t.completed && is_overdue(t.due_date, now))
        .count();
    let completion_rate = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    DashboardStats {
        total,
        completed,
        pending: total - completed - overdue,
        overdue,
        completion_rate,
    }
}

/// Incomplete tasks due within the next week, soonest first
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Local>) -> Vec<Task> {
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| t.due_date.is_some_and(|due| due >= now && due <= horizon))
        .cloned()
        .collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming.truncate(UPCOMING_LIMIT);
    upcoming
}

/// Sunday-to-Saturday week containing `date`
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    (start, start + Duration::days(6))
}

pub fn calculate_quick_stats(tasks: &[Task], now: DateTime<Local>) -> QuickStats {
    let today = now.date_naive();
    let (week_start, week_end) = week_bounds(today);

    let due_dates = || tasks.iter().filter_map(|t| t.due_date.map(|d| d.date_naive()));

    QuickStats {
        due_today: due_dates().filter(|d| *d == today).count(),
        due_this_week: due_dates().filter(|d| *d >= week_start && *d <= week_end).count(),
        high_priority: tasks
            .iter()
            .filter(|t| t.priority == Priority::High && !t.completed)
            .count(),
    }
}

/// Task counts per existing tag, in tag order. Dangling tag ids on tasks are ignored.
pub fn calculate_tag_summaries(tasks: &[Task], tags: &[Tag]) -> Vec<TagSummary> {
    tags.iter()
        .map(|tag| {
            let tagged = tasks.iter().filter(|t| t.has_tag(&tag.id));
            let (total, completed) =
                tagged.fold((0, 0), |(n, done), t| (n + 1, done + t.completed as usize));
            TagSummary {
                name: tag.name.clone(),
                total,
                completed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTask;
    use chrono::TimeZone;

    fn task(title: &str, due: Option<DateTime<Local>>, now: DateTime<Local>) -> Task {
        let data = NewTask {
            due_date: due,
            ..NewTask::titled(title)
        };
        Task::from_new(data, now).unwrap()
    }

    #[test]
    fn test_dashboard_stats() {
        let now = Local::now();
        let mut done = task("done", None, now);
        done.completed = true;
        let tasks = vec![
            done,
            task("late", Some(now - Duration::hours(2)), now),
            task("open", None, now),
        ];

        let stats = calculate_dashboard_stats(&tasks, now);
        assert_eq!(
            stats,
            DashboardStats {
                total: 3,
                completed: 1,
                pending: 1,
                overdue: 1,
                completion_rate: 33,
            }
        );
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = calculate_dashboard_stats(&[], Local::now());
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn test_upcoming_window_order_and_limit() {
        let now = Local::now();
        let mut tasks: Vec<Task> = (1..=6)
            .map(|d| task(&format!("d{}", d), Some(now + Duration::days(d)), now))
            .collect();
        tasks.push(task("far", Some(now + Duration::days(9)), now));
        tasks.push(task("past", Some(now - Duration::hours(1)), now));
        tasks.push(task("undated", None, now));
        tasks.reverse();

        let titles: Vec<String> = upcoming_tasks(&tasks, now).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["d1", "d2", "d3", "d4", "d5"]);
    }

    #[test]
    fn test_quick_stats() {
        // Wednesday
        let now = Local.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let mut high = task("high", Some(now + Duration::hours(1)), now);
        high.priority = Priority::High;
        let mut high_done = task("high done", None, now);
        high_done.priority = Priority::High;
        high_done.completed = true;

        let tasks = vec![
            high,
            high_done,
            task("sunday", Some(Local.with_ymd_and_hms(2026, 10, 11, 8, 0, 0).unwrap()), now),
            task("saturday", Some(Local.with_ymd_and_hms(2026, 10, 17, 23, 0, 0).unwrap()), now),
            task("next week", Some(Local.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()), now),
        ];

        let stats = calculate_quick_stats(&tasks, now);
        assert_eq!(
            stats,
            QuickStats {
                due_today: 1,
                due_this_week: 3,
                high_priority: 1,
            }
        );
    }

    #[test]
    fn test_tag_summaries_skip_dangling() {
        let now = Local::now();
        let tags = Tag::defaults();
        let mut a = task("a", None, now);
        a.tags = vec!["1".to_string(), "ghost".to_string()];
        let mut b = task("b", None, now);
        b.tags = vec!["1".to_string()];
        b.completed = true;

        let summaries = calculate_tag_summaries(&[a, b], &tags);
        assert_eq!(summaries.len(), 3);
        assert_eq!(
            summaries[0],
            TagSummary {
                name: "Work".to_string(),
                total: 2,
                completed: 1
            }
        );
        assert_eq!(summaries[1].total, 0);
    }
}
