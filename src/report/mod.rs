pub mod generator;
pub mod stats;

pub use generator::{generate_report, render_report};
pub use stats::{
    calculate_dashboard_stats, calculate_quick_stats, calculate_tag_summaries, upcoming_tasks,
    DashboardStats, QuickStats, TagSummary,
};
