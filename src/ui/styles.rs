use crate::domain::{Priority, Urgency};
use crossterm::style::{ContentStyle, Stylize};

/// Heading style for sections
pub fn title_style() -> ContentStyle {
    ContentStyle::new().cyan().bold()
}

/// Dimmed style for ids and secondary details
pub fn muted_style() -> ContentStyle {
    ContentStyle::new().dark_grey()
}

/// Completed task title
pub fn done_style() -> ContentStyle {
    ContentStyle::new().dark_grey().crossed_out()
}

/// Overdue warning
pub fn overdue_style() -> ContentStyle {
    ContentStyle::new().red().bold()
}

/// Badge style for a priority
pub fn priority_style(priority: Priority) -> ContentStyle {
    match priority {
        Priority::High => ContentStyle::new().red(),
        Priority::Medium => ContentStyle::new().yellow(),
        Priority::Low => ContentStyle::new().green(),
    }
}

/// Style for a time-progress readout
pub fn urgency_style(urgency: Urgency) -> ContentStyle {
    match urgency {
        Urgency::Critical => ContentStyle::new().red(),
        Urgency::High => ContentStyle::new().dark_yellow(),
        Urgency::Medium => ContentStyle::new().yellow(),
        Urgency::Normal => ContentStyle::new().blue(),
    }
}

/// Map a tag's display token to a style; unknown tokens render plain
pub fn tag_style(color: &str) -> ContentStyle {
    match color {
        "blue" => ContentStyle::new().blue(),
        "green" => ContentStyle::new().green(),
        "red" => ContentStyle::new().red(),
        "yellow" => ContentStyle::new().yellow(),
        "purple" => ContentStyle::new().magenta(),
        "pink" => ContentStyle::new().dark_magenta(),
        "indigo" => ContentStyle::new().dark_blue(),
        "gray" | "grey" => ContentStyle::new().grey(),
        _ => ContentStyle::new(),
    }
}
