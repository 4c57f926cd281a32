use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Sort rank and display label for a priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityMeta {
    pub rank: u8,
    pub label: &'static str,
}

impl Priority {
    /// Parse a priority name; anything unrecognized is treated as medium
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn meta(&self) -> PriorityMeta {
        match self {
            Self::High => PriorityMeta { rank: 3, label: "High" },
            Self::Medium => PriorityMeta { rank: 2, label: "Medium" },
            Self::Low => PriorityMeta { rank: 1, label: "Low" },
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Stored data may carry null, a number, or a name we never wrote
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map(Priority::from_name).unwrap_or_default())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named view over the task collection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
    ByTag(String),
}

impl Filter {
    /// Resolve a view name typed by the user. Names that are not one of the
    /// built-in views are taken to be tag ids.
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "all" | "" => Self::All,
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            "overdue" => Self::Overdue,
            other => Self::ByTag(other.to_string()),
        }
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::parse(s))
    }
}

/// Ordering applied to a task view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DueDate,
    Priority,
    Name,
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Parse a sort key name, falling back to creation order
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "dueDate" | "due-date" | "due" => Self::DueDate,
            "priority" => Self::Priority,
            "name" | "title" => Self::Name,
            _ => Self::CreatedAt,
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortKey::parse(s))
    }
}

/// Urgency bucket for how much of a task's time window has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 90.0 {
            Self::Critical
        } else if percent > 75.0 {
            Self::High
        } else if percent > 50.0 {
            Self::Medium
        } else {
            Self::Normal
        }
    }
}

/// Phase of a focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Focus,
    Break,
}

impl FocusMode {
    pub fn name(&self) -> &'static str {
        match self {
            FocusMode::Focus => "Focus Time",
            FocusMode::Break => "Break Time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_name() {
        assert_eq!(Priority::from_name("low"), Priority::Low);
        assert_eq!(Priority::from_name("HIGH"), Priority::High);
        assert_eq!(Priority::from_name("medium"), Priority::Medium);
        assert_eq!(Priority::from_name("urgent"), Priority::Medium);
        assert_eq!(Priority::from_name(""), Priority::Medium);
    }

    #[test]
    fn test_priority_meta_ranks() {
        assert_eq!(Priority::High.meta().rank, 3);
        assert_eq!(Priority::Medium.meta().rank, 2);
        assert_eq!(Priority::Low.meta().rank, 1);
        assert_eq!(Priority::Low.meta().label, "Low");
    }

    #[test]
    fn test_priority_deserialize_unknown_is_medium() {
        let p: Priority = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(p, Priority::Medium);
        let p: Priority = serde_json::from_str("null").unwrap();
        assert_eq!(p, Priority::Medium);
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
        let p: Priority = serde_json::from_str("3").unwrap();
        assert_eq!(p, Priority::Medium);
        let p: Priority = serde_json::from_str("{\"level\": 1}").unwrap();
        assert_eq!(p, Priority::Medium);
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse("completed"), Filter::Completed);
        assert_eq!(Filter::parse("pending"), Filter::Pending);
        assert_eq!(Filter::parse("overdue"), Filter::Overdue);
        assert_eq!(Filter::parse("2"), Filter::ByTag("2".to_string()));
    }

    #[test]
    fn test_sort_key_parse_defaults_to_created_at() {
        assert_eq!(SortKey::parse("dueDate"), SortKey::DueDate);
        assert_eq!(SortKey::parse("priority"), SortKey::Priority);
        assert_eq!(SortKey::parse("name"), SortKey::Name);
        assert_eq!(SortKey::parse("whatever"), SortKey::CreatedAt);
    }

    #[test]
    fn test_urgency_buckets() {
        assert_eq!(Urgency::from_percent(10.0), Urgency::Normal);
        assert_eq!(Urgency::from_percent(60.0), Urgency::Medium);
        assert_eq!(Urgency::from_percent(80.0), Urgency::High);
        assert_eq!(Urgency::from_percent(95.0), Urgency::Critical);
    }
}
