use super::enums::Priority;
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Generate a fresh opaque id for a task or tag
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Never empty after trimming
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Local>>,
    #[serde(default)]
    pub reminder_time: Option<DateTime<Local>>,
    /// Tag ids; may reference tags that no longer exist
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

impl Task {
    /// Build a task from user input. Returns `None` when the title is blank.
    pub fn from_new(data: NewTask, now: DateTime<Local>) -> Option<Self> {
        let title = data.title.trim();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            id: generate_id(),
            title: title.to_string(),
            description: data.description.trim().to_string(),
            priority: data.priority,
            due_date: data.due_date,
            reminder_time: data.reminder_time,
            tags: data.tags,
            completed: false,
            created_at: now,
        })
    }

    /// Return a copy with the patch applied; id and creation time never change
    pub fn merged(&self, patch: &TaskPatch) -> Self {
        let mut task = self.clone();
        if let Some(title) = &patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(reminder_time) = patch.reminder_time {
            task.reminder_time = reminder_time;
        }
        if let Some(tags) = &patch.tags {
            task.tags = tags.clone();
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        task
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t == tag_id)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Local>>,
    pub reminder_time: Option<DateTime<Local>>,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing task. `None` leaves a field untouched;
/// the nested options on the date fields allow clearing them.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Local>>>,
    pub reminder_time: Option<Option<DateTime<Local>>>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.reminder_time.is_none()
            && self.tags.is_none()
            && self.completed.is_none()
    }
}

/// A user-defined label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Display tokens a tag may use; the first one is the default
pub const TAG_COLORS: &[&str] = &[
    "blue", "green", "red", "yellow", "purple", "pink", "indigo", "gray",
];

impl Tag {
    /// Build a tag from user input. Returns `None` when the name is blank.
    pub fn new(name: &str, color: Option<&str>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let color = color
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| TAG_COLORS[0].to_string());

        Some(Self {
            id: generate_id(),
            name: name.to_string(),
            color,
        })
    }

    /// Tags present on first use
    pub fn defaults() -> Vec<Tag> {
        [("1", "Work", "blue"), ("2", "Personal", "green"), ("3", "Study", "purple")]
            .into_iter()
            .map(|(id, name, color)| Tag {
                id: id.to_string(),
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_task_from_new_trims() {
        let now = Local::now();
        let mut data = NewTask::titled("  Write report  ");
        data.description = " draft first ".to_string();
        let task = Task::from_new(data, now).unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "draft first");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert_eq!(task.created_at, now);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_task_from_new_rejects_blank_title() {
        assert!(Task::from_new(NewTask::titled("   "), Local::now()).is_none());
        assert!(Task::from_new(NewTask::titled(""), Local::now()).is_none());
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_merged_keeps_identity() {
        let now = Local::now();
        let task = Task::from_new(NewTask::titled("A"), now).unwrap();
        let reminder = now + Duration::minutes(10);

        let patch = TaskPatch {
            title: Some("B".to_string()),
            reminder_time: Some(Some(reminder)),
            ..TaskPatch::default()
        };
        let merged = task.merged(&patch);

        assert_eq!(merged.id, task.id);
        assert_eq!(merged.created_at, task.created_at);
        assert_eq!(merged.title, "B");
        assert_eq!(merged.reminder_time, Some(reminder));

        let cleared = merged.merged(&TaskPatch {
            reminder_time: Some(None),
            ..TaskPatch::default()
        });
        assert_eq!(cleared.reminder_time, None);
        assert_eq!(cleared.title, "B");
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let task = Task::from_new(NewTask::titled("A"), Local::now()).unwrap();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"reminderTime\""));
        assert!(json.contains("\"priority\":\"medium\""));
    }

    #[test]
    fn test_task_deserialize_minimal_record() {
        let json = r#"{"id":"x","title":"Old","createdAt":"2026-01-01T10:00:00+00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(!task.completed);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_deserialize_null_fields() {
        let json = r#"{"id":"x","title":"Old","description":null,"priority":7,"tags":null,"completed":null,"createdAt":"2026-01-01T10:00:00+00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(!task.completed);
    }

    #[test]
    fn test_tag_new() {
        let tag = Tag::new(" Errands ", None).unwrap();
        assert_eq!(tag.name, "Errands");
        assert_eq!(tag.color, "blue");
        assert!(Tag::new("  ", Some("red")).is_none());
        assert_eq!(Tag::new("X", Some("Pink")).unwrap().color, "pink");
    }

    #[test]
    fn test_default_tags() {
        let tags = Tag::defaults();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].id, "1");
        assert_eq!(tags[2].name, "Study");
    }
}
