use thiserror::Error;

/// Rejections raised by task, tag and focus operations.
/// A rejected operation leaves all state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("tag name cannot be empty")]
    EmptyTagName,

    #[error("no task matches `{0}`")]
    UnknownTask(String),

    #[error("`{0}` matches more than one task")]
    AmbiguousTask(String),

    #[error("no tag matches `{0}`")]
    UnknownTag(String),

    #[error("focus length must be between 1 and 120 minutes, got {0}")]
    InvalidMinutes(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(TaskError::EmptyTitle.to_string(), "task title cannot be empty");
        assert_eq!(
            TaskError::UnknownTask("ab".to_string()).to_string(),
            "no task matches `ab`"
        );
        assert_eq!(
            TaskError::InvalidMinutes(0).to_string(),
            "focus length must be between 1 and 120 minutes, got 0"
        );
    }
}
