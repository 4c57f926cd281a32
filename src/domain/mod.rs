pub mod enums;
pub mod task;
pub mod views;

pub use enums::{FocusMode, Filter, Priority, PriorityMeta, SortKey, Urgency};
pub use task::{generate_id, NewTask, Tag, Task, TaskPatch, TAG_COLORS};
pub use views::{
    compute_counts, filter_tasks, format_date, is_overdue, page_title, priority_meta,
    resolve_tags, sort_tasks, time_progress, TaskCounts,
};
