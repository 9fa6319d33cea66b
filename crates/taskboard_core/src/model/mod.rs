mod task;

pub use task::{Priority, Status, Task, TaskData, TaskDraft, parse_optional};
