use crate::error::{AppError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl Task {
    pub fn from_data(id: String, data: TaskData) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
        }
    }

    /// Overwrites every field except `id`.
    pub fn apply(&mut self, data: TaskData) {
        self.title = data.title;
        self.description = data.description;
        self.priority = data.priority;
        self.status = data.status;
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: Some(self.priority),
            status: Some(self.status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Display ordering key; lower ranks are listed first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::invalid_input(format!(
                "unknown priority '{other}' (expected high, medium or low)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    ToDo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To-Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|ch| match ch {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "to-do" | "todo" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(AppError::invalid_input(format!(
                "unknown status '{}' (expected to-do, in-progress or done)",
                raw.trim()
            ))),
        }
    }
}

/// Parses a select-style value where the empty string means "not chosen yet".
pub fn parse_optional<T>(raw: &str) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = AppError>,
{
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

/// Form data as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

/// Validated task fields, without an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl TaskDraft {
    pub fn new<T: Into<String>, D: Into<String>>(
        title: T,
        description: D,
        priority: Option<Priority>,
        status: Option<Status>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            status,
        }
    }

    /// Checks title, then priority, then status, stopping at the first failure.
    pub fn validate(&self) -> Result<TaskData, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        let priority = self.priority.ok_or(ValidationError::PriorityRequired)?;
        let status = self.status.ok_or(ValidationError::StatusRequired)?;

        Ok(TaskData {
            title: title.to_string(),
            description: self.description.clone(),
            priority,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Status, Task, TaskDraft, parse_optional};
    use crate::error::ValidationError;

    #[test]
    fn validate_trims_title_and_keeps_description() {
        let draft = TaskDraft::new(
            "  Buy milk  ",
            "  two litres ",
            Some(Priority::High),
            Some(Status::ToDo),
        );

        let data = draft.validate().unwrap();

        assert_eq!(data.title, "Buy milk");
        assert_eq!(data.description, "  two litres ");
        assert_eq!(data.priority, Priority::High);
        assert_eq!(data.status, Status::ToDo);
    }

    #[test]
    fn validate_accepts_empty_description() {
        let draft = TaskDraft::new("demo", "", Some(Priority::Low), Some(Status::Done));
        assert_eq!(draft.validate().unwrap().description, "");
    }

    #[test]
    fn validate_reports_title_before_anything_else() {
        let err = TaskDraft::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::TitleRequired);

        let err = TaskDraft::new(" \t ", "", Some(Priority::High), Some(Status::ToDo))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::TitleRequired);
    }

    #[test]
    fn validate_reports_priority_before_status() {
        let err = TaskDraft::new("demo", "", None, None).validate().unwrap_err();
        assert_eq!(err, ValidationError::PriorityRequired);
    }

    #[test]
    fn validate_reports_missing_status() {
        let err = TaskDraft::new("demo", "", Some(Priority::Medium), None)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::StatusRequired);
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn task_serializes_with_wire_names() {
        let task = Task {
            id: "1".to_string(),
            title: "demo".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::InProgress,
        };

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": "1",
                "title": "demo",
                "description": "",
                "priority": "medium",
                "status": "in-progress"
            })
        );
    }

    #[test]
    fn task_rejects_unknown_priority_in_stored_data() {
        let raw = r#"{"id":"1","title":"demo","description":"","priority":"urgent","status":"done"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn task_defaults_missing_description() {
        let raw = r#"{"id":"1","title":"demo","priority":"low","status":"to-do"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.status, Status::ToDo);
    }

    #[test]
    fn parse_optional_treats_blank_as_unset() {
        assert_eq!(parse_optional::<Priority>("").unwrap(), None);
        assert_eq!(parse_optional::<Status>("  ").unwrap(), None);
        assert_eq!(
            parse_optional::<Status>("In Progress").unwrap(),
            Some(Status::InProgress)
        );
        assert_eq!(parse_optional::<Priority>("HIGH").unwrap(), Some(Priority::High));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!("later".parse::<Status>().is_err());
    }

    #[test]
    fn to_draft_round_trips_through_validation() {
        let task = Task {
            id: "task-1".to_string(),
            title: "demo".to_string(),
            description: "details".to_string(),
            priority: Priority::Low,
            status: Status::Done,
        };

        let data = task.to_draft().validate().unwrap();
        let mut copy = task.clone();
        copy.apply(data);

        assert_eq!(copy, task);
    }
}
