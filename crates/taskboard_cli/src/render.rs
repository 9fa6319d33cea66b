use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::config::Palette;
use taskboard_core::error::AppError;
use taskboard_core::model::{Priority, Status, Task, TaskDraft};

pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Add your first task to get started!";

#[derive(Tabled)]
struct TaskRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Title")]
    title: &'a str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Description")]
    description: &'a str,
}

pub fn list_heading(count: usize) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("Task List ({count} {noun})")
}

/// Renders tasks in the order given; callers pass the sorted view.
pub fn render_table(tasks: &[&Task], palette: &Palette) -> String {
    if tasks.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: &task.id,
        title: &task.title,
        priority: task.priority.label(),
        status: task.status.label(),
        description: &task.description,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    format!(
        "{}\n{}",
        palette.heading(&list_heading(tasks.len())),
        table
    )
}

pub fn render_detail(task: &Task, palette: &Palette) -> String {
    let mut lines = vec![
        format!("{} ({})", task.title, task.id),
        format!("Priority: {}", palette.priority(task.priority)),
        format!("Status: {}", palette.status(task.status)),
    ];
    if !task.description.is_empty() {
        lines.push(format!("Description: {}", task.description));
    }
    lines.join("\n")
}

pub fn render_draft(draft: &TaskDraft) -> String {
    let unset = "(unset)";
    [
        format!("title: {}", draft.title),
        format!("description: {}", draft.description),
        format!(
            "priority: {}",
            draft.priority.map(Priority::as_str).unwrap_or(unset)
        ),
        format!("status: {}", draft.status.map(Status::as_str).unwrap_or(unset)),
    ]
    .join("\n")
}

pub fn task_json(task: &Task) -> Result<String, AppError> {
    Ok(serde_json::to_string(task)?)
}

pub fn tasks_json(tasks: &[&Task]) -> Result<String, AppError> {
    Ok(serde_json::to_string(tasks)?)
}
