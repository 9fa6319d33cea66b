use crate::error::ValidationError;
use crate::model::{Task, TaskDraft};
use crate::notify::Confirm;
use crate::storage::{KeyValueStore, Persisted};
use std::fmt;
use tracing::{debug, info};

pub const TASKS_KEY: &str = "tasks";

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to clear all tasks? This action cannot be undone.";

type IdSource = Box<dyn FnMut() -> String>;

pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The task collection, in insertion order, written through to storage on
/// every change.
pub struct TaskBoard<S: KeyValueStore> {
    tasks: Persisted<S, Vec<Task>>,
    next_id: IdSource,
}

impl<S: KeyValueStore> fmt::Debug for TaskBoard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBoard")
            .field("tasks", self.tasks.get())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> TaskBoard<S> {
    pub fn open(store: S) -> Self {
        Self::with_id_source(store, new_task_id)
    }

    pub fn with_id_source<F>(store: S, next_id: F) -> Self
    where
        F: FnMut() -> String + 'static,
    {
        let tasks = Persisted::load(store, TASKS_KEY, Vec::new());
        debug!(count = tasks.get().len(), "task board opened");
        Self {
            tasks,
            next_id: Box::new(next_id),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.get()
    }

    pub fn len(&self) -> usize {
        self.tasks.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.get().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get().iter().find(|task| task.id == id)
    }

    pub fn add(&mut self, draft: &TaskDraft) -> Result<Task, ValidationError> {
        let data = draft.validate()?;
        let id = self.fresh_id();
        let task = Task::from_data(id, data);

        self.tasks.update(|tasks| tasks.push(task.clone()));
        info!(id = %task.id, priority = %task.priority, "task added");

        Ok(task)
    }

    /// Replaces every field but the id. An unknown id is not an error.
    pub fn update(&mut self, id: &str, draft: &TaskDraft) -> Result<(), ValidationError> {
        let data = draft.validate()?;

        let Some(index) = self.position(id) else {
            debug!(id, "update skipped, task not found");
            return Ok(());
        };

        self.tasks.update(|tasks| tasks[index].apply(data));
        info!(id, "task updated");

        Ok(())
    }

    pub fn delete(&mut self, id: &str) {
        let Some(index) = self.position(id) else {
            debug!(id, "delete skipped, task not found");
            return;
        };

        self.tasks.update(|tasks| {
            tasks.remove(index);
        });
        info!(id, "task deleted");
    }

    pub fn clear_all(&mut self) {
        let removed = self.len();
        self.tasks.set(Vec::new());
        info!(removed, "all tasks cleared");
    }

    /// Returns whether the task was removed.
    pub fn delete_confirmed(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_PROMPT) {
            return false;
        }
        let before = self.len();
        self.delete(id);
        self.len() != before
    }

    /// Returns whether the board was cleared. An empty board is not prompted.
    pub fn clear_all_confirmed(&mut self, confirm: &dyn Confirm) -> bool {
        if self.is_empty() || !confirm.confirm(CLEAR_ALL_PROMPT) {
            return false;
        }
        self.clear_all();
        true
    }

    /// High before medium before low; ties keep their stored order.
    pub fn sorted_view(&self) -> Vec<&Task> {
        let mut view: Vec<&Task> = self.tasks.get().iter().collect();
        view.sort_by_key(|task| task.priority.rank());
        view
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.get().iter().position(|task| task.id == id)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = (self.next_id)();
            if self.position(&id).is_none() {
                return id;
            }
            debug!(id = %id, "generated id already in use, retrying");
        }
    }
}
