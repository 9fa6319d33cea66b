//! Form state that sits above the [`TaskBoard`].
//!
//! Drafts live here and never inside the stored tasks. At most one task is
//! being edited at a time; starting another edit drops the previous draft.

use crate::board::TaskBoard;
use crate::error::ValidationError;
use crate::model::{Priority, Status, Task, TaskDraft};
use crate::storage::KeyValueStore;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    draft: TaskDraft,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.draft.title = title.into();
    }

    pub fn set_description<T: Into<String>>(&mut self, description: T) {
        self.draft.description = description.into();
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.draft.priority = priority;
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        self.draft.status = status;
    }

    pub fn edit<F>(&mut self, change: F)
    where
        F: FnOnce(&mut TaskDraft),
    {
        change(&mut self.draft);
    }

    /// Adds the draft to the board and resets the form. On a validation
    /// failure the draft is kept for correction.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        board: &mut TaskBoard<S>,
    ) -> Result<Task, ValidationError> {
        let task = board.add(&self.draft)?;
        self.reset();
        Ok(task)
    }

    pub fn reset(&mut self) {
        self.draft = TaskDraft::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Editing {
    id: String,
    draft: TaskDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    current: Option<Editing>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.current.as_ref().map(|editing| editing.id.as_str())
    }

    pub fn draft(&self) -> Option<&TaskDraft> {
        self.current.as_ref().map(|editing| &editing.draft)
    }

    pub fn is_editing(&self) -> bool {
        self.current.is_some()
    }

    pub fn begin(&mut self, task: &Task) {
        if let Some(previous) = self.current.as_ref()
            && previous.id != task.id
        {
            debug!(discarded = %previous.id, id = %task.id, "switching edit target");
        }
        self.current = Some(Editing {
            id: task.id.clone(),
            draft: task.to_draft(),
        });
    }

    /// Returns `false` when no edit is in progress.
    pub fn edit<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut TaskDraft),
    {
        match self.current.as_mut() {
            Some(editing) => {
                change(&mut editing.draft);
                true
            }
            None => false,
        }
    }

    /// Commits the draft. The session stays open when validation fails, and
    /// ends with `Ok(None)` when nothing was being edited.
    pub fn save<S: KeyValueStore>(
        &mut self,
        board: &mut TaskBoard<S>,
    ) -> Result<Option<String>, ValidationError> {
        let Some(editing) = self.current.as_ref() else {
            return Ok(None);
        };

        board.update(&editing.id, &editing.draft)?;
        Ok(self.current.take().map(|editing| editing.id))
    }

    pub fn cancel(&mut self) -> Option<String> {
        self.current.take().map(|editing| editing.id)
    }
}
