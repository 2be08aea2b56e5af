use taskflow_core::{
    Clock, IdGenerator, SystemClock, Task, TaskId, TaskList, UuidV7Ids, ValidationError,
};
use tracing::{debug, warn};

use crate::persistence::TaskPersistence;

/// Task list that writes itself back after every change.
///
/// The in-memory list is authoritative for the session. Save failures are
/// logged and otherwise ignored.
pub struct TaskStore<P> {
    list: TaskList,
    persistence: P,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Load the stored collection using random ids and the system clock.
    ///
    /// # Errors
    /// Propagates load failures from `persistence`.
    pub fn open(persistence: P) -> Result<Self, P::Error> {
        Self::open_with(persistence, Box::new(UuidV7Ids), Box::new(SystemClock))
    }

    /// Load the stored collection with explicit id and time sources.
    ///
    /// # Errors
    /// Propagates load failures from `persistence`.
    pub fn open_with(
        persistence: P,
        mut ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, P::Error> {
        let stored = persistence.load()?.unwrap_or_default();
        let restored = TaskList::restore(stored);
        for task in &restored.dropped {
            warn!(task = %task.id(), text = task.text(), "Dropping stored task with duplicate id");
        }
        for id in restored.list.ids() {
            ids.observe(id);
        }
        debug!(count = restored.list.len(), "Task store opened");
        Ok(Self {
            list: restored.list,
            persistence,
            ids,
            clock,
        })
    }

    /// Validate and append a new task, then save.
    ///
    /// # Errors
    /// Returns the validation failure; nothing is changed or saved.
    pub fn add(&mut self, text: &str) -> Result<Task, ValidationError> {
        let task = match self.list.add(text, self.ids.as_mut(), self.clock.as_ref()) {
            Ok(task) => task.clone(),
            Err(err) => {
                debug!(reason = %err, "Rejected new task");
                return Err(err);
            }
        };
        debug!(task = %task.id(), "Added task");
        self.persist();
        Ok(task)
    }

    /// Remove a task. Returns `false` (and saves nothing) if it was absent.
    pub fn remove(&mut self, id: TaskId) -> bool {
        if self.list.remove(id).is_none() {
            return false;
        }
        debug!(task = %id, "Removed task");
        self.persist();
        true
    }

    /// Flip completion. Returns the new state, or `None` if the task was absent.
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<bool> {
        let completed = self.list.toggle(id)?;
        debug!(task = %id, completed, "Toggled task");
        self.persist();
        Some(completed)
    }

    /// Remove all completed tasks at once. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let removed = self.list.clear_completed();
        if removed > 0 {
            debug!(removed, "Cleared completed tasks");
            self.persist();
        }
        removed
    }

    fn persist(&self) {
        if let Err(err) = self.persistence.save(self.list.tasks()) {
            let err: anyhow::Error = err.into();
            warn!(error = %format!("{err:#}"), "Failed to save tasks; keeping in-memory state");
        }
    }
}

impl<P> TaskStore<P> {
    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    /// The underlying list.
    pub const fn list(&self) -> &TaskList {
        &self.list
    }

    /// The persistence gateway.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }
}
