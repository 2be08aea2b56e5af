use std::path::Path;

use anyhow::{Context, Result};
use taskflow_core::{
    Counters, Projection, SortOrder, SystemClock, Task, TaskFilter, TaskId, ValidationError, project,
};
use taskflow_store::FileStore;
use thiserror::Error;

use crate::config::AppConfig;
use crate::persistence::{KeyValueGateway, TaskPersistence};
use crate::task_store::TaskStore;

/// Current filter and sort choice. Lives only for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSelection {
    /// Which tasks are visible.
    pub filter: TaskFilter,
    /// How visible tasks are ordered.
    pub sort: SortOrder,
}

/// A user-supplied id prefix did not identify exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveIdError {
    /// Nothing matched.
    #[error("no task matches id '{0}'")]
    NotFound(String),
    /// More than one task matched.
    #[error("id '{prefix}' is ambiguous ({count} tasks match)")]
    Ambiguous {
        /// Prefix as typed.
        prefix: String,
        /// Number of matching tasks.
        count: usize,
    },
}

/// Service backed by a directory of JSON files.
pub type FileTaskService = TaskService<KeyValueGateway<FileStore>>;

/// Service façade exposing the user-facing actions and the derived view.
pub struct TaskService<P> {
    store: TaskStore<P>,
    selection: ViewSelection,
}

impl<P> TaskService<P> {
    /// Wrap an opened store.
    pub const fn new(store: TaskStore<P>, selection: ViewSelection) -> Self {
        Self { store, selection }
    }

    /// Current view selection.
    pub const fn selection(&self) -> ViewSelection {
        self.selection
    }

    /// Change the filter.
    pub const fn set_filter(&mut self, filter: TaskFilter) {
        self.selection.filter = filter;
    }

    /// Change the sort order.
    pub const fn set_sort_order(&mut self, sort: SortOrder) {
        self.selection.sort = sort;
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Filtered, sorted tasks plus counters for the current selection.
    pub fn view(&self) -> Projection<'_> {
        project(self.store.tasks(), self.selection.filter, self.selection.sort)
    }

    /// Counters over every task.
    pub fn counters(&self) -> Counters {
        Counters::from_tasks(self.store.tasks())
    }

    /// Underlying store.
    pub const fn store(&self) -> &TaskStore<P> {
        &self.store
    }

    /// Find the single task whose id starts with `prefix` (case-insensitive).
    ///
    /// # Errors
    /// Returns an error when no task or more than one task matches.
    pub fn resolve_id(&self, prefix: &str) -> Result<TaskId, ResolveIdError> {
        let needle = prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ResolveIdError::NotFound(prefix.to_owned()));
        }
        let matches: Vec<TaskId> = self
            .store
            .list()
            .ids()
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(ResolveIdError::NotFound(prefix.to_owned())),
            _ => Err(ResolveIdError::Ambiguous {
                prefix: prefix.to_owned(),
                count: matches.len(),
            }),
        }
    }
}

impl<P: TaskPersistence> TaskService<P> {
    /// Add a task.
    ///
    /// # Errors
    /// Returns the validation failure; nothing changes.
    pub fn add_task(&mut self, text: &str) -> Result<Task, ValidationError> {
        self.store.add(text)
    }

    /// Remove a task; `false` if it did not exist.
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        self.store.remove(id)
    }

    /// Toggle completion; `None` if the task did not exist.
    pub fn toggle_task(&mut self, id: TaskId) -> Option<bool> {
        self.store.toggle_completion(id)
    }

    /// Remove every completed task, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        self.store.clear_completed()
    }
}

impl FileTaskService {
    /// Open the file-backed service rooted at `data_dir` using `config`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the stored tasks cannot be read.
    pub fn open_dir(data_dir: impl AsRef<Path>, config: &AppConfig) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let store = FileStore::open(data_dir)
            .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
        let gateway = KeyValueGateway::with_key(store, config.storage.key.clone())?;
        let tasks = TaskStore::open_with(gateway, config.ids.strategy.generator(), Box::new(SystemClock))
            .with_context(|| format!("failed to load tasks from {}", data_dir.display()))?;
        Ok(Self::new(tasks, config.selection()))
    }
}
