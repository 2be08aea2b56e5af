use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::id::TaskId;

/// A single to-do item.
///
/// Fields are read-only from outside the crate: `created_at` is fixed at
/// creation and only [`TaskList`](crate::TaskList) flips `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    text: String,
    completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Task {
    /// Build an incomplete task. The caller is responsible for having validated `text`.
    #[must_use]
    pub fn new(id: TaskId, text: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
        }
    }

    /// Same as [`Task::new`] but marked completed.
    #[must_use]
    pub fn completed(id: TaskId, text: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            completed: true,
            ..Self::new(id, text, created_at)
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Trimmed task text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the task is done.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Creation instant.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Creation instant formatted as RFC 3339.
    #[must_use]
    pub fn created_rfc3339(&self) -> Option<String> {
        self.created_at.format(&Rfc3339).ok()
    }

    pub(crate) const fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}
