//! Domain types and pure logic for taskflow: the task model, validation,
//! the ordered task list and its filtered/sorted projections.

/// Timestamp sources.
pub mod clock;
/// Identifier types and generators.
pub mod id;
/// Ordered task collection and its state transitions.
pub mod list;
/// The task record.
pub mod task;
/// Candidate text checks.
pub mod validation;
/// Filtered, sorted projections plus progress counters.
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id::{IdGenerator, SequentialIds, TaskId, UuidV7Ids};
pub use list::{Restored, TaskList};
pub use task::Task;
pub use validation::{MAX_TEXT_CHARS, MIN_TEXT_CHARS, ValidationError, ValidationResult, validate};
pub use view::{
    Counters, EmptyState, ParseSelectionError, Projection, SortOrder, TaskFilter, collate, project,
};
