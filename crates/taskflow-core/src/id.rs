use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a task. Stored as its hyphenated UUID string.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    #[must_use]
    /// Generate a fresh time-ordered task identifier (UUID v7).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap a raw integer, used by counter-based generators.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Source of fresh task identifiers, injected into the task store.
pub trait IdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> TaskId;

    /// Record an identifier that already exists (e.g. loaded from storage).
    ///
    /// Generators that could otherwise re-issue `existing` must skip past it.
    fn observe(&mut self, _existing: TaskId) {}
}

/// Random, time-ordered identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&mut self) -> TaskId {
        TaskId::new()
    }
}

/// Counter identifiers starting at 1.
///
/// The counter wraps back to 1 after `u128::MAX`, so it never gets stuck on
/// one value. Callers skip ids that are already taken.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Start counting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Start counting at `first`.
    #[must_use]
    pub const fn starting_at(first: u128) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        let id = TaskId::from_u128(self.next);
        self.next = successor(self.next);
        id
    }

    fn observe(&mut self, existing: TaskId) {
        let raw = existing.0.as_u128();
        if raw >= self.next {
            self.next = successor(raw);
        }
    }
}

const fn successor(raw: u128) -> u128 {
    match raw.checked_add(1) {
        Some(next) => next,
        None => 1,
    }
}

impl<G> IdGenerator for Box<G>
where
    G: IdGenerator + ?Sized,
{
    fn next_id(&mut self) -> TaskId {
        (**self).next_id()
    }

    fn observe(&mut self, existing: TaskId) {
        (**self).observe(existing);
    }
}
