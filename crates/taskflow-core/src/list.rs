use std::collections::HashSet;

use crate::clock::Clock;
use crate::id::{IdGenerator, TaskId};
use crate::task::Task;
use crate::validation::{ValidationError, validate};

/// Tasks in insertion order.
///
/// All mutation goes through the methods below, which keep ids unique and
/// only admit validated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    items: Vec<Task>,
}

/// Result of rebuilding a list from stored tasks.
#[derive(Debug, Clone, Default)]
pub struct Restored {
    /// The rebuilt list.
    pub list: TaskList,
    /// Entries dropped because their id repeated an earlier one.
    pub dropped: Vec<Task>,
}

impl TaskList {
    /// Empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild from a stored collection, keeping the first task for each id.
    #[must_use]
    pub fn restore(stored: Vec<Task>) -> Restored {
        let mut seen = HashSet::with_capacity(stored.len());
        let mut list = Self::new();
        let mut dropped = Vec::new();
        for task in stored {
            if seen.insert(task.id()) {
                list.items.push(task);
            } else {
                dropped.push(task);
            }
        }
        Restored { list, dropped }
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.items
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.items.iter().map(Task::id)
    }

    /// Number of tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.position(id).map(|idx| &self.items[idx])
    }

    /// Whether a task with this id exists.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Validate `text` and append a new incomplete task.
    ///
    /// `ids` is asked again whenever it yields an id already in the list.
    ///
    /// # Errors
    /// Returns the validation failure; the list is left untouched.
    pub fn add<G, C>(&mut self, text: &str, ids: &mut G, clock: &C) -> Result<&Task, ValidationError>
    where
        G: IdGenerator + ?Sized,
        C: Clock + ?Sized,
    {
        let text = validate(text, &self.items)?;
        let mut id = ids.next_id();
        while self.contains(id) {
            ids.observe(id);
            id = ids.next_id();
        }
        self.items.push(Task::new(id, text, clock.now()));
        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    /// Remove the task with `id`, returning it if it was present.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }

    /// Flip completion on the task with `id`. Returns the new state, or `None` if absent.
    pub fn toggle(&mut self, id: TaskId) -> Option<bool> {
        let idx = self.position(id)?;
        Some(self.items[idx].toggle())
    }

    /// Drop every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|task| !task.is_completed());
        before - self.items.len()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.items.iter().position(|task| task.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::id::SequentialIds;
    use time::Duration;
    use time::macros::datetime;

    struct Fixture {
        list: TaskList,
        ids: SequentialIds,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                list: TaskList::new(),
                ids: SequentialIds::new(),
                clock: ManualClock::ticking(datetime!(2025-01-01 09:00 UTC), Duration::minutes(1)),
            }
        }

        fn add(&mut self, text: &str) -> TaskId {
            self.list
                .add(text, &mut self.ids, &self.clock)
                .map(Task::id)
                .unwrap_or_else(|err| panic!("add {text:?}: {err}"))
        }
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let mut fx = Fixture::new();
        let first = fx.add("  first task ");
        let second = fx.add("second task");

        let ids: Vec<_> = fx.list.ids().collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(fx.list.tasks()[0].text(), "first task");
        assert!(!fx.list.tasks()[0].is_completed());
        assert!(fx.list.tasks()[0].created_at() < fx.list.tasks()[1].created_at());
    }

    #[test]
    fn rejected_add_leaves_list_untouched() {
        let mut fx = Fixture::new();
        fx.add("Buy milk");
        let before = fx.list.clone();

        let result = fx.list.add("buy MILK", &mut fx.ids, &fx.clock).map(Task::id);
        assert_eq!(result, Err(ValidationError::Duplicate));
        assert_eq!(fx.list, before);
    }

    #[test]
    fn add_skips_ids_already_present() {
        let existing = Task::new(TaskId::from_u128(1), "Loaded", datetime!(2024-12-31 09:00 UTC));
        let mut list = TaskList::restore(vec![existing]).list;
        let mut ids = SequentialIds::new();
        let clock = ManualClock::new(datetime!(2025-01-01 09:00 UTC));

        let id = list
            .add("Fresh", &mut ids, &clock)
            .map(Task::id)
            .unwrap_or_else(|err| panic!("add: {err}"));
        assert_eq!(id, TaskId::from_u128(2));
    }

    #[test]
    fn add_after_largest_possible_id_wraps_to_free_id() {
        let when = datetime!(2024-12-31 09:00 UTC);
        let stored = vec![
            Task::new(TaskId::from_u128(u128::MAX), "Loaded last", when),
            Task::new(TaskId::from_u128(1), "Loaded first", when),
        ];
        let mut list = TaskList::restore(stored).list;
        let mut ids = SequentialIds::new();
        for id in list.ids().collect::<Vec<_>>() {
            ids.observe(id);
        }
        let clock = ManualClock::new(datetime!(2025-01-01 09:00 UTC));

        let id = list
            .add("Fresh", &mut ids, &clock)
            .map(Task::id)
            .unwrap_or_else(|err| panic!("add: {err}"));
        assert_eq!(id, TaskId::from_u128(2));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut fx = Fixture::new();
        fx.add("keep me");
        assert!(fx.list.remove(TaskId::from_u128(99)).is_none());
        assert_eq!(fx.list.len(), 1);
    }

    #[test]
    fn remove_returns_task() {
        let mut fx = Fixture::new();
        let id = fx.add("gone soon");
        let removed = fx.list.remove(id).unwrap_or_else(|| panic!("task must exist"));
        assert_eq!(removed.text(), "gone soon");
        assert!(fx.list.is_empty());
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut fx = Fixture::new();
        let id = fx.add("flip me");
        assert_eq!(fx.list.toggle(id), Some(true));
        assert_eq!(fx.list.toggle(id), Some(false));
        assert_eq!(fx.list.toggle(TaskId::from_u128(42)), None);
    }

    #[test]
    fn clear_completed_keeps_order_of_survivors() {
        let mut fx = Fixture::new();
        let a = fx.add("alpha");
        let b = fx.add("bravo");
        let c = fx.add("charlie");
        fx.list.toggle(b);

        assert_eq!(fx.list.clear_completed(), 1);
        assert_eq!(fx.list.ids().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(fx.list.get(a).map(Task::text), Some("alpha"));
        assert!(!fx.list.contains(b));
    }

    #[test]
    fn clear_completed_is_idempotent() {
        let mut fx = Fixture::new();
        let a = fx.add("alpha");
        fx.add("bravo");
        fx.list.toggle(a);

        fx.list.clear_completed();
        let once = fx.list.clone();
        assert_eq!(fx.list.clear_completed(), 0);
        assert_eq!(fx.list, once);
    }

    #[test]
    fn restore_drops_repeated_ids() {
        let when = datetime!(2025-01-01 09:00 UTC);
        let stored = vec![
            Task::new(TaskId::from_u128(1), "one", when),
            Task::new(TaskId::from_u128(2), "two", when),
            Task::new(TaskId::from_u128(1), "one again", when),
        ];
        let restored = TaskList::restore(stored);
        assert_eq!(restored.list.len(), 2);
        assert_eq!(restored.dropped.len(), 1);
        assert_eq!(restored.dropped[0].text(), "one again");
    }
}
