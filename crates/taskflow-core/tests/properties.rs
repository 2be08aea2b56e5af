use proptest::prelude::*;
use time::Duration;
use time::macros::datetime;

use taskflow_core::{
    ManualClock, MAX_TEXT_CHARS, MIN_TEXT_CHARS, SequentialIds, SortOrder, Task, TaskFilter, TaskList,
    ValidationError, project,
};

fn filter_strategy() -> impl Strategy<Value = TaskFilter> {
    prop_oneof![
        Just(TaskFilter::All),
        Just(TaskFilter::Active),
        Just(TaskFilter::Completed),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortOrder> {
    prop_oneof![
        Just(SortOrder::Newest),
        Just(SortOrder::Oldest),
        Just(SortOrder::Alphabetical),
        Just(SortOrder::CompletedLast),
    ]
}

/// Builds a list from `(text, completed)` pairs, skipping texts the validator rejects.
fn build_list(entries: &[(String, bool)]) -> TaskList {
    let mut list = TaskList::new();
    let mut ids = SequentialIds::new();
    let clock = ManualClock::ticking(datetime!(2025-01-01 00:00 UTC), Duration::seconds(1));
    for (text, completed) in entries {
        let Ok(id) = list.add(text, &mut ids, &clock).map(Task::id) else {
            continue;
        };
        if *completed {
            list.toggle(id);
        }
    }
    list
}

proptest! {
    #[test]
    fn add_matches_validation_rules(existing in prop::collection::vec("[a-c]{2,4}", 0..8), candidate in "[ a-cA-C]{0,6}") {
        let mut list = build_list(&existing.iter().map(|text| (text.clone(), false)).collect::<Vec<_>>());
        let mut ids = SequentialIds::starting_at(1_000);
        let clock = ManualClock::new(datetime!(2025-06-01 00:00 UTC));
        let before = list.len();

        let trimmed = candidate.trim();
        let chars = trimmed.chars().count();
        let duplicate = list
            .tasks()
            .iter()
            .any(|task| task.text().to_lowercase() == trimmed.to_lowercase());
        let expected = if chars == 0 {
            Err(ValidationError::Empty)
        } else if chars < MIN_TEXT_CHARS {
            Err(ValidationError::TooShort)
        } else if chars > MAX_TEXT_CHARS {
            Err(ValidationError::TooLong)
        } else if duplicate {
            Err(ValidationError::Duplicate)
        } else {
            Ok(trimmed.to_owned())
        };

        let outcome = list.add(&candidate, &mut ids, &clock).map(|task| task.text().to_owned());
        prop_assert_eq!(&outcome, &expected);
        let growth = usize::from(outcome.is_ok());
        prop_assert_eq!(list.len(), before + growth);
    }

    #[test]
    fn long_texts_are_rejected(extra in 1usize..20) {
        let mut list = TaskList::new();
        let mut ids = SequentialIds::new();
        let clock = ManualClock::new(datetime!(2025-06-01 00:00 UTC));
        let text = "z".repeat(MAX_TEXT_CHARS + extra);
        let outcome = list.add(&text, &mut ids, &clock).map(Task::id);
        prop_assert_eq!(outcome, Err(ValidationError::TooLong));
        prop_assert!(list.is_empty());
    }

    #[test]
    fn toggle_is_an_involution(entries in prop::collection::vec(("[a-z]{2,8}", any::<bool>()), 1..12), pick in any::<prop::sample::Index>()) {
        let mut list = build_list(&entries);
        prop_assume!(!list.is_empty());
        let ids: Vec<_> = list.ids().collect();
        let id = ids[pick.index(ids.len())];
        let original = list.clone();
        list.toggle(id);
        list.toggle(id);
        prop_assert_eq!(list, original);
    }

    #[test]
    fn clear_completed_is_idempotent(entries in prop::collection::vec(("[a-z]{2,8}", any::<bool>()), 0..12)) {
        let mut list = build_list(&entries);
        list.clear_completed();
        let once = list.clone();
        prop_assert_eq!(list.clear_completed(), 0);
        prop_assert_eq!(&list, &once);
        prop_assert!(list.tasks().iter().all(|task| !task.is_completed()));
    }

    #[test]
    fn projection_is_a_sorted_subset(
        entries in prop::collection::vec(("[a-zA-Z]{2,8}", any::<bool>()), 0..16),
        filter in filter_strategy(),
        sort in sort_strategy(),
    ) {
        let list = build_list(&entries);
        let view = project(list.tasks(), filter, sort);

        let expected_len = list.tasks().iter().filter(|task| filter.matches(task)).count();
        prop_assert_eq!(view.tasks.len(), expected_len);
        prop_assert!(view.tasks.iter().all(|task| filter.matches(task)));
        for pair in view.tasks.windows(2) {
            prop_assert!(sort.compare(pair[0], pair[1]) != std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn progress_tracks_completed_share(entries in prop::collection::vec(("[a-z]{2,8}", any::<bool>()), 0..16)) {
        let list = build_list(&entries);
        let counters = project(list.tasks(), TaskFilter::All, SortOrder::Newest).counters;
        let completed = list.tasks().iter().filter(|task| task.is_completed()).count();

        prop_assert_eq!(counters.total, list.len());
        prop_assert_eq!(counters.completed_count, completed);
        prop_assert_eq!(counters.active_count, list.len() - completed);
        if list.is_empty() {
            prop_assert_eq!(counters.progress_percentage.to_bits(), 0.0_f64.to_bits());
        } else {
            let expected = f64::from(u32::try_from(completed).unwrap_or(u32::MAX))
                / f64::from(u32::try_from(list.len()).unwrap_or(u32::MAX))
                * 100.0;
            prop_assert_eq!(counters.progress_percentage.to_bits(), expected.to_bits());
        }
    }
}
