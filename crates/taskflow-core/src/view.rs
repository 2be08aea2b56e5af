use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::task::Task;

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl TaskFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Canonical name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Done",
        }
    }

    /// Whether `task` passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_completed(),
            Self::Completed => task.is_completed(),
        }
    }
}

/// Ordering applied to the filtered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// By text, ignoring case.
    Alphabetical,
    /// Incomplete tasks before completed ones, otherwise unchanged.
    #[serde(alias = "completed")]
    CompletedLast,
}

impl SortOrder {
    /// Every sort order, in display order.
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::Alphabetical, Self::CompletedLast];

    /// Canonical name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Alphabetical => "alphabetical",
            Self::CompletedLast => "completed-last",
        }
    }

    /// Label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::Alphabetical => "A-Z",
            Self::CompletedLast => "Completed Last",
        }
    }

    /// Compare two tasks under this order. Equal results keep input order when
    /// used with a stable sort.
    #[must_use]
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Newest => b.created_at().cmp(&a.created_at()),
            Self::Oldest => a.created_at().cmp(&b.created_at()),
            Self::Alphabetical => collate(a.text(), b.text()),
            Self::CompletedLast => a.is_completed().cmp(&b.is_completed()),
        }
    }
}

/// Unknown filter or sort order name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSelectionError {
    /// Not one of `all`, `active`, `completed`.
    #[error("unknown filter '{0}' (expected all, active or completed)")]
    Filter(String),
    /// Not one of `newest`, `oldest`, `alphabetical`, `completed-last`.
    #[error("unknown sort order '{0}' (expected newest, oldest, alphabetical or completed-last)")]
    Sort(String),
}

fn normalize_token(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

impl FromStr for TaskFilter {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseSelectionError::Filter(s.to_owned())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "alphabetical" | "a-z" => Ok(Self::Alphabetical),
            "completed-last" | "completed" => Ok(Self::CompletedLast),
            _ => Err(ParseSelectionError::Sort(s.to_owned())),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-friendly string ordering.
///
/// Letters are compared first without accents or case, so `éclair` sorts
/// between `apple` and `fig`. Remaining ties put unaccented before accented,
/// then lower case before upper case, then fall back to code point order.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| folded(a).cmp(&folded(b)))
        .then_with(|| a.nfd().map(char::is_uppercase).cmp(b.nfd().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> Vec<char> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn folded(s: &str) -> Vec<char> {
    s.nfd().flat_map(char::to_lowercase).collect()
}

/// Aggregate counts over the whole list, independent of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed_count: usize,
    /// `total - completed_count`.
    pub active_count: usize,
    /// `completed_count / total * 100`, or `0` for an empty list.
    pub progress_percentage: f64,
}

impl Counters {
    /// Count `tasks`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed_count = tasks.iter().filter(|task| task.is_completed()).count();
        let progress_percentage = if total == 0 {
            0.0
        } else {
            count_as_f64(completed_count) / count_as_f64(total) * 100.0
        };
        Self {
            total,
            completed_count,
            active_count: total - completed_count,
            progress_percentage,
        }
    }

    /// Progress rounded half-up to a whole percent.
    #[must_use]
    pub fn rounded_progress(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.completed_count * 200 + self.total) / (self.total * 2);
        u8::try_from(rounded).unwrap_or(100)
    }
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Why a projection came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The list itself is empty.
    NoTasks,
    /// Tasks exist but none pass the filter.
    NoMatches,
}

impl EmptyState {
    /// Primary message.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::NoTasks => "Ready to conquer your day?",
            Self::NoMatches => "No tasks match your filter",
        }
    }

    /// Follow-up suggestion.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::NoTasks => "Add your first task above!",
            Self::NoMatches => "Try a different filter",
        }
    }
}

/// Ordered view over a task list together with its counters.
#[derive(Debug, Clone, Serialize)]
pub struct Projection<'a> {
    /// Filter that produced this view.
    pub filter: TaskFilter,
    /// Sort order applied.
    pub sort: SortOrder,
    /// Visible tasks, in display order.
    pub tasks: Vec<&'a Task>,
    /// Counters over every task.
    pub counters: Counters,
}

impl Projection<'_> {
    /// Set when no task is visible.
    #[must_use]
    pub const fn empty_state(&self) -> Option<EmptyState> {
        if !self.tasks.is_empty() {
            None
        } else if self.counters.total == 0 {
            Some(EmptyState::NoTasks)
        } else {
            Some(EmptyState::NoMatches)
        }
    }
}

/// Filter then stably sort `tasks` without touching their stored order.
#[must_use]
pub fn project(tasks: &[Task], filter: TaskFilter, sort: SortOrder) -> Projection<'_> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    visible.sort_by(|a, b| sort.compare(a, b));
    Projection {
        filter,
        sort,
        tasks: visible,
        counters: Counters::from_tasks(tasks),
    }
}
