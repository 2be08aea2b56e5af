use thiserror::Error;

use crate::task::Task;

/// Minimum number of characters in a trimmed task text.
pub const MIN_TEXT_CHARS: usize = 2;
/// Maximum number of characters in a trimmed task text.
pub const MAX_TEXT_CHARS: usize = 100;

/// Reason a candidate task text was rejected.
///
/// The `Display` form is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// Nothing but whitespace.
    #[error("Task cannot be empty")]
    Empty,
    /// Fewer than [`MIN_TEXT_CHARS`] characters.
    #[error("Task must be at least 2 characters long")]
    TooShort,
    /// More than [`MAX_TEXT_CHARS`] characters.
    #[error("Task must be less than 100 characters")]
    TooLong,
    /// Another task already has the same text, ignoring case.
    #[error("Task already exists")]
    Duplicate,
}

/// Trimmed text on acceptance, the rejection reason otherwise.
pub type ValidationResult = Result<String, ValidationError>;

/// Check `candidate` against the current tasks.
///
/// # Errors
/// Returns the first failing rule, checked in the order empty, too short,
/// too long, duplicate.
pub fn validate(candidate: &str, existing: &[Task]) -> ValidationResult {
    let trimmed = candidate.trim();
    let chars = trimmed.chars().count();
    if chars == 0 {
        return Err(ValidationError::Empty);
    }
    if chars < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort);
    }
    if chars > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong);
    }
    let folded = trimmed.to_lowercase();
    if existing
        .iter()
        .any(|task| task.text().trim().to_lowercase() == folded)
    {
        return Err(ValidationError::Duplicate);
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::macros::datetime;

    fn task(text: &str) -> Task {
        Task::new(TaskId::new(), text, datetime!(2025-01-01 09:00 UTC))
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(validate("", &[]), Err(ValidationError::Empty));
        assert_eq!(validate(" ", &[]), Err(ValidationError::Empty));
        assert_eq!(validate("\t\n ", &[]), Err(ValidationError::Empty));
    }

    #[test]
    fn rejects_single_character() {
        assert_eq!(validate("a", &[]), Err(ValidationError::TooShort));
        assert_eq!(validate("  a  ", &[]), Err(ValidationError::TooShort));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert_eq!(validate("ab", &[]), Ok("ab".to_owned()));
        let longest = "x".repeat(MAX_TEXT_CHARS);
        assert_eq!(validate(&longest, &[]), Ok(longest.clone()));
        let too_long = "x".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(validate(&too_long, &[]), Err(ValidationError::TooLong));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_TEXT_CHARS);
        assert!(accented.len() > MAX_TEXT_CHARS);
        assert!(validate(&accented, &[]).is_ok());
    }

    #[test]
    fn surrounding_whitespace_does_not_count() {
        let padded = format!("   {}   ", "y".repeat(MAX_TEXT_CHARS));
        assert_eq!(validate(&padded, &[]), Ok("y".repeat(MAX_TEXT_CHARS)));
    }

    #[test]
    fn duplicates_ignore_case() {
        let existing = vec![task("Buy milk")];
        assert_eq!(validate("buy milk", &existing), Err(ValidationError::Duplicate));
        assert_eq!(validate("  BUY MILK ", &existing), Err(ValidationError::Duplicate));
        assert_eq!(validate("Buy milk!", &existing), Ok("Buy milk!".to_owned()));
    }

    #[test]
    fn duplicates_fold_non_ascii_case() {
        let existing = vec![task("Ärger melden")];
        assert_eq!(validate("ärger melden", &existing), Err(ValidationError::Duplicate));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(ValidationError::Empty.to_string(), "Task cannot be empty");
        assert_eq!(
            ValidationError::TooShort.to_string(),
            "Task must be at least 2 characters long"
        );
        assert_eq!(
            ValidationError::TooLong.to_string(),
            "Task must be less than 100 characters"
        );
        assert_eq!(ValidationError::Duplicate.to_string(), "Task already exists");
    }
}
