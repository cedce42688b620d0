//! Error types for the bug tracker

use core::fmt;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur in tracker operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// No bugs queued (pop on an empty tracker)
    Empty,

    /// Backing storage could not grow
    Exhausted,

    /// Bug id is empty or contains a NUL byte
    InvalidId(String),

    /// Configuration rejected by `TrackerConfig::validate`
    InvalidConfig(&'static str),

    /// Seed list could not be parsed
    Seed(SeedError),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Empty => write!(f, "no bugs available"),
            TrackerError::Exhausted => write!(f, "tracker storage exhausted"),
            TrackerError::InvalidId(id) => write!(f, "invalid bug id: {:?}", id),
            TrackerError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            TrackerError::Seed(e) => write!(f, "seed error: {}", e),
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<std::collections::TryReserveError> for TrackerError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TrackerError::Exhausted
    }
}

/// Seed list parse errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// Entry has no `:` between id and severity
    MissingSeparator(String),

    /// Entry has an empty id
    EmptyId(String),

    /// Severity is neither a level name nor a number in 0..=255
    BadSeverity(String),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::MissingSeparator(entry) => {
                write!(f, "entry {:?} is missing ':' separator", entry)
            }
            SeedError::EmptyId(entry) => write!(f, "entry {:?} has an empty id", entry),
            SeedError::BadSeverity(sev) => write!(f, "unknown severity {:?}", sev),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<SeedError> for TrackerError {
    fn from(e: SeedError) -> Self {
        TrackerError::Seed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(TrackerError::Empty.to_string(), "no bugs available");

        let e = TrackerError::Seed(SeedError::BadSeverity("urgent".into()));
        assert_eq!(e.to_string(), "seed error: unknown severity \"urgent\"");
    }

    #[test]
    fn test_error_conversion() {
        let seed_err = SeedError::EmptyId(":3".into());
        let err: TrackerError = seed_err.into();
        assert!(matches!(err, TrackerError::Seed(SeedError::EmptyId(_))));
    }

    #[test]
    fn test_try_reserve_maps_to_exhausted() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(TrackerError::from(err), TrackerError::Exhausted);
    }
}
