//! Seed lists for pre-populated trackers
//!
//! Format: `ID:SEVERITY` entries separated by commas, e.g.
//! `A:9,B:2,C:5` or `login-crash:critical,typo:informative`.
//! Whitespace around entries and fields is ignored; empty entries are
//! skipped.

use crate::bug::Severity;
use crate::constants::{SEED_ENTRY_SEPARATOR, SEED_FIELD_SEPARATOR};
use crate::error::SeedError;

/// One bug to insert at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBug {
    pub id: String,
    pub severity: Severity,
}

impl SeedBug {
    pub fn new(id: impl Into<String>, severity: impl Into<Severity>) -> Self {
        Self {
            id: id.into(),
            severity: severity.into(),
        }
    }
}

/// Seed used by `new_bugtracker()` when nothing else is configured:
/// `{A:9, B:2, C:5}`, inserted in that order.
pub fn default_seed() -> Vec<SeedBug> {
    vec![
        SeedBug::new("A", 9),
        SeedBug::new("B", 2),
        SeedBug::new("C", 5),
    ]
}

/// Parse a seed list
pub fn parse_seed(input: &str) -> Result<Vec<SeedBug>, SeedError> {
    input
        .split(SEED_ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Result<SeedBug, SeedError> {
    // Split on the last separator so ids may themselves contain ':'
    let (id, sev) = entry
        .rsplit_once(SEED_FIELD_SEPARATOR)
        .ok_or_else(|| SeedError::MissingSeparator(entry.to_string()))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(SeedError::EmptyId(entry.to_string()));
    }

    Ok(SeedBug {
        id: id.to_string(),
        severity: sev.parse()?,
    })
}
