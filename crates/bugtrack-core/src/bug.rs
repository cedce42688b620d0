//! Bug value and severity level

use core::fmt;
use core::str::FromStr;

use crate::error::SeedError;
use crate::ledger::Obligation;

/// Severity of a bug
///
/// Higher values are more urgent. The five named levels cover the usual
/// triage scale; any other `u8` is accepted and orders numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Severity(u8);

impl Severity {
    /// Lowest severity
    pub const INFORMATIVE: Severity = Severity(0);

    pub const LOW: Severity = Severity(1);

    pub const MEDIUM: Severity = Severity(2);

    pub const HIGH: Severity = Severity(3);

    /// Highest named severity
    pub const CRITICAL: Severity = Severity(4);

    /// Named levels, lowest to highest
    pub const NAMED: [Severity; 5] = [
        Severity::INFORMATIVE,
        Severity::LOW,
        Severity::MEDIUM,
        Severity::HIGH,
        Severity::CRITICAL,
    ];

    #[inline]
    pub const fn new(level: u8) -> Self {
        Severity(level)
    }

    /// Raw numeric level
    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Level name, if this is one of the named levels
    pub const fn name(&self) -> Option<&'static str> {
        match self.0 {
            0 => Some("informative"),
            1 => Some("low"),
            2 => Some("medium"),
            3 => Some("high"),
            4 => Some("critical"),
            _ => None,
        }
    }
}

impl From<u8> for Severity {
    fn from(level: u8) -> Self {
        Severity(level)
    }
}

impl From<Severity> for u8 {
    fn from(sev: Severity) -> u8 {
        sev.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Severity {
    type Err = SeedError;

    /// Accepts a level name (case-insensitive) or a number in `0..=255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let named = Severity::NAMED
            .iter()
            .find(|sev| sev.name() == Some(lower.as_str()));
        if let Some(sev) = named {
            return Ok(*sev);
        }
        trimmed
            .parse::<u8>()
            .map(Severity)
            .map_err(|_| SeedError::BadSeverity(trimmed.to_string()))
    }
}

/// A single bug
///
/// Bugs are created by a `BugTracker` (which assigns the insertion sequence)
/// and are never cloned: there is exactly one owner at any time. Dropping
/// or releasing a `Bug` discharges its entry in the tracker's `Ledger`.
#[derive(Debug)]
pub struct Bug {
    id: String,
    severity: Severity,
    seq: u64,
    _obligation: Obligation,
}

impl Bug {
    pub(crate) fn new(id: String, severity: Severity, seq: u64, obligation: Obligation) -> Self {
        Self {
            id,
            severity,
            seq,
            _obligation: obligation,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Insertion sequence within the tracker that created this bug
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Release this bug
    ///
    /// Equivalent to dropping it; spelled out for callers that mirror the
    /// explicit free of the C boundary.
    pub fn release(self) {
        crate::ktrace!("release bug {} (seq {})", self.id, self.seq);
    }

    /// Check whether `id` can be used as a bug id
    ///
    /// Ids must be non-empty and free of NUL bytes so they survive the
    /// trip through a C string.
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty() && !id.as_bytes().contains(&0)
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.severity)
    }
}
