//! Deletion-group identifiers and the on-disk container naming scheme.
//!
//! A container directory is named `<YYYY-MM-DDTHH-MM-SS>-<id>`. The id is the
//! creation time in nanoseconds, written in base 36 and then reversed so that
//! groups created close together differ in their first characters, which
//! keeps short prefixes usable on the command line.
//!
//! [`ContainerName`] is the only place that knows this layout; resolution
//! works on [`GroupId`] values and their prefix match.

use crate::helpers::{format_container_time, parse_container_time};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque, prefix-matchable identifier of a deletion group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when `prefix` is a (possibly complete) prefix of this id.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Parsed form of a deletion-group container directory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerName {
    created: DateTime<Utc>,
    id: GroupId,
}

impl ContainerName {
    pub fn new(created: DateTime<Utc>, id: GroupId) -> Self {
        Self { created, id }
    }

    /// Parses a directory name; returns `None` for names outside the scheme.
    pub fn parse(name: &str) -> Option<Self> {
        let (time, id) = name.rsplit_once('-')?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        let created = parse_container_time(time)?;
        Some(Self::new(created, GroupId::new(id)))
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_container_time(&self.created), self.id)
    }
}

/// Formats `value` as lowercase base-36 digits.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Produces container names for new deletion groups.
///
/// Within one generator the nanosecond value never repeats: a clock reading
/// at or behind the previous one is bumped to `previous + 1`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_nanos: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, now: SystemTime) -> ContainerName {
        let reading = now
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        let mut previous = self.last_nanos.load(Ordering::Relaxed);
        let nanos = loop {
            let candidate = reading.max(previous.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => previous = actual,
            }
        };

        let id: String = to_base36(nanos).chars().rev().collect();
        let created = DateTime::from_timestamp_nanos(i64::try_from(nanos).unwrap_or(i64::MAX));
        ContainerName::new(created, GroupId::new(id))
    }
}
