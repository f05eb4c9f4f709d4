//! Ordering for the loosely formatted version strings published on the forge.
//!
//! Forge releases are not guaranteed to follow semver: some carry a build
//! counter after a hyphen (`1.2.3-4`), some carry letters (`2.0.0-beta`).
//! Instead of parsing them as semver we reduce every string to a sequence of
//! unsigned integers and compare those.

use std::{cmp::Ordering, fmt::Display};

/// Orderable key derived from a raw version string with [`normalize`].
///
/// Trailing zero components are dropped when the key is built, so `1.2` and
/// `1.2.0` are equal and `1.2 < 1.2.1`. A key without components is the
/// lowest possible version.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey(Vec<u64>);

impl VersionKey {
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Builds the comparison key of a raw version string.
///
/// 1. every ASCII letter is removed,
/// 2. every `-` becomes a `.`,
/// 3. the result is split on `.` and each component is read as a number.
///
/// A component holding no digits (`2.0.0-beta` leaves a trailing empty one)
/// counts as zero. Any other stray character inside a component is ignored
/// and values too large for `u64` saturate.
pub fn normalize(raw: &str) -> VersionKey {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_ascii_alphabetic())
        .map(|c| if c == '-' { '.' } else { c })
        .collect();

    let mut components: Vec<u64> = stripped.split('.').map(parse_component).collect();
    while components.last() == Some(&0) {
        components.pop();
    }
    VersionKey(components)
}

fn parse_component(component: &str) -> u64 {
    component
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

pub fn compare(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b))
}

/// Picks the item with the highest normalized version.
///
/// The scan only replaces the current best on a strictly greater key, so when
/// several items normalize to the same key the first one seen wins.
pub fn latest<T, F>(items: impl IntoIterator<Item = T>, version_of: F) -> Option<T>
where
    F: Fn(&T) -> &str,
{
    let mut best: Option<(VersionKey, T)> = None;
    for item in items {
        let key = normalize(version_of(&item));
        let newer = match &best {
            Some((best_key, _)) => key > *best_key,
            None => true,
        };
        if newer {
            best = Some((key, item));
        }
    }
    best.map(|(_, item)| item)
}

/// Splits a `X.Y.Z-R` version into the version proper and its release counter.
pub fn split_release(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((version, release)) => (version, Some(release)),
        None => (version, None),
    }
}
