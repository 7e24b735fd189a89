//! Dotted version numbers embedded in names such as `v10.0A` or `14.0`.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").expect("valid version pattern"));

/// A dotted version compared component by component.
#[derive(Debug, Clone)]
pub struct Version(Vec<u64>);

impl Version {
    /// Extract the first dotted number from `name`.
    ///
    /// ```
    /// use buildrig_domain::tool::Version;
    ///
    /// assert_eq!(Version::extract("v10.0A").unwrap().to_string(), "10.0");
    /// assert!(Version::extract("unversioned").is_none());
    /// ```
    pub fn extract(name: &str) -> Option<Self> {
        let found = VERSION_PATTERN.find(name)?;
        let parts = found
            .as_str()
            .split('.')
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Self(parts))
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Sort names by embedded version, highest first.
///
/// Names without a version go last; ties keep their original order.
pub fn sort_by_version_desc(names: &mut [String]) {
    names.sort_by_cached_key(|name| std::cmp::Reverse(Version::extract(name)));
}
