//! Tool versions and version gates.
//!
//! Versions recorded in older projects are not always full semver triples
//! (`"0.2"` is common), so [`Version::parse`] pads missing minor/patch
//! components before handing the string to `semver`.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// A tool version with semantic-version ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse `1`, `1.2`, `1.2.3`, optionally prefixed by `v` and followed by
    /// semver pre-release (`-rc.1`) or build (`+abc`) suffixes.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let invalid = |reason: String| DomainError::InvalidVersion {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(invalid("empty version".into()));
        }

        let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (core, suffix) = trimmed.split_at(split_at);

        let components: Vec<&str> = core.split('.').collect();
        if components.len() > 3 {
            return Err(invalid(format!(
                "expected at most 3 numeric components, found {}",
                components.len()
            )));
        }
        if let Some(bad) = components
            .iter()
            .find(|c| c.is_empty() || !c.chars().all(|ch| ch.is_ascii_digit()))
        {
            return Err(invalid(format!("'{bad}' is not a number")));
        }

        let mut padded = components.join(".");
        for _ in components.len()..3 {
            padded.push_str(".0");
        }
        padded.push_str(suffix);

        semver::Version::parse(&padded)
            .map(Self)
            .map_err(|e| invalid(e.to_string()))
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decides whether a group of migration actions applies to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionGate {
    /// Applies to every update.
    Always,
    /// Applies when the recorded version is strictly lower than the threshold.
    Threshold(Version),
}

impl VersionGate {
    /// Shorthand for `Threshold(Version::parse(version)?)`.
    pub fn threshold(version: &str) -> Result<Self, DomainError> {
        Version::parse(version).map(Self::Threshold)
    }

    pub fn matches(&self, recorded: &Version) -> bool {
        match self {
            Self::Always => true,
            Self::Threshold(threshold) => recorded < threshold,
        }
    }
}

impl fmt::Display for VersionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Threshold(v) => write!(f, "< {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_forms() {
        assert_eq!(Version::parse("3").unwrap(), Version::new(3, 0, 0));
        assert_eq!(Version::parse("3.1").unwrap(), Version::new(3, 1, 0));
        assert_eq!(Version::parse("3.1.4").unwrap(), Version::new(3, 1, 4));
        assert_eq!(Version::parse(" v0.2 ").unwrap(), Version::new(0, 2, 0));
    }

    #[test]
    fn parses_prerelease_suffix() {
        let rc = Version::parse("1.0-rc.1").unwrap();
        assert_eq!(rc.to_string(), "1.0.0-rc.1");
        assert!(rc < Version::new(1, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "abc", "1.2.3.4", "1..2", "1.x", "4.0.2.post1"] {
            assert!(
                matches!(Version::parse(input), Err(DomainError::InvalidVersion { .. })),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn ordering_is_semantic() {
        assert!(Version::parse("0.10").unwrap() > Version::parse("0.9").unwrap());
        assert!(Version::parse("2.5").unwrap() < Version::parse("3.1").unwrap());
    }

    #[test]
    fn always_gate_matches_everything() {
        assert!(VersionGate::Always.matches(&Version::new(0, 0, 1)));
        assert!(VersionGate::Always.matches(&Version::new(99, 0, 0)));
    }

    #[test]
    fn threshold_gate_is_strict() {
        let gate = VersionGate::threshold("3.1").unwrap();
        assert!(gate.matches(&Version::parse("3.0.9").unwrap()));
        assert!(!gate.matches(&Version::parse("3.1").unwrap()));
        assert!(!gate.matches(&Version::parse("3.2").unwrap()));
    }

    #[test]
    fn gate_display() {
        assert_eq!(VersionGate::Always.to_string(), "always");
        assert_eq!(VersionGate::threshold("1.0").unwrap().to_string(), "< 1.0.0");
    }
}
