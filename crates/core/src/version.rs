//! Version calculation and bumping logic.
//!
//! Releases are named by plain `major.minor.patch` triples. This module
//! provides parsing, numeric ordering and the bump rules used to pick the
//! next release version.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of version bump for a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Patch version bump (0.0.X).
    Patch,
    /// Minor version bump (0.X.0).
    Minor,
    /// Major version bump (X.0.0). Only ever requested explicitly.
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// A release version.
///
/// Field order makes the derived ordering numeric and component-wise, so
/// `1.9.0 < 1.10.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
}

impl Version {
    /// Create a new version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Apply a bump type to this version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] if the bumped component would
    /// overflow.
    pub fn bump(&self, bump_type: BumpType) -> Result<Self> {
        let overflow = || Error::invalid_version(self.to_string());
        Ok(match bump_type {
            BumpType::Major => Self::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpType::Minor => Self::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0),
            BumpType::Patch => Self::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts[..] else {
            return Err(Error::invalid_version(s));
        };

        let component = |part: &str| -> Result<u64> {
            // Reject signs and whitespace that u64::from_str would otherwise accept
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_version(s));
            }
            // Only the canonical spelling, so a version maps back to one file name
            if part.len() > 1 && part.starts_with('0') {
                return Err(Error::invalid_version(s));
            }
            part.parse().map_err(|_| Error::invalid_version(s))
        };

        Ok(Self::new(component(major)?, component(minor)?, component(patch)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the version that follows `last_released` for the given bump.
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`] if the next version cannot be
/// represented.
pub fn next_version(last_released: &Version, bump_type: BumpType) -> Result<Version> {
    last_released.bump(bump_type)
}

/// Return the highest of the given versions, or `0.0.0` if there are none.
#[must_use]
pub fn last_released_version<'a, I>(versions: I) -> Version
where
    I: IntoIterator<Item = &'a Version>,
{
    versions.into_iter().max().copied().unwrap_or_default()
}
