use crate::models::error::SError;
use derive_more::Display;
use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A plain `major.minor.patch` release number.
///
/// Pre-release and build metadata are rejected on parse, so equality is
/// exactly component-wise.
#[derive(Display, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{_0}")]
pub struct ModVersion(Version);

impl ModVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parses "1", "1.2" or "1.2.3"; missing components are zero.
    pub fn parse(version_str: &str) -> Result<Self, SError> {
        let trimmed = version_str.trim();
        let padded = match trimmed.split('.').count() {
            1 => format!("{trimmed}.0.0"),
            2 => format!("{trimmed}.0"),
            _ => trimmed.to_string(),
        };

        let version = Version::parse(&padded)
            .map_err(|e| SError::ParseError(format!("invalid version '{version_str}': {e}")))?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(SError::ParseError(format!(
                "version '{version_str}' carries a pre-release or build suffix"
            )));
        }

        Ok(Self(version))
    }

    pub fn components(&self) -> [u64; 3] {
        [self.0.major, self.0.minor, self.0.patch]
    }
}

impl FromStr for ModVersion {
    type Err = SError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ModVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
