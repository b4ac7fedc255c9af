//! Partition naming
//!
//! Every partition the agent owns is named `{prefix}{role}-{version}`, e.g.
//! `pavi-fast-core-2026.01.15-01`. The prefix is what separates our
//! partitions from those of other applications sharing the same storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role tag of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionRole {
    /// Application shell, populated at install
    Core,
    /// Runtime assets, populated lazily
    Assets,
}

impl PartitionRole {
    /// All roles, core first
    pub fn all() -> &'static [Self] {
        &[Self::Core, Self::Assets]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Assets => "assets",
        }
    }
}

impl fmt::Display for PartitionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartitionRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Self::Core),
            "assets" => Ok(Self::Assets),
            _ => Err(()),
        }
    }
}

/// Parsed partition name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionName {
    pub prefix: String,
    pub role: PartitionRole,
    pub version: String,
}

impl PartitionName {
    pub fn new(prefix: &str, role: PartitionRole, version: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            role,
            version: version.to_string(),
        }
    }

    /// Try to parse a storage name under `prefix`
    ///
    /// Returns `None` for names that lack the prefix or carry an unknown role.
    pub fn parse(prefix: &str, name: &str) -> Option<Self> {
        let rest = name.strip_prefix(prefix)?;
        let (role, version) = rest.split_once('-')?;
        let role = role.parse().ok()?;
        if version.is_empty() {
            return None;
        }
        Some(Self::new(prefix, role, version))
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.prefix, self.role, self.version)
    }
}

/// How a stored partition relates to the running version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStatus {
    /// Name matches a current role+version pair
    Current,
    /// Carries our prefix but is not current; eligible for eviction
    Stale,
    /// Belongs to something else; never touched
    Foreign,
}

impl fmt::Display for PartitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Stale => write!(f, "stale"),
            Self::Foreign => write!(f, "foreign"),
        }
    }
}
