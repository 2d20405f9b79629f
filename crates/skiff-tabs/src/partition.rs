//! Tab partitions
//!
//! ```text
//! Regular ── tabs shown in the default grid
//! Private ── tabs shown in the private grid
//! ```
//!
//! A tab never changes partition after creation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPartition {
    #[default]
    Regular,
    Private,
}

impl TabPartition {
    pub fn from_private(is_private: bool) -> Self {
        if is_private {
            TabPartition::Private
        } else {
            TabPartition::Regular
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, TabPartition::Private)
    }

    pub fn other(&self) -> Self {
        match self {
            TabPartition::Regular => TabPartition::Private,
            TabPartition::Private => TabPartition::Regular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabPartition::Regular => "regular",
            TabPartition::Private => "private",
        }
    }
}

impl std::fmt::Display for TabPartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabPartition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(TabPartition::Regular),
            "private" => Ok(TabPartition::Private),
            _ => Err(format!("Unknown tab partition: {}", s)),
        }
    }
}
