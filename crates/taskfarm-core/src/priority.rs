use crate::{Result, TaskError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority tiers for work units. The derived `Ord` follows declaration
/// order, so sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank used for ordering: High=0, Medium=1, Low=2.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Construct from a rank byte, rejecting anything outside the
    /// recognized set.
    pub fn from_rank(rank: u8) -> Result<Self> {
        match rank {
            0 => Ok(Priority::High),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::Low),
            other => Err(TaskError::UnknownPriority(other.to_string())),
        }
    }

    /// Construct from a tier label, rejecting unrecognized labels.
    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(TaskError::UnknownPriority(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
