use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a procurement request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Submitted, waiting for an approval decision
    Pending,
    /// Approved, waiting for fulfillment
    Approved,
    /// Partially fulfilled; the remainder is still open
    Partial,
    /// Fully fulfilled
    Done,
    /// Declined with a reason
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Partial => "partial",
            Self::Done => "done",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not part of the fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status: {0:?}")]
pub struct ParseStatusError(pub String);

impl std::str::FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "partial" => Ok(Self::Partial),
            "done" => Ok(Self::Done),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}
