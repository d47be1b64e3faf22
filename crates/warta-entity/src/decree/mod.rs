//! Village head decree (SK) vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use warta_core::error::AppError;

/// Publication state of a decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecreeStatus {
    Draft,
    Issued,
    Verified,
}

impl DecreeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Verified => "verified",
        }
    }

    /// Whether district-level verification may still be recorded.
    pub fn is_verifiable(&self) -> bool {
        matches!(self, Self::Issued)
    }
}

impl fmt::Display for DecreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecreeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "issued" => Ok(Self::Issued),
            "verified" => Ok(Self::Verified),
            other => Err(AppError::validation(format!(
                "unknown decree status: {other}"
            ))),
        }
    }
}
