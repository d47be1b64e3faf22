//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles of village-government dashboard users.
///
/// District admins, village heads, and treasurers additionally receive
/// role-broadcast notifications targeted at their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Supervises multiple villages at the district (kecamatan) level.
    DistrictAdmin,
    /// Head of the village government (kades).
    VillageHead,
    /// Village secretary; issues decrees.
    Secretary,
    /// Manages village finances; executes approved budgets.
    Treasurer,
    /// General administrative staff.
    Staff,
}

impl UserRole {
    /// Whether viewers with this role subscribe to role-broadcast
    /// notifications in addition to their personal ones.
    pub fn broadcast_eligible(&self) -> bool {
        matches!(
            self,
            Self::DistrictAdmin | Self::VillageHead | Self::Treasurer
        )
    }

    /// Check if this role is a district admin.
    pub fn is_district_admin(&self) -> bool {
        matches!(self, Self::DistrictAdmin)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DistrictAdmin => "district_admin",
            Self::VillageHead => "village_head",
            Self::Secretary => "secretary",
            Self::Treasurer => "treasurer",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = warta_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "district_admin" => Ok(Self::DistrictAdmin),
            "village_head" => Ok(Self::VillageHead),
            "secretary" => Ok(Self::Secretary),
            "treasurer" => Ok(Self::Treasurer),
            "staff" => Ok(Self::Staff),
            _ => Err(warta_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: district_admin, village_head, secretary, treasurer, staff"
            ))),
        }
    }
}
