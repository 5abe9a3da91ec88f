//! Account permission levels
//!
//! Levels are ordered and travel over the wire as plain numbers, so a
//! permission check is a single comparison.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountPermission {
    /// Lowest tier, also assumed for anonymous visitors
    #[default]
    User = 1,
    Member = 2,
    Helper = 3,
    Admin = 4,
    Owner = 5,
}

#[derive(Debug, Error)]
#[error("Unknown permission level: {0}")]
pub struct UnknownPermission(pub u8);

impl TryFrom<u8> for AccountPermission {
    type Error = UnknownPermission;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::User),
            2 => Ok(Self::Member),
            3 => Ok(Self::Helper),
            4 => Ok(Self::Admin),
            5 => Ok(Self::Owner),
            other => Err(UnknownPermission(other)),
        }
    }
}

impl From<AccountPermission> for u8 {
    fn from(permission: AccountPermission) -> Self {
        permission as u8
    }
}

impl AccountPermission {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "玩家",
            Self::Member => "成员",
            Self::Helper => "协管",
            Self::Admin => "管理员",
            Self::Owner => "服主",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(AccountPermission::Helper < AccountPermission::Admin);
        assert!(AccountPermission::Owner > AccountPermission::Admin);
        assert_eq!(AccountPermission::default(), AccountPermission::User);
    }

    #[test]
    fn test_numeric_wire_format() {
        assert_eq!(serde_json::to_string(&AccountPermission::Helper).unwrap(), "3");
        let parsed: AccountPermission = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, AccountPermission::Owner);
        assert!(serde_json::from_str::<AccountPermission>("9").is_err());
    }
}
