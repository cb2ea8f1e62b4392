//! Role, permission and auth-level taxonomy.
//!
//! The tables below are the whole mapping; the backend owns any role
//! hierarchy, so nothing here resolves inheritance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    Authorization,
    #[serde(rename = "useStore")]
    UseStore,
    UseAccountSettings,
    UseCart,
    Purchase,
    ReadComments,
    WriteComment,
    AlterCompanyStore,
    ManageCompanyForms,
    AlterCompanyRestrictedInfo,
    UseModerationPanel,
    Administrator,
}

impl Permission {
    pub const ALL: [Permission; 12] = [
        Self::Authorization,
        Self::UseStore,
        Self::UseAccountSettings,
        Self::UseCart,
        Self::Purchase,
        Self::ReadComments,
        Self::WriteComment,
        Self::AlterCompanyStore,
        Self::ManageCompanyForms,
        Self::AlterCompanyRestrictedInfo,
        Self::UseModerationPanel,
        Self::Administrator,
    ];

    /// Wire tag, matching the backend's enum spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "Authorization",
            Self::UseStore => "useStore",
            Self::UseAccountSettings => "UseAccountSettings",
            Self::UseCart => "UseCart",
            Self::Purchase => "Purchase",
            Self::ReadComments => "ReadComments",
            Self::WriteComment => "WriteComment",
            Self::AlterCompanyStore => "AlterCompanyStore",
            Self::ManageCompanyForms => "ManageCompanyForms",
            Self::AlterCompanyRestrictedInfo => "AlterCompanyRestrictedInfo",
            Self::UseModerationPanel => "UseModerationPanel",
            Self::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Guest,
    Shopper,
    Limited,
    Standard,
    ModeratorCompany,
    ManagerCompany,
    Moderator,
    Admin,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Self::Guest,
        Self::Shopper,
        Self::Limited,
        Self::Standard,
        Self::ModeratorCompany,
        Self::ManagerCompany,
        Self::Moderator,
        Self::Admin,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Shopper => "Shopper",
            Self::Limited => "Limited",
            Self::Standard => "Standard",
            Self::ModeratorCompany => "ModeratorCompany",
            Self::ManagerCompany => "ManagerCompany",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }

    /// Permissions granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission as P;

        match self {
            Role::Guest => &[],
            Role::Shopper => &[P::UseStore, P::Purchase],
            Role::Limited => &[P::UseAccountSettings],
            Role::Standard => &[
                P::UseAccountSettings,
                P::UseCart,
                P::UseStore,
                P::Purchase,
                P::ReadComments,
                P::WriteComment,
            ],
            Role::ModeratorCompany => &[
                P::UseAccountSettings,
                P::UseCart,
                P::UseStore,
                P::Purchase,
                P::ReadComments,
                P::WriteComment,
                P::AlterCompanyStore,
                P::ManageCompanyForms,
            ],
            Role::ManagerCompany => &[
                P::UseAccountSettings,
                P::UseCart,
                P::UseStore,
                P::Purchase,
                P::ReadComments,
                P::WriteComment,
                P::AlterCompanyStore,
                P::ManageCompanyForms,
                P::AlterCompanyRestrictedInfo,
            ],
            Role::Moderator => &[
                P::UseAccountSettings,
                P::UseCart,
                P::UseStore,
                P::Purchase,
                P::ReadComments,
                P::WriteComment,
                P::UseModerationPanel,
            ],
            Role::Admin => &Permission::ALL,
        }
    }

    pub const fn auth_level(&self) -> AuthLevel {
        match self {
            Role::Guest => AuthLevel::NotRestricted,
            Role::Shopper | Role::Limited | Role::Standard | Role::ModeratorCompany => {
                AuthLevel::Normal
            }
            Role::ManagerCompany => AuthLevel::High,
            Role::Moderator => AuthLevel::Higher,
            Role::Admin => AuthLevel::Highest,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Ordinal sensitivity level; higher values unlock more.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum AuthLevel {
    #[default]
    NotRestricted = 0,
    Normal = 1,
    High = 2,
    Higher = 3,
    Highest = 4,
}

impl AuthLevel {
    pub const ALL: [AuthLevel; 5] = [
        Self::NotRestricted,
        Self::Normal,
        Self::High,
        Self::Higher,
        Self::Highest,
    ];

    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}
