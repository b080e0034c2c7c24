#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::OrgId;

/// The four levels of the organizational hierarchy.
///
/// Structural ordering is `Federation` > `RegionalBody` > `Region` >
/// `LocalAssociation`. The engine detects ordering violations when building
/// a hierarchy but never enforces them — rejecting bad writes belongs to
/// the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrgType {
    Federation,
    RegionalBody,
    Region,
    LocalAssociation,
}

impl OrgType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Federation => "federation",
            Self::RegionalBody => "regionalBody",
            Self::Region => "region",
            Self::LocalAssociation => "localAssociation",
        }
    }

    /// Structural rank, root-most first: `Federation` = 0,
    /// `LocalAssociation` = 3.
    ///
    /// A child's rank must be strictly greater than its parent's for the
    /// pair to be structurally consistent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Federation => 0,
            Self::RegionalBody => 1,
            Self::Region => 2,
            Self::LocalAssociation => 3,
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrgType {
    type Err = UnknownVariant;

    /// Case-insensitive parse accepting both the engine names and the
    /// legacy store values ("Dachverband", "Landesverband", "Verein").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federation" | "dachverband" => Ok(Self::Federation),
            "regionalbody" | "landesverband" => Ok(Self::RegionalBody),
            "region" => Ok(Self::Region),
            "localassociation" | "verein" => Ok(Self::LocalAssociation),
            _ => Err(UnknownVariant {
                field: "orgType",
                value: s.to_string(),
            }),
        }
    }
}

/// Federation affiliation of an organizational unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FederationCode {
    Ditib,
    Independent,
    Other,
}

impl FederationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ditib => "ditib",
            Self::Independent => "independent",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FederationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FederationCode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ditib" => Ok(Self::Ditib),
            "independent" => Ok(Self::Independent),
            "other" => Ok(Self::Other),
            _ => Err(UnknownVariant {
                field: "federationCode",
                value: s.to_string(),
            }),
        }
    }
}

/// Parse failure for one of the closed string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value {:?}", self.field, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// One flat organizational-unit row as returned by the record store.
///
/// `parent` is a raw pointer into the same record set; nothing here
/// guarantees it resolves. Resolution, orphan reporting, and cycle checks
/// are the hierarchy builder's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub id: OrgId,
    pub name: String,
    pub org_type: OrgType,
    #[serde(default)]
    pub parent: Option<OrgId>,
    #[serde(default)]
    pub federation_code: Option<FederationCode>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub deleted_flag: bool,
}

const fn default_true() -> bool {
    true
}

impl OrgUnit {
    /// A root record: no parent pointer at all.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
