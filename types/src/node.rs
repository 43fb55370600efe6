use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Access level of an auth token.
///
/// Levels are ordered: a token with a higher level may call every method
/// that requires a lower one. `Public` is never required by a method, it is
/// only reported for tokens without read access.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Public,
    Read,
    Write,
    Admin,
}

impl Permission {
    pub const ALL: [Self; 4] = [Self::Public, Self::Read, Self::Write, Self::Admin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// All levels up to and including this one, as the node grants them.
    pub fn implied(self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|p| *p <= self).collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownPermission(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NodeType {
    Light = 1,
    Full = 2,
    Bridge = 3,
}

impl TryFrom<u8> for NodeType {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Light),
            2 => Ok(Self::Full),
            3 => Ok(Self::Bridge),
            value => Err(TypeError::UnknownEnumValue {
                kind: "node type",
                value,
            }),
        }
    }
}

impl From<NodeType> for u8 {
    fn from(value: NodeType) -> Self {
        value as u8
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Full => "full",
            Self::Bridge => "bridge",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub api_version: String,
}
