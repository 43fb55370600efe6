use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use openrpc_util::serde_helpers;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Base58 libp2p peer id, kept in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

        if s.is_empty() || !s.chars().all(|c| BASE58.contains(c)) {
            return Err(TypeError::InvalidAddress(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolId(pub String);

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProtocolId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

/// Peer id with its known multiaddresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddrInfo {
    #[serde(rename = "ID")]
    pub id: PeerId,
    #[serde(rename = "Addrs", default, with = "serde_helpers::null_default")]
    pub addrs: Vec<String>,
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $kind:literal {
            $($variant:ident = $value:literal),*$(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        $vis enum $name {
            $($variant = $value,)*
        }

        impl TryFrom<u8> for $name {
            type Error = TypeError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)*
                    value => Err(TypeError::UnknownEnumValue { kind: $kind, value }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }
    };
}

int_enum! {
    /// Connection state between the node and a peer.
    pub enum Connectedness: "connectedness" {
        NotConnected = 0,
        Connected = 1,
        CanConnect = 2,
        CannotConnect = 3,
        Limited = 4,
    }
}

int_enum! {
    /// Reachability of the node as seen by the NAT service.
    pub enum Reachability: "reachability" {
        Unknown = 0,
        Public = 1,
        Private = 2,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BandwidthStats {
    pub total_in: i64,
    pub total_out: i64,
    pub rate_in: f64,
    pub rate_out: f64,
}

/// Resource usage of a single resource manager scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScopeStat {
    pub num_streams_inbound: i64,
    pub num_streams_outbound: i64,
    pub num_conns_inbound: i64,
    pub num_conns_outbound: i64,
    #[serde(rename = "NumFD")]
    pub num_fd: i64,
    pub memory: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourceManagerStat {
    pub system: ScopeStat,
    pub transient: ScopeStat,
    pub services: Option<BTreeMap<String, ScopeStat>>,
    pub protocols: Option<BTreeMap<String, ScopeStat>>,
    pub peers: Option<BTreeMap<String, ScopeStat>>,
}
