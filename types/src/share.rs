use std::fmt;
use std::str::FromStr;

use openrpc_util::serde_helpers;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

pub const NS_VERSION_SIZE: usize = 1;
pub const NS_ID_SIZE: usize = 28;
pub const NS_SIZE: usize = NS_VERSION_SIZE + NS_ID_SIZE;
/// Number of user-controlled trailing bytes in a version 0 namespace id.
pub const NS_ID_V0_SIZE: usize = 10;
pub const SHARE_SIZE: usize = 512;

const NS_V0_PREFIX: usize = NS_ID_SIZE - NS_ID_V0_SIZE;
const NS_VERSION_MAX: u8 = u8::MAX;

/// A namespace tag: one version byte followed by a 28 byte id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace([u8; NS_SIZE]);

impl Namespace {
    /// Builds a version 0 namespace from up to 10 id bytes (left padded with zeros).
    pub fn new_v0(id: &[u8]) -> Result<Self, TypeError> {
        if id.len() > NS_ID_V0_SIZE {
            return Err(TypeError::InvalidNamespaceSize {
                expected: NS_ID_V0_SIZE,
                actual: id.len(),
            });
        }

        let mut bytes = [0u8; NS_SIZE];
        bytes[NS_SIZE - id.len()..].copy_from_slice(id);
        Ok(Self(bytes))
    }

    pub fn from_raw(bytes: &[u8]) -> Result<Self, TypeError> {
        let bytes: [u8; NS_SIZE] = bytes
            .try_into()
            .map_err(|_e| TypeError::InvalidNamespaceSize {
                expected: NS_SIZE,
                actual: bytes.len(),
            })?;

        match bytes[0] {
            0 => {
                let prefix = &bytes[NS_VERSION_SIZE..NS_VERSION_SIZE + NS_V0_PREFIX];
                if prefix.iter().any(|&b| b != 0) {
                    return Err(TypeError::InvalidNamespaceV0Prefix(NS_V0_PREFIX));
                }
            }
            // Reserved namespaces (tail padding, parity shares).
            NS_VERSION_MAX => {}
            version => return Err(TypeError::UnsupportedNamespaceVersion(version)),
        }

        Ok(Self(bytes))
    }

    pub const fn version(&self) -> u8 {
        self.0[0]
    }

    pub fn id(&self) -> &[u8] {
        &self.0[NS_VERSION_SIZE..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({self})")
    }
}

/// Accepts either a full hex-encoded namespace or a hex-encoded v0 id.
impl FromStr for Namespace {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        if bytes.len() == NS_SIZE {
            Self::from_raw(&bytes)
        } else {
            Self::new_v0(&bytes)
        }
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_helpers::base64::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let bytes = serde_helpers::base64::deserialize(deserializer)?;
        Self::from_raw(&bytes).map_err(Error::custom)
    }
}

/// A fixed-size unit of erasure-coded block data.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Share(#[serde(with = "serde_helpers::base64")] Vec<u8>);

impl Share {
    pub fn from_raw(data: Vec<u8>) -> Result<Self, TypeError> {
        if data.len() != SHARE_SIZE {
            return Err(TypeError::InvalidShareSize {
                expected: SHARE_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self(data))
    }

    /// Namespace prefix of the share.
    pub fn namespace(&self) -> Result<Namespace, TypeError> {
        match self.0.get(..NS_SIZE) {
            Some(prefix) => Namespace::from_raw(prefix),
            None => Err(TypeError::InvalidShareSize {
                expected: SHARE_SIZE,
                actual: self.0.len(),
            }),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Share({} bytes)", self.0.len())
    }
}

/// Namespaced merkle tree inclusion proof for a range of leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NmtProof {
    pub start: i64,
    pub end: i64,
    #[serde(default, with = "serde_helpers::base64_list")]
    pub nodes: Vec<Vec<u8>>,
    #[serde(default, with = "serde_helpers::option_base64")]
    pub leaf_hash: Option<Vec<u8>>,
    #[serde(default)]
    pub is_max_namespace_ignored: bool,
}

impl NmtProof {
    pub fn is_empty(&self) -> bool {
        self.start == self.end && self.nodes.is_empty()
    }

    /// Proof of absence: no leaves in range, only the closest leaf hash.
    pub fn is_of_absence(&self) -> bool {
        self.leaf_hash.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacedRow {
    #[serde(default, with = "serde_helpers::null_default")]
    pub shares: Vec<Share>,
    pub proof: NmtProof,
}

/// Shares of one namespace, grouped by the rows they were found in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespacedShares {
    #[serde(with = "serde_helpers::null_default")]
    pub rows: Vec<NamespacedRow>,
}

impl NamespacedShares {
    pub fn shares(&self) -> impl Iterator<Item = &Share> {
        self.rows.iter().flat_map(|row| row.shares.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.shares.is_empty())
    }
}

/// Erasure-coded block data, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedDataSquare {
    #[serde(default, with = "serde_helpers::null_default")]
    pub data_square: Vec<Share>,
    pub codec: String,
}

impl ExtendedDataSquare {
    pub fn width(&self) -> usize {
        self.data_square.len().isqrt()
    }

    pub fn row(&self, index: usize) -> Option<&[Share]> {
        let width = self.width();
        if index >= width {
            return None;
        }
        self.data_square.get(index * width..(index + 1) * width)
    }

    pub fn share(&self, row: usize, col: usize) -> Option<&Share> {
        self.row(row)?.get(col)
    }
}
