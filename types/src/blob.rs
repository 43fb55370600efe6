use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use openrpc_util::serde_helpers;
use serde::{Deserialize, Serialize};

use crate::share::{Namespace, NmtProof};

/// An opaque namespaced payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub namespace: Namespace,
    #[serde(with = "serde_helpers::base64")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub share_version: u8,
    #[serde(default)]
    pub commitment: Commitment,
    /// Index of the first share of the blob in the square, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl Blob {
    /// Creates a share version 0 blob.
    ///
    /// The commitment is left empty: the node derives it from the data on
    /// submission and returns it with every blob it serves.
    pub fn new(namespace: Namespace, data: Vec<u8>) -> Self {
        Self {
            namespace,
            data,
            share_version: 0,
            commitment: Commitment::default(),
            index: None,
        }
    }
}

/// Short binding to a blob's contents.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(#[serde(with = "serde_helpers::base64")] Vec<u8>);

impl Commitment {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64_STANDARD.encode(&self.0))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({self})")
    }
}

impl FromStr for Commitment {
    type Err = base64::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BASE64_STANDARD.decode(s).map(Self)
    }
}

/// Inclusion proof of a blob: one NMT proof per row the blob spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobProof(#[serde(with = "serde_helpers::null_default")] pub Vec<NmtProof>);

impl BlobProof {
    pub fn rows(&self) -> &[NmtProof] {
        &self.0
    }
}
