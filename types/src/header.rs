use std::fmt;
use std::str::FromStr;

use openrpc_util::serde_helpers;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Header or transaction hash, upper-case hex on the wire.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(#[serde(with = "serde_helpers::hex_upper")] Vec<u8>);

impl Hash {
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

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

impl FromStr for Hash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.trim_start_matches("0x"))
            .map(Self)
            .map_err(Into::into)
    }
}

/// A block header augmented with the data availability header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedHeader {
    pub header: RawHeader,
    pub commit: Commit,
    pub validator_set: ValidatorSet,
    pub dah: DataAvailabilityHeader,
}

impl ExtendedHeader {
    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn chain_id(&self) -> &str {
        &self.header.chain_id
    }

    /// Hash of this header, as committed to by its commit.
    pub fn hash(&self) -> &Hash {
        &self.commit.block_id.hash
    }

    pub fn last_header_hash(&self) -> &Hash {
        &self.header.last_block_id.hash
    }

    /// Width of the extended data square this header commits to.
    pub fn square_width(&self) -> usize {
        self.dah.row_roots.len()
    }

    /// Whether `next` directly follows this header.
    pub fn is_adjacent(&self, next: &ExtendedHeader) -> bool {
        self.height().checked_add(1) == Some(next.height()) && next.last_header_hash() == self.hash()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub version: ConsensusVersion,
    pub chain_id: String,
    #[serde(with = "serde_helpers::string")]
    pub height: u64,
    pub time: String,
    pub last_block_id: BlockId,
    #[serde(default)]
    pub last_commit_hash: Hash,
    #[serde(default)]
    pub data_hash: Hash,
    #[serde(default)]
    pub validators_hash: Hash,
    #[serde(default)]
    pub next_validators_hash: Hash,
    #[serde(default)]
    pub consensus_hash: Hash,
    #[serde(default)]
    pub app_hash: Hash,
    #[serde(default)]
    pub last_results_hash: Hash,
    #[serde(default)]
    pub evidence_hash: Hash,
    #[serde(default)]
    pub proposer_address: Hash,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusVersion {
    #[serde(with = "serde_helpers::string")]
    pub block: u64,
    #[serde(default, with = "serde_helpers::string")]
    pub app: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    #[serde(default)]
    pub hash: Hash,
    #[serde(default, rename = "parts")]
    pub part_set_header: PartSetHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    #[serde(default)]
    pub hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(with = "serde_helpers::string")]
    pub height: u64,
    pub round: i32,
    pub block_id: BlockId,
    #[serde(default, with = "serde_helpers::null_default")]
    pub signatures: Vec<CommitSig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSig {
    pub block_id_flag: u8,
    #[serde(default)]
    pub validator_address: Hash,
    pub timestamp: String,
    #[serde(default, with = "serde_helpers::option_base64")]
    pub signature: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    #[serde(default, with = "serde_helpers::null_default")]
    pub validators: Vec<Validator>,
    #[serde(default)]
    pub proposer: Option<Validator>,
}

impl ValidatorSet {
    pub fn total_voting_power(&self) -> i64 {
        self.validators.iter().map(|v| v.voting_power).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub address: Hash,
    pub pub_key: PubKey,
    #[serde(with = "serde_helpers::string")]
    pub voting_power: i64,
    #[serde(with = "serde_helpers::string")]
    pub proposer_priority: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(with = "serde_helpers::base64")]
    pub value: Vec<u8>,
}

/// Merkle roots over the rows and columns of the extended data square.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAvailabilityHeader {
    #[serde(with = "serde_helpers::base64_list")]
    pub row_roots: Vec<Vec<u8>>,
    #[serde(with = "serde_helpers::base64_list")]
    pub column_roots: Vec<Vec<u8>>,
}

/// Progress of the node's header synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub id: u64,
    pub height: u64,
    pub from_height: u64,
    pub to_height: u64,
    #[serde(default)]
    pub from_hash: Hash,
    #[serde(default)]
    pub to_hash: Hash,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncState {
    pub fn is_finished(&self) -> bool {
        self.to_height <= self.height
    }
}
