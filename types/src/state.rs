use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use bech32::Bech32;
use bech32::primitives::decode::CheckedHrpstring;
use openrpc_util::serde_helpers;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! bech32_address {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate_bech32(s)?;
                Ok(Self(s.to_owned()))
            }
        }
    };
}

bech32_address! {
    /// Any bech32 address known to the node.
    Address
}

bech32_address! {
    /// Account address (`celestia1...`).
    AccAddress
}

bech32_address! {
    /// Validator operator address (`celestiavaloper1...`).
    ValAddress
}

impl From<AccAddress> for Address {
    fn from(value: AccAddress) -> Self {
        Self(value.0)
    }
}

impl From<ValAddress> for Address {
    fn from(value: ValAddress) -> Self {
        Self(value.0)
    }
}

/// Checks the bech32 checksum. The human readable part is not checked,
/// the node rejects addresses of other chains.
fn validate_bech32(s: &str) -> Result<(), TypeError> {
    let checked = CheckedHrpstring::new::<Bech32>(s)
        .map_err(|e| TypeError::InvalidAddress(format!("{s}: {e}")))?;
    if checked.byte_iter().next().is_none() {
        return Err(TypeError::InvalidAddress(format!("{s}: empty data part")));
    }
    Ok(())
}

/// Non-negative cosmos integer, a decimal string on the wire.
///
/// The node allows up to 256 bits, this type holds 128. Larger values
/// (far above any token supply) fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "serde_helpers::string")] pub u128);

impl Amount {
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>().map(Self).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => TypeError::InvalidAmount(format!("{s} exceeds 128 bits")),
            _ => TypeError::InvalidAmount(s.to_owned()),
        })
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub denom: String,
    pub amount: Amount,
}

/// Signed, encoded transaction bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tx(#[serde(with = "serde_helpers::base64")] pub Vec<u8>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxResponse {
    pub height: i64,
    pub txhash: String,
    pub codespace: String,
    pub code: u32,
    pub data: String,
    pub raw_log: String,
    #[serde(default, with = "serde_helpers::null_default")]
    pub logs: Vec<AbciMessageLog>,
    pub info: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub timestamp: String,
    #[serde(default, with = "serde_helpers::null_default")]
    pub events: Vec<Event>,
}

impl TxResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbciMessageLog {
    pub msg_index: u32,
    pub log: String,
    #[serde(default, with = "serde_helpers::null_default")]
    pub events: Vec<StringEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, with = "serde_helpers::null_default")]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, with = "serde_helpers::null_default")]
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
    pub index: bool,
}

// === Staking queries ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDelegationResponse {
    pub delegation_response: DelegationResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationResponse {
    pub delegation: Delegation,
    pub balance: Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    /// Decimal string, shares are fractional.
    pub shares: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUnbondingDelegationResponse {
    pub unbond: UnbondingDelegation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    #[serde(default, with = "serde_helpers::null_default")]
    pub entries: Vec<UnbondingDelegationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegationEntry {
    pub creation_height: i64,
    pub completion_time: String,
    pub initial_balance: Amount,
    pub balance: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRedelegationsResponse {
    #[serde(default, with = "serde_helpers::null_default")]
    pub redelegation_responses: Vec<RedelegationResponse>,
    pub pagination: Option<PageResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationResponse {
    pub redelegation: Redelegation,
    #[serde(default, with = "serde_helpers::null_default")]
    pub entries: Vec<RedelegationEntryResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redelegation {
    pub delegator_address: AccAddress,
    pub validator_src_address: ValAddress,
    pub validator_dst_address: ValAddress,
    #[serde(default, with = "serde_helpers::null_default")]
    pub entries: Vec<RedelegationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntry {
    pub creation_height: i64,
    pub completion_time: String,
    pub initial_balance: Amount,
    pub shares_dst: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntryResponse {
    pub redelegation_entry: RedelegationEntry,
    pub balance: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageResponse {
    #[serde(with = "serde_helpers::option_base64")]
    pub next_key: Option<Vec<u8>>,
    pub total: u64,
}
