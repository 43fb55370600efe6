use std::fmt;
use std::str::FromStr;

use openrpc_util::serde_helpers;
use serde::{Deserialize, Serialize};

/// Kind of a fraud proof, e.g. [`ProofType::BAD_ENCODING`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofType(String);

impl ProofType {
    /// Proof that a block was erasure-coded incorrectly.
    pub const BAD_ENCODING: &'static str = "badencoding";

    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn bad_encoding() -> Self {
        Self::new(Self::BAD_ENCODING)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProofType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Opaque fraud proof as produced by the node.
///
/// Carries the proof kind next to its encoded body so that it can be
/// passed around and re-submitted without being understood. Verification
/// is done by whoever knows how to decode `data` for `proof_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof {
    proof_type: ProofType,
    #[serde(with = "serde_helpers::base64")]
    data: Vec<u8>,
}

impl Proof {
    pub fn new(proof_type: ProofType, data: Vec<u8>) -> Self {
        Self { proof_type, data }
    }

    pub fn proof_type(&self) -> &ProofType {
        &self.proof_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_survives_the_wire() {
        let proof = Proof::new(ProofType::bad_encoding(), vec![0, 1, 2, 254, 255]);

        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(json, r#"{"proof_type":"badencoding","data":"AAEC/v8="}"#);

        let decoded: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, proof);
        assert_eq!(decoded.proof_type().as_str(), ProofType::BAD_ENCODING);
    }

    #[test]
    fn proofs_of_different_types_differ() {
        let a = Proof::new(ProofType::bad_encoding(), vec![1]);
        let b = Proof::new(ProofType::new("other"), vec![1]);
        assert_ne!(a, b);
    }
}
