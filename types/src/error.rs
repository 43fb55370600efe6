#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid namespace size: expected {expected} bytes, got {actual}")]
    InvalidNamespaceSize { expected: usize, actual: usize },
    #[error("unsupported namespace version {0}")]
    UnsupportedNamespaceVersion(u8),
    #[error("v0 namespace id must start with {0} zero bytes")]
    InvalidNamespaceV0Prefix(usize),
    #[error("invalid share size: expected {expected} bytes, got {actual}")]
    InvalidShareSize { expected: usize, actual: usize },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("unknown {kind} value {value}")]
    UnknownEnumValue { kind: &'static str, value: u8 },
    #[error("unknown permission `{0}`")]
    UnknownPermission(String),
}
