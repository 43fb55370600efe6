use serde::{Deserialize, Serialize};

/// Fee and gas settings of a blob submission.
///
/// A negative fee and a zero gas limit ask the node to estimate the value
/// itself, which is what [`SubmitOptions::default`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitOptions {
    fee: i64,
    gas_limit: u64,
}

impl SubmitOptions {
    pub const DEFAULT_FEE: i64 = -1;
    pub const DEFAULT_GAS_LIMIT: u64 = 0;

    pub const fn new(fee: i64, gas_limit: u64) -> Self {
        Self { fee, gas_limit }
    }

    #[must_use]
    pub const fn with_fee(mut self, fee: u64) -> Self {
        self.fee = if fee > i64::MAX as u64 {
            i64::MAX
        } else {
            fee as i64
        };
        self
    }

    #[must_use]
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Explicit fee, `None` if the node picks one.
    pub const fn fee(&self) -> Option<u64> {
        if self.fee < 0 {
            None
        } else {
            Some(self.fee as u64)
        }
    }

    /// Explicit gas limit, `None` if the node estimates it.
    pub const fn gas_limit(&self) -> Option<u64> {
        if self.gas_limit == Self::DEFAULT_GAS_LIMIT {
            None
        } else {
            Some(self.gas_limit)
        }
    }

    pub const fn raw_fee(&self) -> i64 {
        self.fee
    }
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FEE, Self::DEFAULT_GAS_LIMIT)
    }
}
