use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Progress of a single sampling worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub job_type: String,
    pub current: u64,
    pub from: u64,
    pub to: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot of the node's data availability sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingStats {
    pub head_of_sampled_chain: u64,
    pub head_of_catchup: u64,
    pub network_head_height: u64,
    /// Heights which failed sampling, with the number of attempts.
    #[serde(default)]
    pub failed: Option<BTreeMap<u64, u64>>,
    #[serde(default)]
    pub workers: Option<Vec<WorkerStats>>,
    pub concurrency: u64,
    pub catch_up_done: bool,
    pub is_running: bool,
}

impl SamplingStats {
    /// Number of headers between the sampled head and the network head.
    pub fn lag(&self) -> u64 {
        self.network_head_height
            .saturating_sub(self.head_of_sampled_chain)
    }
}
