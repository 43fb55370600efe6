use async_trait::async_trait;
use openrpc_types::das::SamplingStats;

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;

/// Data availability sampling.
#[async_trait]
pub trait DasApi {
    async fn das_sampling_stats(&self, ctx: &Context) -> ClientResult<SamplingStats>;

    /// Blocks until the sampler has caught up with the network head.
    async fn das_wait_catch_up(&self, ctx: &Context) -> ClientResult<()>;
}

#[async_trait]
impl DasApi for Client {
    async fn das_sampling_stats(&self, ctx: &Context) -> ClientResult<SamplingStats> {
        self.call(ctx, Method::DasSamplingStats, ()).await
    }

    async fn das_wait_catch_up(&self, ctx: &Context) -> ClientResult<()> {
        self.call(ctx, Method::DasWaitCatchUp, ()).await
    }
}
