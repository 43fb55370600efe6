use async_trait::async_trait;
use openrpc_types::fraud::{Proof, ProofType};

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;
use crate::subscription::Subscription;

/// Fraud proofs gossiped in the network.
#[async_trait]
pub trait FraudApi {
    /// Streams new proofs of `proof_type` as the node receives them.
    async fn fraud_subscribe(
        &self,
        ctx: &Context,
        proof_type: &ProofType,
    ) -> ClientResult<Subscription<Proof>>;

    /// Proofs of `proof_type` the node has already stored.
    async fn fraud_get(&self, ctx: &Context, proof_type: &ProofType) -> ClientResult<Vec<Proof>>;
}

#[async_trait]
impl FraudApi for Client {
    async fn fraud_subscribe(
        &self,
        ctx: &Context,
        proof_type: &ProofType,
    ) -> ClientResult<Subscription<Proof>> {
        self.subscribe(ctx, Method::FraudSubscribe, (proof_type,))
            .await
    }

    async fn fraud_get(&self, ctx: &Context, proof_type: &ProofType) -> ClientResult<Vec<Proof>> {
        self.call::<_, Option<Vec<Proof>>>(ctx, Method::FraudGet, (proof_type,))
            .await
            .map(Option::unwrap_or_default)
    }
}
