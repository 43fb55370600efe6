use async_trait::async_trait;
use openrpc_types::blob::{Blob, BlobProof, Commitment};
use openrpc_types::share::Namespace;

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;
use crate::options::SubmitOptions;

#[async_trait]
pub trait BlobApi {
    /// Submits `blobs` in a single pay-for-blob transaction and returns the
    /// height they were included at.
    async fn blob_submit(
        &self,
        ctx: &Context,
        blobs: &[Blob],
        options: &SubmitOptions,
    ) -> ClientResult<u64>;

    async fn blob_get(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> ClientResult<Blob>;

    /// All blobs under `namespaces` at `height`.
    async fn blob_get_all(
        &self,
        ctx: &Context,
        height: u64,
        namespaces: &[Namespace],
    ) -> ClientResult<Vec<Blob>>;

    async fn blob_get_proof(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> ClientResult<BlobProof>;

    /// Checks `proof` of the blob with `commitment` against the block at
    /// `height`. A proof that does not match is `Ok(false)`, errors are
    /// reserved for failures to check it.
    async fn blob_included(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        proof: &BlobProof,
        commitment: &Commitment,
    ) -> ClientResult<bool>;
}

#[async_trait]
impl BlobApi for Client {
    async fn blob_submit(
        &self,
        ctx: &Context,
        blobs: &[Blob],
        options: &SubmitOptions,
    ) -> ClientResult<u64> {
        self.call(ctx, Method::BlobSubmit, (blobs, options)).await
    }

    async fn blob_get(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> ClientResult<Blob> {
        self.call(ctx, Method::BlobGet, (height, namespace, commitment))
            .await
    }

    async fn blob_get_all(
        &self,
        ctx: &Context,
        height: u64,
        namespaces: &[Namespace],
    ) -> ClientResult<Vec<Blob>> {
        self.call::<_, Option<Vec<Blob>>>(ctx, Method::BlobGetAll, (height, namespaces))
            .await
            .map(Option::unwrap_or_default)
    }

    async fn blob_get_proof(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        commitment: &Commitment,
    ) -> ClientResult<BlobProof> {
        self.call(ctx, Method::BlobGetProof, (height, namespace, commitment))
            .await
    }

    async fn blob_included(
        &self,
        ctx: &Context,
        height: u64,
        namespace: &Namespace,
        proof: &BlobProof,
        commitment: &Commitment,
    ) -> ClientResult<bool> {
        self.call(
            ctx,
            Method::BlobIncluded,
            (height, namespace, proof, commitment),
        )
        .await
    }
}
