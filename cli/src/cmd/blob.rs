use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::blob::{Blob, BlobProof, Commitment};
use openrpc_types::share::Namespace;

use crate::BaseArgs;
use crate::util::{load_json, print_json, read_bytes};

#[derive(Subcommand)]
pub enum CmdBlob {
    /// Submit a blob and print the height it was included at.
    Submit {
        /// Hex-encoded namespace or v0 namespace id.
        namespace: Namespace,
        /// Blob data, or `@path` to read it from a file.
        data: String,
        /// Fee in utia. Estimated by the node when omitted.
        #[clap(long)]
        fee: Option<u64>,
        /// Gas limit. Estimated by the node when omitted.
        #[clap(long)]
        gas_limit: Option<u64>,
    },
    /// Get a blob by its commitment.
    Get {
        height: u64,
        namespace: Namespace,
        /// Base64-encoded commitment.
        commitment: Commitment,
    },
    /// Get all blobs under the given namespaces.
    GetAll {
        height: u64,
        #[clap(required = true)]
        namespaces: Vec<Namespace>,
    },
    /// Get the inclusion proof of a blob.
    GetProof {
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
    },
    /// Check a blob inclusion proof, as printed by `get-proof`.
    Included {
        height: u64,
        namespace: Namespace,
        commitment: Commitment,
        /// Path to the proof JSON.
        #[clap(long)]
        proof: PathBuf,
    },
}

impl CmdBlob {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::Submit {
                    namespace,
                    data,
                    fee,
                    gas_limit,
                } => {
                    let blob = Blob::new(namespace, read_bytes(&data)?);
                    let mut options = SubmitOptions::default();
                    if let Some(fee) = fee {
                        options = options.with_fee(fee);
                    }
                    if let Some(gas_limit) = gas_limit {
                        options = options.with_gas_limit(gas_limit);
                    }

                    let height = client
                        .blob_submit(&ctx, std::slice::from_ref(&blob), &options)
                        .await?;
                    print_json(serde_json::json!({ "height": height }))
                }
                Self::Get {
                    height,
                    namespace,
                    commitment,
                } => print_json(client.blob_get(&ctx, height, &namespace, &commitment).await?),
                Self::GetAll { height, namespaces } => {
                    print_json(client.blob_get_all(&ctx, height, &namespaces).await?)
                }
                Self::GetProof {
                    height,
                    namespace,
                    commitment,
                } => {
                    let proof = client
                        .blob_get_proof(&ctx, height, &namespace, &commitment)
                        .await?;
                    print_json(proof)
                }
                Self::Included {
                    height,
                    namespace,
                    commitment,
                    proof,
                } => {
                    let proof = load_json::<BlobProof>(&proof)?;
                    let included = client
                        .blob_included(&ctx, height, &namespace, &proof, &commitment)
                        .await?;
                    print_json(serde_json::json!({ "included": included }))
                }
            }
        })
    }
}
