//! Values exchanged with a data-availability node over JSON-RPC.
//!
//! Byte strings travel as base64, tendermint hashes as upper-case hex and
//! cosmos integers as decimal strings, matching what the node emits.

pub use self::error::TypeError;

pub mod blob;
pub mod das;
pub mod fraud;
pub mod header;
pub mod node;
pub mod p2p;
pub mod share;
pub mod state;

mod error;
