pub mod blob;
pub mod das;
pub mod fraud;
pub mod header;
pub mod node;
pub mod p2p;
pub mod share;
pub mod state;
