//! Content identity for the gitobj object store.
//!
//! This crate provides the `ObjectId` type, SHA-1 hash computation over the
//! canonical `"<type> <len>\0<payload>"` form, the hex codec, and the
//! two-level path sharding used to address loose objects.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::ObjectId;

/// Length of a raw SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;
/// Length of a hex-encoded SHA-1 digest.
pub const SHA1_HEX_LEN: usize = 40;
