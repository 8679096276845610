//! Hash computation and object identity for ugit.
//!
//! This crate provides the `ObjectId` type, streaming and one-shot SHA-1
//! computation, and hex encoding/decoding used throughout the rest of the
//! workspace.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use hasher::Hasher;
pub use oid::ObjectId;
