//! JSON file backend for the leads store.
//!
//! The whole collection is one pretty-printed JSON array on disk. An
//! in-memory copy serves reads; every mutation rewrites the file before it is
//! committed to memory.

mod document;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;

#[cfg(test)]
mod tests;
