//! Core types and trait definitions for the leads store.
//!
//! Shared by the storage backend, the HTTP facade and the terminal client.
//! No HTTP or file-system code lives here.

// `LeadStore` spells out `Send` futures; impls use plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod lead;
pub mod query;
pub mod store;

pub use error::{Error, Result};
