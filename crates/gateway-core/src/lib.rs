//! Core types and traits for the Cloudflare Zero Trust Gateway API.
//!
//! This crate provides the foundational types shared by the client and the
//! sync pipeline:
//!
//! - **Types**: Strongly-typed gateway lists, rules and request bodies
//! - **Errors**: Gateway API failures as [`GatewayError`]
//! - **Store**: The [`GatewayStore`] trait, the CRUD seam over remote state
//!
//! # Example
//!
//! ```rust,ignore
//! use gateway_core::{GatewayStore, Result};
//!
//! async fn total_entries(store: &impl GatewayStore) -> Result<u64> {
//!     let lists = store.list_lists().await?;
//!     Ok(lists.iter().map(|l| l.count).sum())
//! }
//! ```

mod error;
mod store;
pub mod types;

pub use error::{GatewayError, Result};
pub use store::GatewayStore;
pub use types::*;
