//! HTTP client for the Cloudflare Zero Trust Gateway API.
//!
//! This crate provides [`GatewayClient`], which talks to the gateway list and
//! rule endpoints of one account and implements
//! [`GatewayStore`](gateway_core::GatewayStore).

mod client;
mod config;
mod store;
pub mod api;

pub use client::{GatewayClient, GatewayClientBuilder};
pub use config::*;
pub use gateway_core::{GatewayError, Result};
