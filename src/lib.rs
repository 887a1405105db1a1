//! # kvwire
//!
//! A minimal synchronous client for RESP-speaking key-value servers:
//! - Binary-safe array-of-bulk-strings command encoding
//! - Full reply decoding (status, error, integer, bulk, nested arrays)
//! - Typed results: protocol-level failure is an error, command-level
//!   failure is `false` or `None`
//! - JSON documents stored as plain string values
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Caller                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  auth / set / get / ttl / get_json ...
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Client                                │
//! │         (Command → encode, Reply → typed result)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Codec     │          │ Connection  │
//!   │ (protocol)  │◄────────►│   (TCP)     │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, Result};
pub use config::Config;
pub use client::{Client, SharedClient};
pub use network::Connection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
