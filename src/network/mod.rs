//! Network Module
//!
//! TCP transport for the client.
//!
//! ## Model
//! - One socket per client, opened eagerly
//! - Synchronous: one request in flight at a time
//! - Timeouts are socket options, not protocol state

mod connection;

pub use connection::Connection;
