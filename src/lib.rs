//! Facebook Messenger webhook server.
//!
//! Terminates webhook callbacks from the Messenger platform: answers the
//! one-time verification handshake, accepts `entry[].messaging[]` event
//! payloads, and exposes a page-connection stub plus a health check.
//!
//! # Handshake
//!
//! When a webhook URL is registered, the platform issues a single GET with a
//! shared secret and a challenge value:
//!
//! ```text
//! GET /webhook?hub.verify_token=my_verify_token&hub.challenge=1158201444
//! ──────────────────────────────────────────────────────────────────────
//! 200 OK
//! 1158201444
//! ```
//!
//! Echoing the challenge proves control of the endpoint. All subsequent
//! event deliveries arrive as POSTs to the same path.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`events`]: Messenger payload types and traversal
//! - [`api`]: HTTP routes and handlers
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServerError};
