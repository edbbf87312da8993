//! Core module - configuration, state and server
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared service handles
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup / serve errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
