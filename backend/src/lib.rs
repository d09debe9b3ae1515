//! IT asset desk: inventory, role-gated JSON surface and expiry notices.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
