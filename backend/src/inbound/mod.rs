//! Inbound adapters that translate external triggers into domain service
//! calls: the JSON HTTP surface and the daily notification timer.

pub mod http;
pub mod scheduler;
