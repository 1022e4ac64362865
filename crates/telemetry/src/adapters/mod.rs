//! Adapters (secondary ports) for the telemetry binary.
//!
//! Each sub-module implements one of the hexagonal port traits defined in
//! the `domain` crate. Adapters are intentionally isolated from simulator
//! and server logic; swapping one never touches the other crates.

pub mod log_notifier;
pub mod mailjet_notifier;
pub mod sqlite_store;
