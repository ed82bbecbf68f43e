//! Crible Watcher: library crate for the per-host log tail service.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `crible-e2e-tests`) can build the router and state directly.

pub mod config;
pub mod error;
pub mod registration;
pub mod routes;
pub mod state;
