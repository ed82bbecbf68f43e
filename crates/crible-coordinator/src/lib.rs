//! Crible Coordinator: library crate for the fleet-wide log query server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `crible-e2e-tests`) can access `AppState`, `build_router`, and the
//! fan-out `Aggregator`.

pub mod config;
pub mod error;
pub mod fanout;
pub mod mock;
pub mod registry;
pub mod routes;
pub mod state;
