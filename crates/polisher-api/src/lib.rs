//! Demo Polisher HTTP application
//!
//! Upload form, upload pipeline, stored-object serving route and the setup code
//! that wires storage, key-value store and separator together.

pub mod document;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
pub mod validation;
