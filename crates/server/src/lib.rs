//! Receipt service - HTTP endpoints and wiring for receipt generation

pub mod api;
pub mod config;
pub mod error;
pub mod state;
