//! Job board REST API: signed identity tokens plus per-route authorization guards.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
