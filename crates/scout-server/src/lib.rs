//! Shared library surface for the DroneScout edge server and its tests.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
