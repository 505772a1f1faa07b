//! DroneScout upstream clients
//!
//! Handles all communication with the drone-fleet cloud API and the weather
//! provider. Responses are decoded into `scout_core` models.

pub mod client;
pub mod weather;

pub use client::{FleetClient, DEFAULT_FLEET_API_BASE};
pub use weather::{WeatherClient, DEFAULT_WEATHER_API_BASE};
