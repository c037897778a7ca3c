//! Shared constants for the distance ring overlay and its hosts.

pub mod coordinate_system;
pub mod render_settings;
pub mod ring_defaults;
