// DataLoader - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: directories and walkdir crates, core severity types.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
