// DataLoader - app/mod.rs
//
// Application layer: session wiring and table edits.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod edit;
pub mod session;
