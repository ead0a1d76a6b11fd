// DataLoader - core/mod.rs
//
// Core pipeline: severity model, output strategies, the Logger and its
// subscribers, the notification Subject, format loaders and their factory.
// Must NOT depend on: app or platform.

pub mod factory;
pub mod formats;
pub mod loader;
pub mod logger;
pub mod model;
pub mod notify;
pub mod output;
pub mod report;
pub mod severity;
pub mod subscriber;
