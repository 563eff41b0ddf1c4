//! maa-assets: pipeline image maintenance and plugin registration
//!
//! Keeps the `template` image references of MAA pipeline documents in sync
//! with the image tree, moves unreferenced images aside for review, and
//! exposes the custom action/recognizer registry handed to the agent host.

pub mod assets;
pub mod backup;
pub mod config;
pub mod error;
pub mod logging;
pub mod maintenance;
pub mod pipeline;
pub mod plugin;
pub mod quarantine;
pub mod reconcile;
pub mod tooling;
pub mod types;

pub use error::AssetError;
pub use maintenance::{MaintenanceReport, MaintenanceRun, RunMode};
