//! Worker lifecycle
//!
//! `install` populates the core partition for the running version;
//! `activate` evicts partitions left by earlier versions and takes over
//! every open client.

mod clients;
mod controller;
mod state;

pub use clients::{Client, ClientRegistry};
pub use controller::{ActivateReport, InstallReport, Lifecycle};
pub use state::WorkerState;
