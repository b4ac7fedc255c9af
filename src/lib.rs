//! pavi-offline - offline caching agent for the PAVI FAST app
//!
//! Precaches the application shell at install, routes every intercepted
//! request through cache-first, stale-while-revalidate or network-only
//! handling, and evicts partitions left by earlier versions at activation.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod journal;
pub mod lifecycle;
pub mod net;
pub mod routing;
pub mod strategy;
pub mod ui;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{PaviError, PaviResult};
pub use worker::OfflineWorker;
