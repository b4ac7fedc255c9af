//! CLI command implementations

pub mod activate;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod install;

pub use activate::execute as activate;
pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use install::execute as install;
