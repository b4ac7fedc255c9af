//! Terminal output for the operator commands
//!
//! Colors and progress bars in an interactive terminal, bracketed plain
//! markers (`[OK]`, `[WARN]`) everywhere else.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{key_value, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint};
pub use progress::InstallProgress;
