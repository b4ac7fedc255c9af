//! Interactive vs CI detection

use std::io::IsTerminal;

#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
        }
    }

    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Whether to use colors and progress bars
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive() -> bool {
        if !std::io::stdout().is_terminal() {
            return false;
        }

        let ci_vars = [
            "CI",
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "CIRCLECI",
            "JENKINS_URL",
            "BUILDKITE",
        ];
        !ci_vars.iter().any(|var| std::env::var(var).is_ok())
    }
}
