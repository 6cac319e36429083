use crate::output::Output;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Spinner shown while catalog requests are in flight. Only drawn for human
/// output on a terminal so JSON and piped output stay clean.
pub struct FetchSpinner {
    bar: Option<ProgressBar>,
}

impl FetchSpinner {
    pub fn start(output: &Output, message: impl Into<String>) -> Self {
        if !output.is_human() || output.is_quiet() || !is_interactive() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
