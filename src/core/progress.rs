// src/core/progress.rs

//! Completion counter for a run.
//!
//! The counter has two states. It counts host completions until the count
//! reaches the total, switches to `Done` exactly once, and refuses any further
//! advance afterwards.

use crate::core::error::ProgressError;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Counting { done: usize, total: usize },
    Done { total: usize },
}

pub struct Progress {
    state: ProgressState,
    bar: ProgressBar,
}

impl Progress {
    /// A progress tracker rendered as a terminal bar.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message("scanning");
        Self::with_bar(total, bar)
    }

    /// A tracker that draws nothing.
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(total, ProgressBar::hidden())
    }

    fn with_bar(total: usize, bar: ProgressBar) -> Self {
        let mut progress = Self { state: ProgressState::Counting { done: 0, total }, bar };
        if total == 0 {
            progress.finish(0);
        }
        progress
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, ProgressState::Done { .. })
    }

    /// Handle used to print lines above the bar without tearing it.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Records one completed host.
    pub fn advance(&mut self) -> Result<ProgressState, ProgressError> {
        match self.state {
            ProgressState::Done { total } => {
                warn!(total, "Progress advanced after completion.");
                Err(ProgressError::AlreadyDone { total })
            }
            ProgressState::Counting { done, total } => {
                let done = done + 1;
                self.bar.inc(1);
                if done >= total {
                    self.finish(total);
                } else {
                    self.state = ProgressState::Counting { done, total };
                }
                Ok(self.state)
            }
        }
    }

    fn finish(&mut self, total: usize) {
        self.state = ProgressState::Done { total };
        self.bar.finish_with_message("all scans done");
        info!(total, "All scans done.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_done_exactly_once() {
        let mut progress = Progress::hidden(3);
        assert_eq!(progress.advance(), Ok(ProgressState::Counting { done: 1, total: 3 }));
        assert_eq!(progress.advance(), Ok(ProgressState::Counting { done: 2, total: 3 }));
        assert_eq!(progress.advance(), Ok(ProgressState::Done { total: 3 }));
        assert!(progress.is_done());
    }

    #[test]
    fn advancing_after_done_is_rejected() {
        let mut progress = Progress::hidden(1);
        progress.advance().unwrap();
        assert_eq!(progress.advance(), Err(ProgressError::AlreadyDone { total: 1 }));
        assert_eq!(progress.state(), ProgressState::Done { total: 1 });
    }

    #[test]
    fn empty_run_starts_done() {
        let mut progress = Progress::hidden(0);
        assert!(progress.is_done());
        assert!(progress.advance().is_err());
    }
}
