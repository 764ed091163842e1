//! Crawl state definitions
//!
//! A crawl moves `Idle → Running → {Completed, Interrupted}` and never leaves
//! a terminal state.

use crate::TrawlError;
use std::fmt;

/// Represents the lifecycle state of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Crawl has been created but not started
    Idle,

    /// Crawl is pulling targets from the frontier
    Running,

    /// Queue drained or page budget exhausted
    Completed,

    /// Stopped early by a cancellation request; results are partial but valid
    Interrupted,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }

    /// Returns true if the transition to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Interrupted)
        )
    }

    /// Performs a checked transition
    pub fn transition(self, next: CrawlState) -> Result<CrawlState, TrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lower-case name used in log lines and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
