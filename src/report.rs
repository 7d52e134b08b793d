// src/report.rs
// =============================================================================
// The two channels a run talks to its caller through:
// - progress: human readable lines ("Found Fido", "Downloading fido...")
// - errors: every per-item failure, which never stops the run
//
// Workers hold clones of one Reporter. The progress channel closes when the
// last clone is dropped, which is how the caller learns the run is over.
// =============================================================================

use crate::error::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Reporter {
    progress: Option<UnboundedSender<String>>,
    errors: UnboundedSender<Error>,
}

impl Reporter {
    pub fn new(progress: UnboundedSender<String>, errors: UnboundedSender<Error>) -> Self {
        Self {
            progress: Some(progress),
            errors,
        }
    }

    /// A reporter with no progress channel (foster mode)
    pub fn errors_only(errors: UnboundedSender<Error>) -> Self {
        Self {
            progress: None,
            errors,
        }
    }

    pub fn progress(&self, message: impl Into<String>) {
        let message = message.into();
        info!(progress = %message.trim());
        if let Some(progress) = &self.progress {
            // The caller stopped listening, nothing left to tell
            let _ = progress.send(message);
        }
    }

    pub fn error(&self, error: Error) {
        warn!(%error, "item failed");
        let _ = self.errors.send(error);
    }
}
