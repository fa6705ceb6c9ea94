//! Cancellable Generation Tasks
//!
//! This module runs a generation in the background and lets the caller
//! cancel it. Cancellation wins the race against a completing request, so a
//! caller that navigated away never receives a stale result.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::{GenerationRequest, GenerationResponse, TextProvider};

/// Handle to a running generation
pub struct GenerationTask {
    token: CancellationToken,
    handle: JoinHandle<Result<GenerationResponse>>,
}

impl GenerationTask {
    /// Start a generation in the background
    #[must_use]
    pub fn spawn(provider: Arc<dyn TextProvider>, request: GenerationRequest) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                // Cancellation takes priority when both are ready.
                biased;
                () = task_token.cancelled() => {
                    debug!(provider = provider.name(), "generation cancelled");
                    Err(Error::Cancelled)
                }
                result = provider.generate(request) => result,
            }
        });

        Self { token, handle }
    }

    /// Cancel the generation
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancel was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the generation to finish
    pub async fn await_result(self) -> Result<GenerationResponse> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(Error::Cancelled),
            Err(err) => Err(Error::Api(format!("generation task failed: {err}"))),
        }
    }
}
