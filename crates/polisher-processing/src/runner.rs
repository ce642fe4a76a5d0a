//! Bounded execution of separation tools.
//!
//! [`run_tool`] runs one external command with a timeout and a cancellation
//! token; the child process is killed when either fires. [`SeparationRunner`]
//! adds the process-wide concurrency limit shared by request-time separation and
//! the background queue.

use crate::separator::{AudioSourceSeparator, SeparationReport, SeparationRequest, SeparatorError};
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Run `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit status is reported as [`SeparatorError::ExternalToolFailure`]
/// carrying the captured stderr.
#[tracing::instrument(skip(args, cancel))]
pub async fn run_tool(
    tool: &'static str,
    program: &str,
    args: &[String],
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Output, SeparatorError> {
    let start = Instant::now();
    tracing::info!(program = %program, args = ?args, "Starting external tool");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SeparatorError::Spawn { tool, source })?;

    // Dropping the wait future drops the child, which kills it.
    let output = tokio::select! {
        result = tokio::time::timeout(timeout, child.wait_with_output()) => match result {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs_f64(),
                    "External tool timed out, killing it"
                );
                return Err(SeparatorError::TimedOut { tool, timeout });
            }
        },
        _ = cancel.cancelled() => {
            tracing::warn!("External tool cancelled, killing it");
            return Err(SeparatorError::Cancelled { tool });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(
            status = ?output.status.code(),
            stderr = %stderr,
            duration_ms = start.elapsed().as_millis(),
            "External tool failed"
        );
        return Err(SeparatorError::ExternalToolFailure {
            tool,
            status: output.status.code(),
            stderr,
        });
    }

    tracing::info!(
        duration_ms = start.elapsed().as_millis(),
        "External tool finished"
    );

    Ok(output)
}

/// A separator behind a semaphore: at most `max_concurrent` separations run at once.
#[derive(Clone)]
pub struct SeparationRunner {
    separator: Arc<dyn AudioSourceSeparator>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl SeparationRunner {
    pub fn new(separator: Arc<dyn AudioSourceSeparator>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            separator,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn separator_name(&self) -> &'static str {
        self.separator.name()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits currently free
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot, giving up when `cancel` fires.
    pub async fn acquire(
        &self,
        cancel: &CancellationToken,
    ) -> Result<OwnedSemaphorePermit, SeparatorError> {
        let tool = self.separator.name();
        tokio::select! {
            permit = self.semaphore.clone().acquire_owned() => {
                permit.map_err(|_| SeparatorError::Cancelled { tool })
            }
            _ = cancel.cancelled() => Err(SeparatorError::Cancelled { tool }),
        }
    }

    /// Run a separation in a slot that was already acquired.
    pub async fn run_with_permit(
        &self,
        permit: OwnedSemaphorePermit,
        request: SeparationRequest,
        cancel: CancellationToken,
    ) -> Result<SeparationReport, SeparatorError> {
        let _permit = permit;
        self.separator.separate(request, cancel).await
    }

    pub async fn run(
        &self,
        request: SeparationRequest,
        cancel: CancellationToken,
    ) -> Result<SeparationReport, SeparatorError> {
        let permit = self.acquire(&cancel).await?;
        self.run_with_permit(permit, request, cancel).await
    }
}
