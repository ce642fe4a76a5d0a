use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::runner::SeparationRunner;
use crate::separator::{SeparationRequest, SeparatorError};

#[derive(Debug, Clone)]
pub struct SeparationJob {
    pub id: Uuid,
    pub request: SeparationRequest,
}

impl SeparationJob {
    pub fn new(request: SeparationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
        }
    }
}

/// Background separation queue: a bounded channel feeding a worker pool that
/// shares the runner's concurrency limit.
#[derive(Clone)]
pub struct SeparationQueue {
    tx: mpsc::Sender<SeparationJob>,
}

impl SeparationQueue {
    /// Create a queue and spawn its worker pool
    ///
    /// # Arguments
    /// * `runner` - Concurrency-limited separator
    /// * `queue_size` - Channel bound; `submit()` fails once this many jobs are waiting
    /// * `shutdown` - Stops the pool and cancels running separations when fired
    pub fn new(runner: SeparationRunner, queue_size: usize, shutdown: CancellationToken) -> Self {
        let queue_size = queue_size.max(1);
        let (tx, rx) = mpsc::channel(queue_size);

        let max_concurrent = runner.max_concurrent();
        tokio::spawn(async move {
            Self::worker_pool(rx, runner, shutdown).await;
        });

        tracing::info!(
            queue_size = queue_size,
            max_concurrent = max_concurrent,
            "Separation queue initialized with bounded channel"
        );

        Self { tx }
    }

    #[tracing::instrument(skip(self, job), fields(job.id = %job.id))]
    pub fn submit(&self, job: SeparationJob) -> Result<(), SeparatorError> {
        tracing::info!(
            input = %job.request.input_file.display(),
            "Enqueuing separation job"
        );
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                tracing::warn!("Separation queue is full, rejecting job");
                SeparatorError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => SeparatorError::QueueClosed,
        })
    }

    /// Jobs that can still be enqueued before `submit()` starts failing
    pub fn remaining_capacity(&self) -> usize {
        self.tx.capacity()
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<SeparationJob>,
        runner: SeparationRunner,
        shutdown: CancellationToken,
    ) {
        loop {
            let job = tokio::select! {
                job = rx.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
                _ = shutdown.cancelled() => break,
            };

            let permit = match runner.acquire(&shutdown).await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let runner = runner.clone();
            let cancel = shutdown.child_token();
            tokio::spawn(async move {
                Self::process_job(job, runner, permit, cancel).await;
            });
        }

        tracing::info!("Separation queue worker pool stopped");
    }

    #[tracing::instrument(skip_all, fields(job.id = %job.id, job.status = tracing::field::Empty))]
    async fn process_job(
        job: SeparationJob,
        runner: SeparationRunner,
        permit: tokio::sync::OwnedSemaphorePermit,
        cancel: CancellationToken,
    ) {
        let start = Instant::now();
        tracing::info!(separator = runner.separator_name(), "Starting separation job");

        match runner.run_with_permit(permit, job.request, cancel).await {
            Ok(report) => {
                tracing::Span::current().record("job.status", "success");
                tracing::info!(
                    stems = ?report.stems,
                    output_dir = %report.output_dir.display(),
                    duration_ms = start.elapsed().as_millis(),
                    "Separation job completed successfully"
                );
            }
            Err(e) => {
                tracing::Span::current().record("job.status", "failed");
                tracing::error!(
                    error = %e,
                    duration_ms = start.elapsed().as_millis(),
                    "Separation job failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separator::{AudioSourceSeparator, SeparationReport};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    /// Reports every request it receives on a channel.
    struct RecordingSeparator {
        seen: mpsc::UnboundedSender<SeparationRequest>,
    }

    #[async_trait]
    impl AudioSourceSeparator for RecordingSeparator {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn separate(
            &self,
            request: SeparationRequest,
            _cancel: CancellationToken,
        ) -> Result<SeparationReport, SeparatorError> {
            let _ = self.seen.send(request.clone());
            Ok(SeparationReport {
                tool: "recording",
                output_dir: request.output_dir,
                stems: Vec::new(),
            })
        }
    }

    fn recording_runner() -> (SeparationRunner, mpsc::UnboundedReceiver<SeparationRequest>) {
        let (seen, rx) = mpsc::unbounded_channel();
        let runner = SeparationRunner::new(Arc::new(RecordingSeparator { seen }), 1);
        (runner, rx)
    }

    #[tokio::test]
    async fn test_submitted_job_is_processed() {
        let (runner, mut seen) = recording_runner();
        let queue = SeparationQueue::new(runner, 4, CancellationToken::new());

        queue
            .submit(SeparationJob::new(SeparationRequest::new("demos/song.wav", "demos/separated")))
            .unwrap();

        let request = tokio::time::timeout(Duration::from_secs(5), seen.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.input_file, std::path::PathBuf::from("demos/song.wav"));
    }

    #[tokio::test]
    async fn test_full_queue_rejects_jobs() {
        let (runner, _seen) = recording_runner();
        let queue = SeparationQueue::new(runner, 1, CancellationToken::new());

        // The worker cannot drain the channel before this test task yields.
        let results: Vec<_> = (0..3)
            .map(|i| {
                queue.submit(SeparationJob::new(SeparationRequest::new(
                    format!("demos/{i}.wav"),
                    "demos/separated",
                )))
            })
            .collect();

        assert!(results[0].is_ok());
        assert!(results
            .iter()
            .any(|result| matches!(result, Err(SeparatorError::QueueFull))));
    }

    #[tokio::test]
    async fn test_shutdown_closes_queue() {
        let (runner, _seen) = recording_runner();
        let shutdown = CancellationToken::new();
        let queue = SeparationQueue::new(runner, 4, shutdown.clone());

        shutdown.cancel();
        let mut result = Ok(());
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            result = queue.submit(SeparationJob::new(SeparationRequest::new("a.wav", "out")));
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(SeparatorError::QueueClosed)));
    }
}
