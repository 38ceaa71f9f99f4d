//! Bounded fan-out of a [`BatchJob`] onto an [`HttpExecutor`].

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{TaskError, TaskErrorKind};
use crate::types::{BatchJob, Outcome, TaskResult};

use super::executor::HttpExecutor;

/// Execute every request of `job`, at most `concurrency_limit` at a time.
///
/// Each request runs in its own spawned task so that a panicking executor only
/// fails its own slot. Results come back in completion order, each tagged with the
/// index the request had in the job. Returns once every request has finished.
pub async fn dispatch(
    job: BatchJob,
    executor: Arc<dyn HttpExecutor>,
    concurrency_limit: usize,
) -> Vec<TaskResult> {
    let total = job.len();
    let concurrency = concurrency_limit.max(1).min(total.max(1));

    tracing::debug!(total, concurrency, "dispatching batch");

    let results: Vec<TaskResult> = stream::iter(job.into_indexed())
        .map(|(index, request)| {
            let executor = Arc::clone(&executor);
            async move {
                let url = request.url().to_string();
                let handle = tokio::spawn(async move { executor.execute(&request).await });

                let outcome = match handle.await {
                    Ok(Ok(response)) => {
                        tracing::debug!(index, url = %url, status = response.http_status_code, "request completed");
                        Outcome::Success(response)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(index, url = %url, error = %e, "request failed");
                        Outcome::Failure(e)
                    }
                    Err(join_error) => {
                        tracing::error!(index, url = %url, error = %join_error, "request task aborted");
                        Outcome::Failure(TaskError::new(
                            TaskErrorKind::Panicked,
                            format!("request task aborted: {}", join_error),
                        ))
                    }
                };

                TaskResult { index, outcome }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let failed = results.iter().filter(|r| !r.outcome.is_success()).count();
    tracing::info!(total, failed, "batch dispatch finished");

    results
}
