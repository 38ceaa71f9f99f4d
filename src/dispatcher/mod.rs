//! Batch request dispatcher (decomposed into focused submodules)
//!
//! A batch call runs in three stages:
//! - [`validation`] rejects the whole batch on the first malformed request
//! - [`scheduler`] fans the validated job out to an [`HttpExecutor`] with bounded concurrency
//! - [`aggregator`] puts the completion-ordered results back into input order

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{BatchJob, BatchResult};

/// Result reassembly
pub mod aggregator;
/// HTTP executor trait and reqwest implementation
pub mod executor;
/// Bounded concurrent fan-out
pub mod scheduler;
/// Request schema validation
pub mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;
#[cfg(test)]
mod tests;

pub use executor::{HttpExecutor, ReqwestExecutor};

/// Sends batches of requests through a shared executor
///
/// Cheap to share behind an `Arc`; the executor's connection pool is reused across
/// batches and across the tasks of one batch.
pub struct Dispatcher {
    config: Config,
    executor: Arc<dyn HttpExecutor>,
}

impl Dispatcher {
    /// Create a dispatcher that sends requests with [`ReqwestExecutor`]
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let executor = ReqwestExecutor::new(&config.dispatch)?;
        Ok(Self {
            config,
            executor: Arc::new(executor),
        })
    }

    /// Create a dispatcher around any executor
    ///
    /// Timeouts and the content type are applied by the executor; the dispatcher
    /// itself only uses the concurrency limit. The config is still validated so a
    /// dispatcher never carries settings [`new`](Self::new) would reject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_executor(config: Config, executor: Arc<dyn HttpExecutor>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, executor })
    }

    /// The configuration this dispatcher was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate, send, and collect a batch of untyped request mappings
    ///
    /// Each element must be an object with a non-empty string `url` and a string
    /// `body` (which may be empty). The returned outcomes have the same length and
    /// order as `requests`; a failed request is reported in its own slot without
    /// affecting the others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] before sending anything if any element is
    /// malformed, and [`Error::InternalConsistency`] if results could not be matched
    /// back to their requests.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use batch_api::{Config, Dispatcher};
    /// use serde_json::json;
    ///
    /// # async fn example() -> batch_api::Result<()> {
    /// let dispatcher = Dispatcher::new(Config::default())?;
    /// let outcomes = dispatcher
    ///     .batch_send_api_requests(&[
    ///         json!({"url": "http://localhost:3000", "body": "{\"jobs\":[]}"}),
    ///         json!({"url": "http://localhost:3000", "body": ""}),
    ///     ])
    ///     .await?;
    /// assert_eq!(outcomes.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn batch_send_api_requests(&self, requests: &[Value]) -> Result<BatchResult> {
        let job = validation::validate(requests).inspect_err(|e| {
            tracing::warn!(error = %e, "rejecting malformed batch");
        })?;
        self.send_batch(job).await
    }

    /// Send an already validated batch
    pub async fn send_batch(&self, job: BatchJob) -> Result<BatchResult> {
        if job.is_empty() {
            return Ok(Vec::new());
        }

        let expected_length = job.len();
        let results = scheduler::dispatch(
            job,
            Arc::clone(&self.executor),
            self.config.dispatch.effective_concurrency(),
        )
        .await;

        aggregator::aggregate(results, expected_length).map_err(|e| {
            tracing::error!(error = %e, "batch results inconsistent");
            Error::InternalConsistency(e)
        })
    }

    /// Blocking variant of [`batch_send_api_requests`](Self::batch_send_api_requests)
    ///
    /// Drives the batch on a dedicated single-threaded runtime, for callers that are
    /// not async themselves (e.g. scripting-language bindings). Validation still
    /// happens before the runtime is built.
    ///
    /// # Errors
    ///
    /// Besides the errors of the async variant, returns [`Error::Config`] when
    /// called from within an async runtime, where blocking on a nested runtime
    /// is not allowed.
    pub fn batch_send_api_requests_blocking(&self, requests: &[Value]) -> Result<BatchResult> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::Config {
                message: "blocking dispatch cannot run inside an async runtime; \
                          use batch_send_api_requests instead"
                    .to_string(),
                key: None,
            });
        }

        let job = validation::validate(requests)?;
        if job.is_empty() {
            return Ok(Vec::new());
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.send_batch(job))
    }
}

/// One-shot helper: build a [`Dispatcher`] from `config` and send `requests`
///
/// An empty batch returns immediately without building an HTTP client.
pub async fn batch_send_api_requests(config: Config, requests: &[Value]) -> Result<BatchResult> {
    let job = validation::validate(requests)?;
    if job.is_empty() {
        return Ok(Vec::new());
    }
    Dispatcher::new(config)?.send_batch(job).await
}
