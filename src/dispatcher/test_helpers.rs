//! Fake executors shared by the dispatcher unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{TaskError, TaskErrorKind};
use crate::types::{BatchJob, RequestDescriptor, Response};

use super::executor::HttpExecutor;

/// Build a job of `n` requests; request `i` has url `http://test.invalid/{i}` and body `body-{i}`.
pub(crate) fn job_of(n: usize) -> BatchJob {
    (0..n)
        .map(|i| {
            RequestDescriptor::new(format!("http://test.invalid/{i}"), format!("body-{i}"))
                .unwrap_or_else(|| unreachable!("url is never empty"))
        })
        .collect()
}

/// Recover the request index from a url built by [`job_of`].
pub(crate) fn index_of(request: &RequestDescriptor) -> usize {
    request
        .url()
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn echo(request: &RequestDescriptor) -> Response {
    Response {
        http_status_code: 200,
        body: request.body().to_string(),
        headers: HashMap::new(),
    }
}

/// Echoes the request body after a delay, recording call count and peak concurrency.
pub(crate) struct SlowEchoExecutor {
    delay: Duration,
    reversed: bool,
    in_flight: AtomicUsize,
    pub(crate) peak: AtomicUsize,
    pub(crate) calls: AtomicUsize,
}

impl SlowEchoExecutor {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            reversed: false,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Later requests finish first: request `i` sleeps `delay * (32 - i)`.
    pub(crate) fn reversed(delay: Duration) -> Self {
        Self {
            reversed: true,
            ..Self::new(delay)
        }
    }
}

#[async_trait::async_trait]
impl HttpExecutor for SlowEchoExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Response, TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = if self.reversed {
            self.delay * (32 - index_of(request).min(32)) as u32
        } else {
            self.delay
        };
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(echo(request))
    }
}

/// Fails the requests at the given indexes with a connect error, echoes the rest.
pub(crate) struct FailingExecutor {
    failing: HashSet<usize>,
}

impl FailingExecutor {
    pub(crate) fn failing_at(indexes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing: indexes.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl HttpExecutor for FailingExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Response, TaskError> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        if self.failing.contains(&index_of(request)) {
            return Err(TaskError::new(
                TaskErrorKind::Connect,
                format!("connection refused: {}", request.url()),
            ));
        }
        Ok(echo(request))
    }
}

/// Panics on one index, echoes the rest.
pub(crate) struct PanickingExecutor {
    index: usize,
}

impl PanickingExecutor {
    pub(crate) fn panicking_at(index: usize) -> Self {
        Self { index }
    }
}

#[async_trait::async_trait]
impl HttpExecutor for PanickingExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Response, TaskError> {
        if index_of(request) == self.index {
            panic!("executor blew up on {}", request.url());
        }
        Ok(echo(request))
    }
}
