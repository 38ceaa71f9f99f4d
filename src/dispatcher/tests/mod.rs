// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::test_helpers::{FailingExecutor, SlowEchoExecutor};
use super::*;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Duration;


fn dispatcher_with(executor: Arc<dyn HttpExecutor>, concurrency_limit: usize) -> Dispatcher {
    let mut config = Config::default();
    config.dispatch.concurrency_limit = concurrency_limit;
    Dispatcher::with_executor(config, executor).unwrap()
}

fn requests(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"url": format!("http://test.invalid/{i}"), "body": format!("body-{i}")}))
        .collect()
}
