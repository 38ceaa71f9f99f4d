//! Mock servers and request builders shared by the integration tests

use std::time::Duration;

use batch_api::{Config, Dispatcher};
use serde_json::{Value, json};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Echoes the request body back with a fixed delay, tagging the response with the path
pub struct DelayedEcho {
    pub delay: Duration,
}

impl Respond for DelayedEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("X-Echo-Path", request.url.path())
            .set_body_bytes(request.body.clone())
            .set_delay(self.delay)
    }
}

/// Start a mock server that answers every POST under `/echo/` after `delay`
pub async fn start_echo_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/echo/\d+$"))
        .respond_with(DelayedEcho { delay })
        .mount(&server)
        .await;
    server
}

/// `n` descriptors aimed at `/echo/{i}` with body `{"job": i}`
pub fn echo_requests(server: &MockServer, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "url": format!("{}/echo/{}", server.uri(), i),
                "body": json!({"job": i}).to_string(),
            })
        })
        .collect()
}

/// Dispatcher with the reqwest executor and the given concurrency limit
pub fn dispatcher(concurrency_limit: usize) -> Dispatcher {
    let mut config = Config::default();
    config.dispatch.concurrency_limit = concurrency_limit;
    config.dispatch.request_timeout = Duration::from_secs(10);
    Dispatcher::new(config).unwrap_or_else(|e| panic!("failed to build dispatcher: {e}"))
}
