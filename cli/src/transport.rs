//! Executes the requests built by `gradient_core` over the network.

use std::time::Duration;

use gradient_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

/// One blocking HTTP round-trip.
///
/// Non-success statuses are returned as responses, not errors; only a
/// failed round-trip is an `Err`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a ureq agent with a global timeout.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                for (key, value) in request.query() {
                    builder = builder.query(key, value);
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = match request.method {
                    HttpMethod::Post => self.agent.post(&request.url),
                    _ => self.agent.put(&request.url),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                match request.body() {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| {
            debug!(error = %e, "transport failure");
            ApiError::Transport(format!("{} {}: {e}", request.method, request.url))
        })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(format!("reading response from {}: {e}", request.url)))?;
        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(status, body))
    }
}
