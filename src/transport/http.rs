//! reqwest-backed transport

use super::{Endpoint, Method, Transport, TransportError};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Transport talking JSON over HTTP to the chat backend
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::connection(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

fn classify_request_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(format!("Request timed out: {e}"))
    } else if e.is_decode() || e.is_body() {
        TransportError::decode(format!("Failed to read response body: {e}"))
    } else {
        TransportError::connection(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(
        &self,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = self.url(endpoint);
        let mut request = match endpoint.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::status(
                status.as_u16(),
                format!("HTTP {status}: {text}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_request_error(&e))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
