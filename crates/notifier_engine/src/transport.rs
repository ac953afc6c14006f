use notifier_logging::notifier_debug;
use reqwest::Url;
use serde_json::json;

use crate::{DispatchError, DispatchFailure, HttpSettings};

/// Outbound message relay. Only pass/fail matters to the caller.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DispatchError>;
}

/// Posts `{"username": subject, "content": body}` to a chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    url: String,
    settings: HttpSettings,
}

impl WebhookTransport {
    pub fn new(url: impl Into<String>, settings: HttpSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, DispatchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| DispatchError::new(DispatchFailure::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for WebhookTransport {
    async fn send(&self, subject: &str, body: &str) -> Result<(), DispatchError> {
        let url = Url::parse(&self.url)
            .map_err(|err| DispatchError::new(DispatchFailure::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let payload = json!({
            "username": subject,
            "content": body,
        });
        let response = client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::new(
                DispatchFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        notifier_debug!("Webhook accepted message ({})", status);
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        return DispatchError::new(DispatchFailure::Timeout, err.to_string());
    }
    DispatchError::new(DispatchFailure::Network, err.to_string())
}
