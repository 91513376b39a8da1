//! Slack channel sender.
//!
//! Posts the formatted enquiry message to a configured incoming webhook.
//! Any non-2xx response or transport error becomes a failed
//! [`SendOutcome`]; nothing propagates past this boundary.

use async_trait::async_trait;

use super::{ChatSender, SendOutcome};

/// Chat sender backed by a Slack incoming webhook
pub struct SlackSender {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl SlackSender {
    /// Creates a new Slack sender. `webhook_url` is optional so that
    /// deployments without Slack configured degrade to a logged failure
    /// instead of refusing to start.
    pub fn new(webhook_url: Option<String>) -> Self {
        if webhook_url.is_none() {
            log::warn!("SLACK_ENQUIRIES_WEBHOOK not set, Slack notifications are disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl ChatSender for SlackSender {
    async fn send(&self, text: &str) -> SendOutcome {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                return SendOutcome::failure("Slack webhook URL not configured".to_string())
            }
        };

        match self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    SendOutcome::success()
                } else {
                    let error_body = response.text().await.unwrap_or_default();
                    let error_msg = match error_body.as_str() {
                        "invalid_token" => "Invalid Slack webhook URL".to_string(),
                        "channel_not_found" => "Slack channel not found".to_string(),
                        "channel_is_archived" => "Slack channel is archived".to_string(),
                        _ if error_body.is_empty() => {
                            format!("Slack API error: HTTP {}", status.as_u16())
                        }
                        _ => format!("Slack API error: {}", error_body),
                    };
                    SendOutcome::failure(error_msg)
                }
            }
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    "Request to Slack timed out".to_string()
                } else if e.is_connect() {
                    "Connection to Slack failed".to_string()
                } else {
                    format!("Slack request failed: {}", e)
                };
                SendOutcome::failure(error_msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_webhook_fails_without_network_io() {
        let sender = SlackSender::new(None);

        let outcome = sender.send("*New Enquiry Received*").await;

        assert!(!outcome.success);
        assert!(outcome
            .detail
            .as_deref()
            .unwrap_or_default()
            .contains("not configured"));
    }
}
