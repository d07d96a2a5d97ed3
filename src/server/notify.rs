//! Slack webhook notifications for logged feeds.
//!
//! Delivery is best-effort and at-most-once: the feed write has already
//! committed by the time a message goes out, and callers log failures
//! instead of surfacing them.

use serde::Serialize;

/// Errors that can occur when delivering a notification.
#[derive(Debug)]
pub enum NotifyError {
    /// Error performing the HTTP request.
    TransportError(String),
    /// Endpoint answered with a non-success status.
    StatusError(u16),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::TransportError(e) => write!(f, "Failed to send notification: {}", e),
            NotifyError::StatusError(status) => {
                write!(f, "Notification endpoint returned status {}", status)
            }
        }
    }
}

impl std::error::Error for NotifyError {}

/// Sends feed notifications to a Slack-compatible webhook.
///
/// When no webhook URL is configured every call is a no-op.
#[derive(Clone)]
pub struct SlackNotifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct Payload {
    blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
struct Block {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<Mrkdwn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<Mrkdwn>>,
}

#[derive(Debug, Serialize)]
struct Mrkdwn {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl Mrkdwn {
    fn new(text: String) -> Self {
        Self {
            kind: "mrkdwn",
            text,
        }
    }
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    /// Posts a message with optional label/value detail fields.
    ///
    /// # Arguments
    /// * `message` - Headline text, mrkdwn formatted
    /// * `details` - Ordered label/value pairs rendered as section fields
    pub async fn notify(
        &self,
        message: &str,
        details: &[(String, String)],
    ) -> Result<(), NotifyError> {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => return Ok(()),
        };

        let payload = build_payload(message, details);

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::TransportError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::StatusError(response.status().as_u16()));
        }

        Ok(())
    }
}

fn build_payload(message: &str, details: &[(String, String)]) -> Payload {
    let mut blocks = vec![Block {
        kind: "section",
        text: Some(Mrkdwn::new(message.to_string())),
        fields: None,
    }];

    if !details.is_empty() {
        let fields = details
            .iter()
            .map(|(label, value)| Mrkdwn::new(format!("*{}*\n{}", label, value)))
            .collect();
        blocks.push(Block {
            kind: "section",
            text: None,
            fields: Some(fields),
        });
    }

    Payload { blocks }
}

impl std::fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("configured", &self.webhook_url.is_some())
            .finish()
    }
}
