use crate::chat::{ChatBackend, ChatRequest};
use crate::event::{AppEvent, EventSink};
use serde_json::{json, Value};
use tokio::runtime::Handle;

pub const FALLBACK_REPLY: &str = "Sorry, AI could not be reached.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reads the assistant text from a completion response.
///
/// Two shapes are accepted, checked in order: `choices[0].message.content`
/// (OpenAI style) and `reply.content` (gateway style). Empty strings count as
/// missing. Anything else produces [`FALLBACK_REPLY`].
pub fn extract_reply(body: &Value) -> String {
    let primary = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str);
    let secondary = body.pointer("/reply/content").and_then(Value::as_str);

    primary
        .filter(|content| !content.is_empty())
        .or(secondary.filter(|content| !content.is_empty()))
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}

/// Posts conversations to the chat endpoint on the tokio runtime.
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
    runtime_handle: Handle,
    events: EventSink,
}

impl HttpChatBackend {
    pub fn new(endpoint: String, runtime_handle: Handle, events: EventSink) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            runtime_handle,
            events,
        }
    }

    async fn post(
        client: &reqwest::Client,
        endpoint: &str,
        request: &ChatRequest,
    ) -> Result<String, ChatError> {
        let response = client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(&json!({ "messages": request.messages }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("chat endpoint answered {status} for request {}", request.id);
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(extract_reply(&body))
    }
}

impl ChatBackend for HttpChatBackend {
    fn dispatch(&self, request: ChatRequest) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let events = self.events.clone();

        log::info!(
            "sending chat request {} with {} messages",
            request.id,
            request.messages.len()
        );
        self.runtime_handle.spawn(async move {
            let result = Self::post(&client, &endpoint, &request).await;
            if let Err(err) = &result {
                log::error!("chat request {} failed: {err}", request.id);
            }
            events.send(AppEvent::ChatCompleted {
                request_id: request.id,
                result,
            });
        });
    }
}
