//! Bot API client — long-polls `getUpdates` and sends replies.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::error::TransportError;
use crate::flows::Reply;
use crate::telegram::types::Update;

/// Stream of raw updates from one bot token.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Update> + Send>>;

/// Envelope every Bot API response comes wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

/// Thin client over the Telegram Bot API.
pub struct TelegramApi {
    token: SecretString,
    client: reqwest::Client,
}

impl TelegramApi {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{method}",
            self.token.expose_secret()
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "https://api.telegram.org/file/bot{}/{file_path}",
            self.token.expose_secret()
        )
    }

    /// Spawns the long-poll loop and returns the update stream.
    ///
    /// Poll failures are logged and retried after a short pause; the stream
    /// only ends when the receiver side is dropped.
    pub fn update_stream(self: &Arc<Self>) -> UpdateStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let api = Arc::clone(self);

        tokio::spawn(async move {
            let url = api.api_url("getUpdates");
            let mut offset: i64 = 0;

            tracing::info!("Bot API long-poll started");

            loop {
                let body = json!({
                    "offset": offset,
                    "timeout": 30,
                    "allowed_updates": ["message", "callback_query", "my_chat_member"],
                });

                let resp = match api.client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("getUpdates poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: ApiResponse<Vec<Update>> = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("getUpdates parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if !data.ok {
                    tracing::warn!(
                        code = data.error_code,
                        description = data.description.as_deref().unwrap_or(""),
                        "getUpdates rejected"
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }

                for update in data.result.unwrap_or_default() {
                    offset = update.update_id + 1;
                    if tx.send(update).is_err() {
                        tracing::info!("update receiver dropped, stopping poll loop");
                        return;
                    }
                }
            }
        });

        let stream =
            futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|u| (u, rx)) });
        Box::pin(stream)
    }

    /// `getMe` round-trip, used as the startup health probe.
    pub async fn health_check(&self) -> Result<(), TransportError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::Api {
                code: resp.status().as_u16() as i64,
                description: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn call(&self, method: &str, body: &serde_json::Value) -> Result<(), TransportError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(());
        }

        let code = resp.status().as_u16() as i64;
        let description = resp.text().await.unwrap_or_default();
        Err(TransportError::Api { code, description })
    }
}

/// Sends messages back to chats. The bots depend on this rather than on
/// the concrete client so dispatch can be tested without a network.
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Sends one reply, attaching its keyboard markup if any.
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError>;

    /// Sends bare text with no markup.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;

    /// Acknowledges a callback query so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;

    /// Strips the inline keyboard from a previously sent message.
    async fn clear_reply_markup(&self, chat_id: i64, message_id: i64)
        -> Result<(), TransportError>;
}

#[async_trait]
impl Outbox for TelegramApi {
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": reply.text,
        });
        if let Some(markup) = reply.keyboard.to_markup() {
            body["reply_markup"] = markup;
        }
        self.call("sendMessage", &body).await
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        self.call("sendMessage", &body).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        let body = json!({ "callback_query_id": callback_id });
        self.call("answerCallbackQuery", &body).await
    }

    async fn clear_reply_markup(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), TransportError> {
        let body = json!({ "chat_id": chat_id, "message_id": message_id });
        self.call("editMessageReplyMarkup", &body).await
    }
}

/// Fetches uploaded file content from the transport.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl FileFetcher for TelegramApi {
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>, TransportError> {
        let resp = self
            .client
            .get(self.api_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TransportError::Api {
                code: resp.status().as_u16() as i64,
                description: resp.text().await.unwrap_or_default(),
            });
        }

        let info: ApiResponse<FileInfo> = resp
            .json()
            .await
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;
        let file_path = info
            .result
            .and_then(|f| f.file_path)
            .ok_or_else(|| TransportError::NoFilePath {
                file_id: file_id.to_string(),
            })?;

        let download = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !download.status().is_success() {
            return Err(TransportError::Api {
                code: download.status().as_u16() as i64,
                description: format!("file download returned {}", download.status()),
            });
        }

        let bytes = download
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
