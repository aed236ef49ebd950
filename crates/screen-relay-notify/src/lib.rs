//! Outbound registration notifications.
//!
//! When an agent registers, the operator is told about it through a
//! [`Notifier`]. Notifications are strictly best-effort: the server
//! dispatches them on a detached task and a failure never affects the
//! registration response.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Per-request timeout for the notification endpoint, so an unreachable
/// endpoint cannot hold a task open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Notification error.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// Sink for session registration notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a newly registered session.
    ///
    /// The notice carries the session id and the shared viewer password so
    /// the operator can open the session directly.
    ///
    /// # Errors
    /// Returns [`NotifyError`] if the notice could not be delivered.
    async fn notify_registered(
        &self,
        session_id: &str,
        password: &str,
    ) -> Result<(), NotifyError>;
}

/// Notifier that drops every notice.
///
/// Used when no notification credentials are configured, and by tests.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify_registered(
        &self,
        session_id: &str,
        _password: &str,
    ) -> Result<(), NotifyError> {
        tracing::debug!(session_id, "notifications not configured, dropping notice");
        Ok(())
    }
}

/// Telegram Bot API notifier.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat.
    ///
    /// # Errors
    /// Returns [`NotifyError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_registered(
        &self,
        session_id: &str,
        password: &str,
    ) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": registration_text(session_id, password),
            }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(response.status()))
        }
    }
}

fn registration_text(session_id: &str, password: &str) -> String {
    format!("New session: {session_id}\nPassword: {password}")
}
