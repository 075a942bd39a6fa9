//! Discord webhook notifications for new posts.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::constants::{
    EMBED_COLOR, EMBED_DESCRIPTION, EMBED_FOOTER_ICON_URL, EMBED_FOOTER_TEXT, EMBED_TITLE_PREFIX,
    MESSAGE_CONTENT,
};
use crate::extractor::Post;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("DISCORD_WEBHOOK_URL is not set")]
    MissingWebhookUrl,
    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
}

/// Webhook message body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookMessage {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

impl WebhookMessage {
    /// Announcement message for a newly detected post.
    #[must_use]
    pub fn for_post(post: &Post) -> Self {
        Self {
            content: MESSAGE_CONTENT.to_string(),
            embeds: vec![Embed {
                title: format!("{EMBED_TITLE_PREFIX}{}", post.title),
                description: EMBED_DESCRIPTION.to_string(),
                url: post.link.clone(),
                color: EMBED_COLOR,
                footer: EmbedFooter {
                    text: EMBED_FOOTER_TEXT.to_string(),
                    icon_url: EMBED_FOOTER_ICON_URL.to_string(),
                },
            }],
        }
    }
}

/// Sink for new-post notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce `post`.
    async fn notify(&self, post: &Post) -> Result<(), NotifyError>;
}

/// Posts announcements to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    #[must_use]
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, post: &Post) -> Result<(), NotifyError> {
        let webhook_url = self
            .webhook_url
            .as_deref()
            .ok_or(NotifyError::MissingWebhookUrl)?;

        let message = WebhookMessage::for_post(post);
        debug!(post_id = post.id, "Sending webhook message");

        self.client
            .post(webhook_url)
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_post() -> Post {
        Post {
            id: 105,
            title: "Test Notice".to_string(),
            link: "https://www.gachon.ac.kr/kor/3104/view.do?id=1".to_string(),
        }
    }

    #[test]
    fn test_message_payload_shape() {
        let value = serde_json::to_value(WebhookMessage::for_post(&sample_post())).unwrap();

        assert_eq!(
            value,
            json!({
                "content": "@here 가천대학교에 새로운 학사공지가 올라왔어요!",
                "embeds": [{
                    "title": "📄 Test Notice",
                    "description": "자세한 내용은 링크를 클릭해 확인하세요.",
                    "url": "https://www.gachon.ac.kr/kor/3104/view.do?id=1",
                    "color": 15_258_703,
                    "footer": {
                        "text": "가천대 학사공지 알리미 봇",
                        "icon_url": "https://www.gachon.ac.kr/images/kor/intro/img_visual_symbol.jpg"
                    }
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_missing_webhook_url() {
        let notifier = DiscordNotifier::new(Client::new(), None);

        let err = notifier.notify(&sample_post()).await.unwrap_err();
        assert!(matches!(err, NotifyError::MissingWebhookUrl));
    }
}
