use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    Result,
};

/// Cross-messenger delivery port.
///
/// The core hands over finished HTML; transport and session details stay in the adapter.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send `html`, optionally as a reply to `reply_to`.
    async fn send_html(
        &self,
        chat_id: ChatId,
        reply_to: Option<MessageId>,
        html: &str,
    ) -> Result<MessageRef>;
}
