//! Telegram update handlers.
//!
//! Each message is converted into a core `IncomingUpdate`, answered by the
//! `ImeiService` and replied to in the same chat.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use imb_core::{
    domain::{ChatId, MessageId},
    messaging::types::IncomingUpdate,
};

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let update = to_update(&msg);

    if let Err(e) = state
        .service
        .respond(&update, state.messenger.as_ref())
        .await
    {
        tracing::warn!(chat_id = msg.chat.id.0, error = %e, "failed to deliver reply");
    }

    Ok(())
}

fn to_update(msg: &Message) -> IncomingUpdate {
    let sender = Sender {
        chat_id: ChatId(msg.chat.id.0),
        message_id: Some(MessageId(msg.id.0)),
        username: msg
            .from()
            .and_then(|u| u.username.clone())
            .or_else(|| msg.chat.username().map(str::to_string)),
    };

    // Non-text messages are checked as empty text and get the format hint.
    let text = msg.text().or_else(|| msg.caption()).unwrap_or("");
    if text.starts_with('/') {
        return commands::command_update(sender, text);
    }
    text::text_update(sender, text)
}

/// Chat/user metadata shared by every update kind.
pub(crate) struct Sender {
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub username: Option<String>,
}
