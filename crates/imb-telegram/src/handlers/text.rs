use imb_core::messaging::types::{IncomingUpdate, TextMessage};

use super::Sender;

pub(crate) fn text_update(sender: Sender, text: &str) -> IncomingUpdate {
    IncomingUpdate::Text(TextMessage {
        chat_id: sender.chat_id,
        message_id: sender.message_id,
        username: sender.username,
        text: text.to_string(),
    })
}
