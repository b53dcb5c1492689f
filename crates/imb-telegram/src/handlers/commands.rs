use imb_core::messaging::types::{Command, IncomingUpdate};

use super::Sender;

pub(crate) fn command_update(sender: Sender, text: &str) -> IncomingUpdate {
    let name = parse_command(text);
    IncomingUpdate::Command(Command {
        chat_id: sender.chat_id,
        message_id: sender.message_id,
        username: sender.username,
        name,
    })
}

/// Command name, lowercased. Arguments are ignored.
fn parse_command(text: &str) -> String {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.trim().split(char::is_whitespace).next().unwrap_or("");

    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}
