use crate::{
    domain::{ChatId, MessageId},
    formatting::{convert_markdown_to_html, escape_html},
};

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
}

impl IncomingUpdate {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Command(c) => c.chat_id,
            Self::Text(t) => t.chat_id,
        }
    }

    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::Command(c) => c.message_id,
            Self::Text(t) => t.message_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub username: Option<String>,
    /// Lowercased, without the leading `/` or `@botname`.
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub username: Option<String>,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}

/// The single text answer to one user turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Markdown,
        }
    }

    /// Render for Telegram HTML parse mode.
    pub fn to_html(&self) -> String {
        match self.format {
            TextFormat::Plain => escape_html(&self.text),
            TextFormat::Markdown => convert_markdown_to_html(&self.text),
        }
    }
}
