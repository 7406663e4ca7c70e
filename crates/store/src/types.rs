//! Row types and query parameter bundles for the message store.

use serde::Serialize;

/// A contact distilled from the chats table (individual JIDs only).
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub jid: String,
    pub name: Option<String>,
    pub phone: String,
}

/// One stored message, joined with its chat's display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    /// ISO-8601 text, as the bridge writes it. Kept as text: SQLite compares
    /// it correctly and nothing here does date arithmetic.
    pub timestamp: String,
    pub sender: String,
    pub chat_jid: String,
    pub chat_name: Option<String>,
    pub content: String,
    pub is_from_me: bool,
    pub media_type: Option<String>,
}

impl MessageRecord {
    /// Human-readable one-liner, the shape agents see in message listings.
    #[must_use]
    pub fn format_line(&self) -> String {
        let mut out = format!("[{}]", self.timestamp);
        if let Some(chat) = &self.chat_name {
            out.push_str(&format!(" Chat: {chat}"));
        }
        let sender = if self.is_from_me { "Me" } else { &self.sender };
        out.push_str(&format!(" From: {sender}"));
        if let Some(media) = &self.media_type {
            out.push_str(&format!(" [{media} - ID: {} - Chat: {}]", self.id, self.chat_jid));
        }
        out.push_str(&format!(": {}", self.content));
        out
    }
}

/// One chat, optionally carrying its latest message.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatRecord {
    pub jid: String,
    pub name: Option<String>,
    pub last_active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_is_from_me: Option<bool>,
}

impl ChatRecord {
    /// Group chats use the `@g.us` JID suffix; everything else is direct.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.jid.ends_with("@g.us")
    }
}

/// A message with its surrounding conversation.
#[derive(Debug, Clone, Serialize)]
pub struct MessageContext {
    pub message: MessageRecord,
    pub before: Vec<MessageRecord>,
    pub after: Vec<MessageRecord>,
}

/// Filters for message listings. All filters are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    /// Only messages strictly after this ISO-8601 timestamp.
    pub after: Option<String>,
    /// Only messages strictly before this ISO-8601 timestamp.
    pub before: Option<String>,
    /// Exact sender match.
    pub sender: Option<String>,
    /// Restrict to one chat.
    pub chat_jid: Option<String>,
    /// Case-insensitive substring on message content.
    pub query: Option<String>,
    pub limit: u32,
    pub page: u32,
}

impl MessageQuery {
    #[must_use]
    pub fn limit_or_default(&self) -> u32 {
        if self.limit == 0 { 20 } else { self.limit }
    }
}

/// Chat listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatSort {
    #[default]
    LastActive,
    Name,
}

impl ChatSort {
    /// Lenient parse used at the tool boundary; unknown values fall back to
    /// recency ordering like the original server did.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => Self::Name,
            _ => Self::LastActive,
        }
    }
}

/// Filters for chat listings.
#[derive(Debug, Clone, Default)]
pub struct ChatQuery {
    /// Substring match on chat name or JID.
    pub query: Option<String>,
    pub limit: u32,
    pub page: u32,
    pub include_last_message: bool,
    pub sort_by: ChatSort,
}

impl ChatQuery {
    #[must_use]
    pub fn limit_or_default(&self) -> u32 {
        if self.limit == 0 { 20 } else { self.limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_from_me: bool, media_type: Option<&str>) -> MessageRecord {
        MessageRecord {
            id: "MSG1".into(),
            timestamp: "2024-03-01 12:30:00".into(),
            sender: "15551234567".into(),
            chat_jid: "15551234567@s.whatsapp.net".into(),
            chat_name: Some("Ada".into()),
            content: "see you at 5".into(),
            is_from_me,
            media_type: media_type.map(Into::into),
        }
    }

    #[test]
    fn format_line_names_sender_or_me() {
        let from_them = record(false, None).format_line();
        assert_eq!(
            from_them,
            "[2024-03-01 12:30:00] Chat: Ada From: 15551234567: see you at 5"
        );

        let from_me = record(true, None).format_line();
        assert!(from_me.contains("From: Me"));
    }

    #[test]
    fn format_line_flags_media_with_download_coordinates() {
        let line = record(false, Some("image")).format_line();
        assert!(line.contains("[image - ID: MSG1 - Chat: 15551234567@s.whatsapp.net]"));
    }

    #[test]
    fn group_detection_is_by_jid_suffix() {
        let mut chat = ChatRecord {
            jid: "1203630000000000@g.us".into(),
            name: None,
            last_active: None,
            last_message: None,
            last_sender: None,
            last_is_from_me: None,
        };
        assert!(chat.is_group());
        chat.jid = "15551234567@s.whatsapp.net".into();
        assert!(!chat.is_group());
    }

    #[test]
    fn chat_sort_parse_falls_back_to_recency() {
        assert_eq!(ChatSort::parse("name"), ChatSort::Name);
        assert_eq!(ChatSort::parse("last_active"), ChatSort::LastActive);
        assert_eq!(ChatSort::parse("bogus"), ChatSort::LastActive);
    }
}
