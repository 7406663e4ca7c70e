//! Read-only access to the message store the bridge maintains.
//!
//! The bridge writes `messages.db` (SQLite) as traffic flows through its
//! session; gangway only ever reads it. The schema belongs to the bridge —
//! two tables, `chats(jid, name, last_message_time)` and `messages(id,
//! chat_jid, sender, content, timestamp, is_from_me, media_type)` — and this
//! crate holds the only SQL that touches them.

pub mod error;
pub mod store;
pub mod types;

pub use {
    error::{Error, Result},
    store::MessageStore,
    types::{ChatQuery, ChatRecord, ChatSort, Contact, MessageContext, MessageQuery, MessageRecord},
};
