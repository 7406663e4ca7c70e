//! SQL for the bridge's store. Everything here is read-only.

use std::path::Path;

use {
    sqlx::{
        QueryBuilder, Sqlite, SqlitePool,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    },
    tracing::debug,
};

use crate::{
    error::{Context as _, Error, Result},
    types::{
        ChatQuery, ChatRecord, ChatSort, Contact, MessageContext, MessageQuery, MessageRecord,
    },
};

/// Message columns as [`MessageRecord`] expects them, joined to the chat name.
const MESSAGE_COLUMNS: &str = "m.id AS id, m.timestamp AS timestamp, m.sender AS sender, \
     m.chat_jid AS chat_jid, c.name AS chat_name, m.content AS content, \
     m.is_from_me AS is_from_me, m.media_type AS media_type";

/// Read-only handle on the bridge's SQLite message store.
#[derive(Debug)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    /// Open the store read-only.
    ///
    /// The bridge creates the file on first run; a missing file is reported
    /// as [`Error::Missing`] so the caller can surface "bridge not started"
    /// instead of a bare I/O error.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Missing {
                path: path.display().to_string(),
            });
        }

        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open message store at {}", path.display()))?;

        debug!(path = %path.display(), "opened message store read-only");
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Test seams and tooling only; production code
    /// goes through [`open`](Self::open).
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Contacts whose name or JID matches `query`, individual chats only.
    pub async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let pattern = format!("%{query}%");
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT DISTINCT jid, name FROM chats \
             WHERE (name LIKE ? OR jid LIKE ?) AND jid LIKE '%@s.whatsapp.net' \
             ORDER BY name LIMIT 20",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(jid, name)| {
                let phone = jid.split('@').next().unwrap_or("").to_string();
                Contact { jid, name, phone }
            })
            .collect())
    }

    /// Messages matching the query, newest first, paginated.
    pub async fn list_messages(&self, q: &MessageQuery) -> Result<Vec<MessageRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN chats c ON m.chat_jid = c.jid"
        ));

        let mut first = true;
        if let Some(after) = &q.after {
            and_where(&mut qb, &mut first);
            qb.push("m.timestamp > ").push_bind(after.clone());
        }
        if let Some(before) = &q.before {
            and_where(&mut qb, &mut first);
            qb.push("m.timestamp < ").push_bind(before.clone());
        }
        if let Some(sender) = &q.sender {
            and_where(&mut qb, &mut first);
            qb.push("m.sender = ").push_bind(sender.clone());
        }
        if let Some(chat_jid) = &q.chat_jid {
            and_where(&mut qb, &mut first);
            qb.push("m.chat_jid = ").push_bind(chat_jid.clone());
        }
        if let Some(text) = &q.query {
            and_where(&mut qb, &mut first);
            qb.push("LOWER(m.content) LIKE LOWER(")
                .push_bind(format!("%{text}%"))
                .push(")");
        }

        let limit = q.limit_or_default();
        qb.push(" ORDER BY m.timestamp DESC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::from(q.page * limit));

        Ok(qb.build_query_as().fetch_all(&self.pool).await?)
    }

    /// Chats matching the query, optionally joined with their latest message.
    pub async fn list_chats(&self, q: &ChatQuery) -> Result<Vec<ChatRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(chat_select(q.include_last_message));

        if let Some(text) = &q.query {
            let pattern = format!("%{text}%");
            qb.push(" WHERE (c.name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.jid LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        match q.sort_by {
            ChatSort::Name => qb.push(" ORDER BY c.name"),
            ChatSort::LastActive => qb.push(" ORDER BY c.last_message_time DESC"),
        };

        let limit = q.limit_or_default();
        qb.push(" LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::from(q.page * limit));

        Ok(qb.build_query_as().fetch_all(&self.pool).await?)
    }

    /// One chat by exact JID.
    pub async fn get_chat(
        &self,
        chat_jid: &str,
        include_last_message: bool,
    ) -> Result<Option<ChatRecord>> {
        let sql = format!("{} WHERE c.jid = ?", chat_select(include_last_message));
        Ok(sqlx::query_as(&sql)
            .bind(chat_jid)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Chats a contact participates in, most recently active first.
    pub async fn chats_for_contact(
        &self,
        jid: &str,
        limit: u32,
        page: u32,
    ) -> Result<Vec<ChatRecord>> {
        // The messages table stores the bare phone in `sender`; accept either
        // a full JID or a bare number from the caller.
        let phone = jid.split('@').next().unwrap_or(jid);
        let limit = if limit == 0 { 20 } else { limit };

        Ok(sqlx::query_as(
            "SELECT DISTINCT c.jid AS jid, c.name AS name, c.last_message_time AS last_active, \
                    NULL AS last_message, NULL AS last_sender, NULL AS last_is_from_me \
             FROM chats c JOIN messages m ON m.chat_jid = c.jid \
             WHERE m.sender = ? OR c.jid = ? \
             ORDER BY last_active DESC LIMIT ? OFFSET ?",
        )
        .bind(phone)
        .bind(jid)
        .bind(i64::from(limit))
        .bind(i64::from(page * limit))
        .fetch_all(&self.pool)
        .await?)
    }

    /// Most recent message to or from the contact.
    pub async fn last_interaction(&self, jid: &str) -> Result<Option<MessageRecord>> {
        let phone = jid.split('@').next().unwrap_or(jid);
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN chats c ON m.chat_jid = c.jid \
             WHERE m.chat_jid = ? OR m.sender = ? \
             ORDER BY m.timestamp DESC LIMIT 1"
        );
        Ok(sqlx::query_as(&sql)
            .bind(jid)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// A message plus the conversation around it, both halves in
    /// chronological order. `None` when the id is unknown.
    pub async fn message_context(
        &self,
        message_id: &str,
        before: u32,
        after: u32,
    ) -> Result<Option<MessageContext>> {
        let target_sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN chats c ON m.chat_jid = c.jid \
             WHERE m.id = ?"
        );
        let target: Option<MessageRecord> = sqlx::query_as(&target_sql)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(target) = target else {
            return Ok(None);
        };

        let before_sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN chats c ON m.chat_jid = c.jid \
             WHERE m.chat_jid = ? AND m.timestamp < ? \
             ORDER BY m.timestamp DESC LIMIT ?"
        );
        let mut before_rows: Vec<MessageRecord> = sqlx::query_as(&before_sql)
            .bind(&target.chat_jid)
            .bind(&target.timestamp)
            .bind(i64::from(before))
            .fetch_all(&self.pool)
            .await?;
        before_rows.reverse();

        let after_sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m JOIN chats c ON m.chat_jid = c.jid \
             WHERE m.chat_jid = ? AND m.timestamp > ? \
             ORDER BY m.timestamp ASC LIMIT ?"
        );
        let after_rows: Vec<MessageRecord> = sqlx::query_as(&after_sql)
            .bind(&target.chat_jid)
            .bind(&target.timestamp)
            .bind(i64::from(after))
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(MessageContext {
            message: target,
            before: before_rows,
            after: after_rows,
        }))
    }
}

fn and_where(qb: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    if *first {
        qb.push(" WHERE ");
        *first = false;
    } else {
        qb.push(" AND ");
    }
}

/// Chat SELECT head, with or without the latest-message join. The joinless
/// variant still yields the full column set so one row type serves both.
fn chat_select(include_last_message: bool) -> String {
    if include_last_message {
        "SELECT c.jid AS jid, c.name AS name, c.last_message_time AS last_active, \
                m.content AS last_message, m.sender AS last_sender, \
                m.is_from_me AS last_is_from_me \
         FROM chats c \
         LEFT JOIN messages m ON m.chat_jid = c.jid \
           AND m.timestamp = (SELECT MAX(timestamp) FROM messages WHERE chat_jid = c.jid)"
            .to_string()
    } else {
        "SELECT c.jid AS jid, c.name AS name, c.last_message_time AS last_active, \
                NULL AS last_message, NULL AS last_sender, NULL AS last_is_from_me \
         FROM chats c"
            .to_string()
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Build a seeded store file the way the bridge would have left it.
    async fn seeded_store(dir: &TempDir) -> MessageStore {
        let path = dir.path().join("messages.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();

        sqlx::query(
            "CREATE TABLE chats (jid TEXT PRIMARY KEY, name TEXT, last_message_time TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE messages (id TEXT, chat_jid TEXT, sender TEXT, content TEXT, \
             timestamp TEXT, is_from_me INTEGER, media_type TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let chats = [
            ("15551230001@s.whatsapp.net", "Ada Lovelace", "2024-03-01 12:30:00"),
            ("15551230002@s.whatsapp.net", "Grace Hopper", "2024-03-02 09:00:00"),
            ("120363000000000001@g.us", "Compiler Club", "2024-03-03 18:45:00"),
        ];
        for (jid, name, last) in chats {
            sqlx::query("INSERT INTO chats VALUES (?, ?, ?)")
                .bind(jid)
                .bind(name)
                .bind(last)
                .execute(&pool)
                .await
                .unwrap();
        }

        let messages = [
            ("M1", "15551230001@s.whatsapp.net", "15551230001", "lunch tomorrow?", "2024-03-01 12:00:00", 0, None::<&str>),
            ("M2", "15551230001@s.whatsapp.net", "me", "sounds good", "2024-03-01 12:15:00", 1, None),
            ("M3", "15551230001@s.whatsapp.net", "15551230001", "great, noon it is", "2024-03-01 12:30:00", 0, None),
            ("M4", "15551230002@s.whatsapp.net", "15551230002", "ship it", "2024-03-02 09:00:00", 0, None),
            ("M5", "120363000000000001@g.us", "15551230001", "photo from the meetup", "2024-03-03 18:45:00", 0, Some("image")),
        ];
        for (id, chat, sender, content, ts, from_me, media) in messages {
            sqlx::query("INSERT INTO messages VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(id)
                .bind(chat)
                .bind(sender)
                .bind(content)
                .bind(ts)
                .bind(from_me)
                .bind(media)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool.close().await;

        MessageStore::open(&path).await.unwrap()
    }

    #[tokio::test]
    async fn open_missing_file_reports_bridge_not_running() {
        let err = MessageStore::open(Path::new("/no/such/messages.db"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Missing { .. }));
        assert!(err.to_string().contains("is the WhatsApp bridge running?"));
    }

    #[tokio::test]
    async fn search_contacts_skips_groups() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let hits = store.search_contacts("ada").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].jid, "15551230001@s.whatsapp.net");
        assert_eq!(hits[0].phone, "15551230001");
        assert_eq!(hits[0].name.as_deref(), Some("Ada Lovelace"));

        // Group names never show up as contacts.
        let none = store.search_contacts("Compiler").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_messages_filters_compose() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let all = store.list_messages(&MessageQuery::default()).await.unwrap();
        assert_eq!(all.len(), 5);
        // Newest first.
        assert_eq!(all[0].id, "M5");

        let one_chat = store
            .list_messages(&MessageQuery {
                chat_jid: Some("15551230001@s.whatsapp.net".into()),
                ..MessageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(one_chat.len(), 3);

        let text = store
            .list_messages(&MessageQuery {
                query: Some("LUNCH".into()),
                ..MessageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(text.len(), 1);
        assert_eq!(text[0].id, "M1");

        let windowed = store
            .list_messages(&MessageQuery {
                after: Some("2024-03-01 12:10:00".into()),
                before: Some("2024-03-02 00:00:00".into()),
                ..MessageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(windowed.len(), 2);
    }

    #[tokio::test]
    async fn list_messages_paginates() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let page0 = store
            .list_messages(&MessageQuery {
                limit: 2,
                page: 0,
                ..MessageQuery::default()
            })
            .await
            .unwrap();
        let page1 = store
            .list_messages(&MessageQuery {
                limit: 2,
                page: 1,
                ..MessageQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page0.len(), 2);
        assert_eq!(page1.len(), 2);
        assert_ne!(page0[0].id, page1[0].id);
    }

    #[tokio::test]
    async fn list_chats_carries_latest_message_when_asked() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let chats = store
            .list_chats(&ChatQuery {
                include_last_message: true,
                ..ChatQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(chats.len(), 3);
        // Recency order puts the group chat first.
        assert_eq!(chats[0].jid, "120363000000000001@g.us");
        assert!(chats[0].is_group());
        assert_eq!(chats[0].last_message.as_deref(), Some("photo from the meetup"));

        let bare = store.list_chats(&ChatQuery::default()).await.unwrap();
        assert!(bare[0].last_message.is_none());
    }

    #[tokio::test]
    async fn list_chats_sorts_by_name_on_request() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let chats = store
            .list_chats(&ChatQuery {
                sort_by: ChatSort::Name,
                ..ChatQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(chats[0].name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn get_chat_is_exact_match() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let chat = store
            .get_chat("15551230002@s.whatsapp.net", true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(chat.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(chat.last_message.as_deref(), Some("ship it"));

        assert!(store.get_chat("ghost@s.whatsapp.net", false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn chats_for_contact_accepts_jid_or_phone() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        // Ada messaged in her direct chat and in the group.
        let by_jid = store
            .chats_for_contact("15551230001@s.whatsapp.net", 20, 0)
            .await
            .unwrap();
        assert_eq!(by_jid.len(), 2);

        let by_phone = store.chats_for_contact("15551230001", 20, 0).await.unwrap();
        assert_eq!(by_phone.len(), 2);
    }

    #[tokio::test]
    async fn last_interaction_picks_newest_across_chats() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let last = store
            .last_interaction("15551230001@s.whatsapp.net")
            .await
            .unwrap()
            .unwrap();
        // Direct chat tops out at M3; the sender also appears in the group at
        // a later timestamp, which wins.
        assert_eq!(last.id, "M5");
    }

    #[tokio::test]
    async fn message_context_is_chronological_around_target() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let ctx = store.message_context("M2", 5, 5).await.unwrap().unwrap();
        assert_eq!(ctx.message.id, "M2");
        assert_eq!(ctx.before.len(), 1);
        assert_eq!(ctx.before[0].id, "M1");
        assert_eq!(ctx.after.len(), 1);
        assert_eq!(ctx.after[0].id, "M3");

        assert!(store.message_context("NOPE", 5, 5).await.unwrap().is_none());
    }
}
