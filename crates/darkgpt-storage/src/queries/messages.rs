// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append, page query and bulk clear.

use darkgpt_core::types::{Message, Role, timestamp_now};
use darkgpt_core::DarkgptError;
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "id, user_id, role, content, image, created_at";

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let role: String = row.get(2)?;
    let role = role.parse::<Role>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        role,
        content: row.get(3)?,
        image: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Appends a message and returns it with its store-assigned `created_at`.
///
/// The timestamp is the later of now and the owner's latest message, so it
/// never decreases within a conversation.
pub async fn append_message(db: &Database, msg: &Message) -> Result<Message, DarkgptError> {
    msg.validate()?;
    let user_id = msg
        .user_id
        .clone()
        .ok_or_else(|| DarkgptError::Validation("message has no owner".into()))?;

    let mut stored = msg.clone();
    let id = msg.id.clone();
    let role = msg.role.to_string();
    let content = msg.content.clone();
    let image = msg.image.clone();

    let created_at = db
        .connection()
        .call(move |conn| -> Result<String, rusqlite::Error> {
            let tx = conn.transaction()?;
            let latest: Option<String> = tx.query_row(
                "SELECT MAX(created_at) FROM messages WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            let now = timestamp_now();
            let created_at = match latest {
                Some(latest) if latest > now => latest,
                _ => now,
            };
            tx.execute(
                "INSERT INTO messages (id, user_id, role, content, image, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, user_id, role, content, image, created_at],
            )?;
            tx.commit()?;
            Ok(created_at)
        })
        .await
        .map_err(map_tr_err)?;

    stored.created_at = created_at;
    Ok(stored)
}

/// Returns the most recent `limit` messages of a user, oldest first.
pub async fn recent_messages(
    db: &Database,
    user_id: &str,
    limit: usize,
) -> Result<Vec<Message>, DarkgptError> {
    let user_id = user_id.to_string();
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let sql = format!(
                "SELECT {COLUMNS} FROM (
                     SELECT seq, {COLUMNS} FROM messages WHERE user_id = ?1
                     ORDER BY created_at DESC, seq DESC LIMIT ?2
                 ) ORDER BY created_at ASC, seq ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![user_id, limit], message_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes every message of a user and returns how many were removed.
pub async fn clear_messages(db: &Database, user_id: &str) -> Result<usize, DarkgptError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| conn.execute("DELETE FROM messages WHERE user_id = ?1", params![user_id]))
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::{create_user, tests::make_user};
    use tempfile::tempdir;

    async fn setup() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("m.db").to_str().unwrap())
            .await
            .unwrap();
        create_user(&db, &make_user("u1", "one@example.com")).await.unwrap();
        create_user(&db, &make_user("u2", "two@example.com")).await.unwrap();
        (db, dir)
    }

    fn msg(user: &str, role: Role, content: &str) -> Message {
        Message::new(user, role, content, None)
    }

    #[tokio::test]
    async fn append_then_query_preserves_order() {
        let (db, _dir) = setup().await;
        let sent = vec![
            msg("u1", Role::User, "Bonjour"),
            msg("u1", Role::Assistant, "Salut"),
            msg("u1", Role::User, "Ça va ?"),
        ];
        for m in &sent {
            append_message(&db, m).await.unwrap();
        }

        let loaded = recent_messages(&db, "u1", 50).await.unwrap();
        let ids: Vec<_> = loaded.iter().map(|m| m.id.as_str()).collect();
        let expected: Vec<_> = sent.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert_eq!(loaded[1].role, Role::Assistant);
        assert!(loaded.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn limit_returns_most_recent_ascending() {
        let (db, _dir) = setup().await;
        for i in 0..5 {
            append_message(&db, &msg("u1", Role::User, &format!("m{i}")))
                .await
                .unwrap();
        }

        let page = recent_messages(&db, "u1", 2).await.unwrap();
        let contents: Vec<_> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn created_at_never_decreases() {
        let (db, _dir) = setup().await;
        let first = append_message(&db, &msg("u1", Role::User, "first"))
            .await
            .unwrap();

        // Force a future timestamp onto the latest row, as a skewed clock would.
        db.connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE messages SET created_at = '2999-01-01T00:00:00.000Z'",
                    [],
                )
            })
            .await
            .unwrap();

        let second = append_message(&db, &msg("u1", Role::Assistant, "second"))
            .await
            .unwrap();
        assert!(second.created_at >= "2999-01-01T00:00:00.000Z".to_string());
        assert!(second.created_at > first.created_at);

        let loaded = recent_messages(&db, "u1", 10).await.unwrap();
        assert_eq!(loaded.last().unwrap().content, "second");
    }

    #[tokio::test]
    async fn conversations_are_per_user() {
        let (db, _dir) = setup().await;
        append_message(&db, &msg("u1", Role::User, "mine")).await.unwrap();
        append_message(&db, &msg("u2", Role::User, "theirs")).await.unwrap();

        let u1 = recent_messages(&db, "u1", 50).await.unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].content, "mine");
    }

    #[tokio::test]
    async fn image_only_message_round_trips() {
        let (db, _dir) = setup().await;
        let m = Message::new(
            "u1",
            Role::User,
            "",
            Some("data:image/png;base64,iVBORw0KGgo=".into()),
        );
        append_message(&db, &m).await.unwrap();

        let loaded = recent_messages(&db, "u1", 50).await.unwrap();
        assert_eq!(loaded[0].image, m.image);
        assert_eq!(loaded[0].content, "");
    }

    #[tokio::test]
    async fn rejects_empty_message_without_image() {
        let (db, _dir) = setup().await;
        let err = append_message(&db, &msg("u1", Role::User, "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, DarkgptError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (db, _dir) = setup().await;
        let m = msg("u1", Role::User, "once");
        append_message(&db, &m).await.unwrap();
        assert!(matches!(
            append_message(&db, &m).await,
            Err(DarkgptError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn clear_removes_only_that_user() {
        let (db, _dir) = setup().await;
        append_message(&db, &msg("u1", Role::User, "a")).await.unwrap();
        append_message(&db, &msg("u1", Role::Assistant, "b")).await.unwrap();
        append_message(&db, &msg("u2", Role::User, "c")).await.unwrap();

        assert_eq!(clear_messages(&db, "u1").await.unwrap(), 2);
        assert!(recent_messages(&db, "u1", 50).await.unwrap().is_empty());
        assert_eq!(recent_messages(&db, "u2", 50).await.unwrap().len(), 1);
    }
}
