// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile queries.

use darkgpt_core::types::{UserProfile, UserRecord};
use darkgpt_core::DarkgptError;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use crate::database::{map_tr_err, Database};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        profile: UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            created_at: row.get(4)?,
        },
        password_hash: row.get(3)?,
    })
}

/// Inserts a user. A taken email is reported as [`DarkgptError::Auth`].
pub async fn create_user(db: &Database, user: &UserRecord) -> Result<(), DarkgptError> {
    let user = user.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.profile.id,
                    user.profile.name,
                    user.profile.email,
                    user.password_hash,
                    user.profile.created_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(DarkgptError::Auth("email already in use".into()))
    }
}

/// Looks up a user by exact (already normalised) email.
pub async fn get_user_by_email(
    db: &Database,
    email: &str,
) -> Result<Option<UserRecord>, DarkgptError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?1",
                params![email],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Looks up a user by id.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<UserRecord>, DarkgptError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
