// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account administration subcommands: `signup` and `clear-history`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use colored::Colorize;
use darkgpt_auth::validation::normalize_email;
use darkgpt_auth::{IdentityService, SignupForm};
use darkgpt_config::DarkgptConfig;
use darkgpt_core::{DarkgptError, StorageAdapter};
use tracing::info;

use crate::app::open_storage;

fn read_password(prompt: &str) -> Result<String, DarkgptError> {
    rpassword::prompt_password(prompt)
        .map_err(|e| DarkgptError::Internal(format!("failed to read password: {e}")))
}

/// Creates an account after prompting for the password twice.
pub async fn run_signup(
    config: DarkgptConfig,
    name: String,
    email: String,
) -> Result<(), DarkgptError> {
    let password = read_password("Password: ")?;
    let confirmation = read_password("Confirm password: ")?;
    if password != confirmation {
        return Err(DarkgptError::Validation("passwords do not match".into()));
    }

    let storage = open_storage(&config).await?;
    let identity = IdentityService::new(storage.clone(), config.auth.clone());
    let result = identity
        .signup(&SignupForm {
            name,
            email,
            password,
        })
        .await;
    storage.close().await?;

    let profile = result?;
    println!(
        "{} {} <{}>",
        "created".green().bold(),
        profile.name,
        profile.email
    );
    println!("  id: {}", profile.id.dimmed());
    Ok(())
}

/// Deletes every stored message of the user registered under `email`.
pub async fn run_clear_history(
    config: DarkgptConfig,
    email: &str,
    yes: bool,
) -> Result<(), DarkgptError> {
    let storage = open_storage(&config).await?;
    let result = clear_history(storage.clone(), email, yes).await;
    storage.close().await?;

    match result? {
        Some(removed) => println!("{} {removed} message(s)", "deleted".green().bold()),
        None => println!("{}", "aborted".dimmed()),
    }
    Ok(())
}

async fn clear_history(
    storage: Arc<dyn StorageAdapter>,
    email: &str,
    yes: bool,
) -> Result<Option<usize>, DarkgptError> {
    let email = normalize_email(email);
    let record = storage
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| DarkgptError::Validation(format!("no account for {email}")))?;

    if !yes && !confirm(&format!("Delete all messages of {email}?"))? {
        return Ok(None);
    }

    let removed = storage.clear_messages(&record.profile.id).await?;
    info!(user_id = %record.profile.id, removed, "history cleared");
    Ok(Some(removed))
}

fn confirm(question: &str) -> Result<bool, DarkgptError> {
    print!("{question} [y/N] ");
    io::stdout()
        .flush()
        .map_err(|e| DarkgptError::Internal(format!("failed to write prompt: {e}")))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| DarkgptError::Internal(format!("failed to read answer: {e}")))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkgpt_config::model::StorageConfig;
    use darkgpt_core::types::{timestamp_now, UserProfile, UserRecord};
    use darkgpt_core::{Message, Role};
    use darkgpt_storage::SqliteStorage;

    async fn storage_with_users(dir: &tempfile::TempDir) -> Arc<dyn StorageAdapter> {
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("admin.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        for (id, name) in [("u1", "ada"), ("u2", "bob")] {
            storage
                .create_user(&UserRecord {
                    profile: UserProfile {
                        id: id.into(),
                        name: name.into(),
                        email: format!("{name}@example.com"),
                        created_at: timestamp_now(),
                    },
                    password_hash: "unused".into(),
                })
                .await
                .unwrap();
        }
        Arc::new(storage)
    }

    #[tokio::test]
    async fn clear_history_removes_only_that_user() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_with_users(&dir).await;
        storage
            .append_message(&Message::new("u1", Role::User, "hi", None))
            .await
            .unwrap();
        storage
            .append_message(&Message::new("u1", Role::Assistant, "hello", None))
            .await
            .unwrap();
        storage
            .append_message(&Message::new("u2", Role::User, "other", None))
            .await
            .unwrap();

        let removed = clear_history(storage.clone(), "ADA@example.com", true)
            .await
            .unwrap();
        assert_eq!(removed, Some(2));
        assert!(storage.recent_messages("u1", 10).await.unwrap().is_empty());
        assert_eq!(storage.recent_messages("u2", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_history_of_unknown_email_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_with_users(&dir).await;
        let err = clear_history(storage, "nobody@example.com", true)
            .await
            .unwrap_err();
        assert!(matches!(err, DarkgptError::Validation(_)));
    }
}
