// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the chat stack (storage, writer, orchestrator,
//! sessions) over a temp SQLite database with a [`MockProvider`] as the AI
//! backend, and registers a test user.

use std::sync::Arc;

use darkgpt_agent::{
    ChatSession, Orchestrator, OrchestratorSettings, SessionDeps, SessionRegistry,
    SessionSettings,
};
use darkgpt_config::model::StorageConfig;
use darkgpt_config::DarkgptConfig;
use darkgpt_core::types::{timestamp_now, UserProfile, UserRecord};
use darkgpt_core::{DarkgptError, Message, StorageAdapter};
use darkgpt_skill::{Tool, ToolRegistry};
use darkgpt_storage::{MessageWriter, SqliteStorage};

use crate::mock_provider::{MockProvider, MockReply};

/// Id of the user every harness registers.
pub const TEST_USER_ID: &str = "test-user";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    tools: Vec<Arc<dyn Tool>>,
    config: DarkgptConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            tools: Vec::new(),
            config: DarkgptConfig::default(),
        }
    }

    /// Set text replies for the mock backend.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.replies = responses.into_iter().map(MockReply::Text).collect();
        self
    }

    /// Set scripted replies (tool calls, failures) for the mock backend.
    pub fn with_mock_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Register a tool with the orchestrator.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set a custom persona.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.agent.system_prompt = Some(prompt.into());
        self
    }

    /// Adjust any configuration value before the stack is built.
    pub fn with_config(mut self, f: impl FnOnce(&mut DarkgptConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(mut self) -> Result<TestHarness, DarkgptError> {
        let temp_dir = tempfile::TempDir::new().map_err(DarkgptError::storage)?;
        self.config.storage = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let storage = SqliteStorage::new(self.config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let user = UserProfile {
            id: TEST_USER_ID.to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            created_at: timestamp_now(),
        };
        storage
            .create_user(&UserRecord {
                profile: user.clone(),
                password_hash: "unused".to_string(),
            })
            .await?;

        let (writer, _) = MessageWriter::spawn(storage.clone());

        let mock_provider = Arc::new(MockProvider::with_replies(self.replies));
        let mut tools = ToolRegistry::new();
        for tool in self.tools {
            tools.register(tool);
        }

        let persona = darkgpt_agent::prompt::load_persona(&self.config.agent).await;
        let orchestrator = Arc::new(Orchestrator::new(
            mock_provider.clone(),
            tools,
            OrchestratorSettings::from_config(&self.config, persona),
        ));

        let sessions = Arc::new(SessionRegistry::new(SessionDeps {
            orchestrator: orchestrator.clone(),
            storage: storage.clone(),
            writer: writer.clone(),
            settings: SessionSettings::from_config(&self.config),
        }));

        Ok(TestHarness {
            mock_provider,
            storage,
            writer,
            orchestrator,
            sessions,
            user,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete chat stack with a mock backend and temp storage.
pub struct TestHarness {
    /// The mock AI backend.
    pub mock_provider: Arc<MockProvider>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Background writer in front of `storage`.
    pub writer: MessageWriter,
    pub orchestrator: Arc<Orchestrator>,
    pub sessions: Arc<SessionRegistry>,
    /// The registered test user.
    pub user: UserProfile,
    pub config: DarkgptConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The test user's chat session.
    pub async fn session(&self) -> Result<Arc<ChatSession>, DarkgptError> {
        self.sessions.get_or_load(&self.user.id).await
    }

    /// Sends a text turn as the test user and returns the reply text.
    pub async fn send_message(&self, text: &str) -> Result<String, DarkgptError> {
        let reply = self.session().await?.send(text, None, false).await?;
        Ok(reply.content)
    }

    /// Waits for pending writes, then returns everything the store holds
    /// for the test user.
    pub async fn stored_messages(&self) -> Result<Vec<Message>, DarkgptError> {
        self.writer.flush().await?;
        self.storage.recent_messages(&self.user.id, usize::MAX).await
    }
}
