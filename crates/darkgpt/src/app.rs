// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of the runtime stack shared by `serve` and `shell`.

use std::sync::Arc;

use darkgpt_agent::{
    Orchestrator, OrchestratorSettings, SessionDeps, SessionRegistry, SessionSettings,
};
use darkgpt_anthropic::AnthropicProvider;
use darkgpt_auth::IdentityService;
use darkgpt_config::DarkgptConfig;
use darkgpt_core::{DarkgptError, PluginAdapter, ProviderAdapter, StorageAdapter};
use darkgpt_skill::ToolRegistry;
use darkgpt_storage::{MessageWriter, SqliteStorage};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Opens and migrates the SQLite store.
pub async fn open_storage(config: &DarkgptConfig) -> Result<Arc<SqliteStorage>, DarkgptError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");
    Ok(Arc::new(storage))
}

/// Everything a chat client needs.
pub struct ChatStack {
    pub storage: Arc<SqliteStorage>,
    pub writer: MessageWriter,
    writer_task: JoinHandle<()>,
    pub identity: Arc<IdentityService>,
    pub sessions: Arc<SessionRegistry>,
}

impl ChatStack {
    /// Builds the stack: store, writer, AI backend, tools, orchestrator,
    /// sessions and identity.
    pub async fn build(config: &DarkgptConfig) -> Result<Self, DarkgptError> {
        let storage = open_storage(config).await?;
        let store: Arc<dyn StorageAdapter> = storage.clone();

        let provider: Arc<dyn ProviderAdapter> =
            Arc::new(AnthropicProvider::new(&config.anthropic)?);

        let mut tools = ToolRegistry::new();
        darkgpt_skill::builtin::register_builtins(&mut tools, &config.search);
        info!("tool registry initialized with {} built-in tools", tools.len());

        let persona = darkgpt_agent::prompt::load_persona(&config.agent).await;
        let orchestrator = Arc::new(Orchestrator::new(
            provider,
            tools,
            OrchestratorSettings::from_config(config, persona),
        ));

        let (writer, writer_task) = MessageWriter::spawn(store.clone());
        let sessions = Arc::new(SessionRegistry::new(SessionDeps {
            orchestrator,
            storage: store.clone(),
            writer: writer.clone(),
            settings: SessionSettings::from_config(config),
        }));
        let identity = Arc::new(IdentityService::new(store, config.auth.clone()));

        Ok(Self {
            storage,
            writer,
            writer_task,
            identity,
            sessions,
        })
    }

    /// Waits for queued writes, then checkpoints and closes the store.
    pub async fn shutdown(self) -> Result<(), DarkgptError> {
        if let Err(e) = self.writer.flush().await {
            warn!(error = %e, "failed to flush message writer");
        }
        self.writer_task.abort();
        self.identity.shutdown().await?;
        self.storage.close().await?;
        info!("storage closed");
        Ok(())
    }
}
