// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `darkgpt serve`: the HTTP API server.

use darkgpt_agent::shutdown::install_signal_handler;
use darkgpt_config::DarkgptConfig;
use darkgpt_core::DarkgptError;
use darkgpt_gateway::GatewayState;
use tracing::info;

use crate::app::ChatStack;

/// Runs the gateway until SIGINT or SIGTERM, then flushes pending writes.
pub async fn run_serve(config: DarkgptConfig) -> Result<(), DarkgptError> {
    let stack = ChatStack::build(&config).await?;
    let state = GatewayState {
        identity: stack.identity.clone(),
        sessions: stack.sessions.clone(),
        max_body_bytes: darkgpt_gateway::body_limit_for(config.chat.max_image_bytes),
    };

    let shutdown = install_signal_handler();
    info!(agent = %config.agent.name, "starting gateway");
    let served = darkgpt_gateway::start_server(&config.gateway, state, shutdown).await;

    info!("gateway stopped, flushing pending writes");
    stack.shutdown().await?;
    served
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("darkgpt={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
