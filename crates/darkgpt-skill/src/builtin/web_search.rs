// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search tool backed by the Tavily search API.
//!
//! One POST per invocation: no cache, no retry. The result handed to the
//! model is a JSON array of `{title, url, content, score}` records.

use async_trait::async_trait;
use darkgpt_config::model::SearchConfig;
use darkgpt_core::DarkgptError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::tool::{Tool, ToolOutput};

/// Name under which the tool is offered to the model.
pub const TOOL_NAME: &str = "web_search";

/// Hard cap on results returned per query.
pub const MAX_RESULTS: usize = 5;

/// Message for a missing credential. Callers match on "not configured".
pub const MISSING_KEY: &str =
    "web search API key is not configured (set search.api_key or TAVILY_API_KEY)";

/// Searches the web for up-to-date information.
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    max_results: usize,
    search_depth: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// One search result as returned to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchError {
    #[serde(alias = "error")]
    detail: serde_json::Value,
}

impl WebSearchTool {
    /// Creates the tool from the `[search]` section, falling back to the
    /// `TAVILY_API_KEY` environment variable for the credential.
    pub fn from_config(config: &SearchConfig) -> Self {
        let api_key = resolve_api_key(
            config.api_key.as_deref(),
            std::env::var("TAVILY_API_KEY").ok(),
        );
        if api_key.is_none() {
            debug!("web search credential not configured");
        }
        Self::new(
            api_key,
            config.base_url.clone(),
            config.max_results,
            config.search_depth.clone(),
        )
    }

    /// Creates the tool with explicit settings.
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        max_results: usize,
        search_depth: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            max_results: max_results.clamp(1, MAX_RESULTS),
            search_depth,
        }
    }

    async fn search(&self, api_key: &str, query: &str) -> Result<Vec<SearchHit>, DarkgptError> {
        let body = SearchRequest {
            api_key,
            query,
            max_results: self.max_results,
            search_depth: &self.search_depth,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DarkgptError::ToolExecution {
                message: format!("web search failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| DarkgptError::ToolExecution {
            message: format!("web search failed: could not read response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<SearchError>(&text)
                .map(|e| match e.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(text);
            warn!(status = %status, "search API returned an error");
            return Err(DarkgptError::tool(format!(
                "web search failed: search API returned {status}: {detail}"
            )));
        }

        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| DarkgptError::ToolExecution {
                message: format!("web search failed: unexpected response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let mut hits = parsed.results;
        hits.truncate(self.max_results);
        Ok(hits)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Searches the web for current information. Use it for recent events, facts you are unsure of, or anything the conversation cannot answer on its own."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, DarkgptError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DarkgptError::Config(MISSING_KEY.to_string()))?;

        let query = input["query"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                DarkgptError::tool("web search failed: missing required 'query' parameter")
            })?;

        debug!(query, "running web search");
        let hits = self.search(api_key, query).await?;
        debug!(results = hits.len(), "web search completed");

        let content = serde_json::to_string(&hits)
            .map_err(|e| DarkgptError::Internal(format!("failed to serialize search results: {e}")))?;

        Ok(ToolOutput {
            content,
            is_error: false,
        })
    }
}

/// Config value first, then the environment. Blank values count as absent.
fn resolve_api_key(config_key: Option<&str>, env_key: Option<String>) -> Option<String> {
    config_key
        .map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env_key.filter(|k| !k.trim().is_empty()))
}
