//! Generated player descriptions.
//!
//! Fills in missing descriptions by asking a language model for a short
//! career summary. The model sits behind [`DescriptionBackend`]; the only
//! remote implementation is the Anthropic messages API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::format::rate;
use crate::calculate::profile;
use crate::config::DescribeConfig;
use crate::models::{CareerStats, Player};
use crate::storage::{PlayerStore, StorageError};

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to parse response: {0}")]
    ResponseParseError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Something that can turn a prompt into prose.
#[async_trait]
pub trait DescriptionBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, DescribeError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

/// Anthropic messages API backend.
pub struct AnthropicBackend {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl AnthropicBackend {
    const URL: &'static str = "https://api.anthropic.com/v1/messages";

    pub fn new(api_key: String, model: String, timeout_seconds: u64) -> Result<Self, DescribeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| DescribeError::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            model,
            api_key,
        })
    }

    /// Build from config, reading the key from the configured variable.
    pub fn from_config(config: &DescribeConfig) -> Result<Self, DescribeError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            DescribeError::BackendUnavailable(format!("{} env var not set", config.api_key_env))
        })?;
        Self::new(api_key, config.model.clone(), config.timeout_seconds)
    }
}

#[async_trait]
impl DescriptionBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, DescribeError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(Self::URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| DescribeError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DescribeError::BackendUnavailable(format!(
                "Anthropic API returned {}: {}",
                status, body
            )));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| DescribeError::ResponseParseError(e.to_string()))?;

        Ok(parsed
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

/// Prompt asking for a three to five sentence career summary.
pub fn build_prompt(player: &Player) -> String {
    let stats = CareerStats::from_raw(player.stats);
    let archetypes: Vec<&str> = profile(&stats)
        .classifications
        .iter()
        .map(|c| c.label())
        .collect();

    let mut prompt = format!(
        "Generate a 3-5 sentence description for baseball player {}, who plays {}.\n\n\
         Career Statistics:\n\
         - Games: {}\n\
         - Batting Average: {}\n\
         - Home Runs: {}\n\
         - RBIs: {}\n\
         - Stolen Bases: {}\n\
         - OPS: {}\n",
        player.name,
        player.position.display_name(),
        stats.raw.games,
        rate(stats.derived.batting_avg),
        stats.raw.home_runs,
        stats.raw.rbis,
        stats.raw.stolen_bases,
        rate(stats.derived.ops),
    );
    if !archetypes.is_empty() {
        prompt.push_str(&format!("- Profile: {}\n", archetypes.join(", ")));
    }
    prompt.push_str(
        "\nWrite an engaging, informative description that highlights their career \
         achievements, playing style, and significance in baseball history. Keep it \
         between 3-5 sentences.",
    );
    prompt
}

/// Outcome counts of a describe run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeReport {
    pub described: usize,
    pub failed: usize,
}

/// Generate a description for every player that lacks one.
///
/// A failed generation is logged and counted; the run moves on to the next
/// player. Storage errors abort the run.
pub async fn describe_missing(
    store: &PlayerStore,
    backend: &dyn DescriptionBackend,
    max_tokens: u32,
    delay: Duration,
) -> Result<DescribeReport, DescribeError> {
    let pending: Vec<Player> = store
        .list()
        .await
        .into_iter()
        .filter(|p| p.description.as_deref().map_or(true, |d| d.trim().is_empty()))
        .collect();

    let mut report = DescribeReport::default();
    if pending.is_empty() {
        info!("All players already have descriptions");
        return Ok(report);
    }

    let total = pending.len();
    info!("Generating descriptions for {} players via {}", total, backend.name());

    for (idx, player) in pending.into_iter().enumerate() {
        if idx > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let text = match backend.complete(build_prompt(&player), max_tokens).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("[{}/{}] Empty description for {}", idx + 1, total, player.name);
                report.failed += 1;
                continue;
            }
            Err(e) => {
                warn!("[{}/{}] Failed to describe {}: {}", idx + 1, total, player.name, e);
                report.failed += 1;
                continue;
            }
        };

        store.set_description(player.id, text).await?;
        report.described += 1;
        info!("[{}/{}] Described {}", idx + 1, total, player.name);
    }

    Ok(report)
}
