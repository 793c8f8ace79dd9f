//! HTTP adapter for a text-generation-webui style backend.
//!
//! One blocking-style request per chat: `POST <api_url>/api/v1/generate`,
//! reply taken from `results[0].text`. Failed and empty replies are retried
//! up to `max_retries` extra times. The adapter keeps a short rolling history
//! of exchanges that is sent with the next request.

use super::ConversationEngine;
use crate::config::TextGenerationConfig;
use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

const GENERATE_PATH: &str = "/api/v1/generate";

#[derive(Debug, Serialize)]
struct History {
    internal: Vec<String>,
    visible: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    prompt: String,
    history: History,
    #[serde(rename = "_continue")]
    continue_: bool,
    max_new_tokens: u32,
    preset: &'static str,
    do_sample: bool,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    typical_p: f32,
    epsilon_cutoff: f32,
    eta_cutoff: f32,
    tfs: f32,
    top_a: f32,
    repetition_penalty: f32,
    repetition_penalty_range: u32,
    encoder_repetition_penalty: f32,
    no_repeat_ngram_size: u32,
    min_length: u32,
    num_beams: u32,
    penalty_alpha: f32,
    length_penalty: f32,
    early_stopping: bool,
    mirostat_mode: u32,
    mirostat_tau: f32,
    mirostat_eta: f32,
    seed: i64,
    add_bos_token: bool,
    truncation_length: u32,
    ban_eos_token: bool,
    skip_special_tokens: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResult {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    results: Vec<GenerateResult>,
}

/// One remembered exchange.
#[derive(Debug, Clone)]
struct Exchange {
    human: String,
    ai: String,
}

/// Conversation engine backed by a text-generation HTTP API.
pub struct TextGenerationEngine {
    client: reqwest::Client,
    endpoint: String,
    config: TextGenerationConfig,
    history: Mutex<VecDeque<Exchange>>,
}

impl TextGenerationEngine {
    pub fn new(config: TextGenerationConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        let endpoint = format!("{}{GENERATE_PATH}", config.api_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            config,
            history: Mutex::new(VecDeque::new()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of exchanges currently remembered.
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    fn build_request(&self, user_name: &str, query: &str) -> GenerateRequest {
        let prompt = format!(
            "{}{}说{}[/INST]",
            self.config.persona_prompt, user_name, query
        );
        let history = {
            let short = self.history.lock();
            History {
                internal: short.iter().map(|e| e.human.clone()).collect(),
                visible: short.iter().map(|e| e.ai.clone()).collect(),
            }
        };
        GenerateRequest {
            prompt,
            history,
            continue_: false,
            max_new_tokens: self.config.max_new_tokens,
            preset: "None",
            do_sample: true,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: 20,
            typical_p: 1.0,
            epsilon_cutoff: 0.0,
            eta_cutoff: 0.0,
            tfs: 1.0,
            top_a: 0.0,
            repetition_penalty: 1.15,
            repetition_penalty_range: 0,
            encoder_repetition_penalty: 1.0,
            no_repeat_ngram_size: 0,
            min_length: 0,
            num_beams: 1,
            penalty_alpha: 0.0,
            length_penalty: 1.0,
            early_stopping: false,
            mirostat_mode: 0,
            mirostat_tau: 5.0,
            mirostat_eta: 0.1,
            seed: -1,
            add_bos_token: true,
            truncation_length: 2048,
            ban_eos_token: false,
            skip_special_tokens: true,
        }
    }

    async fn attempt(&self, body: &GenerateRequest) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("text-generation backend returned {status}");
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("invalid text-generation response body")?;
        let text = parsed
            .results
            .into_iter()
            .next()
            .map(|r| r.text.trim().to_owned())
            .unwrap_or_default();
        if text.is_empty() {
            bail!("text-generation backend returned an empty reply");
        }
        Ok(text)
    }

    /// First try plus retries.
    fn attempts(&self) -> u32 {
        self.config.max_retries.saturating_add(1)
    }

    fn remember(&self, human: String, ai: String) {
        let limit = self.config.short_history_len;
        if limit == 0 {
            return;
        }
        let mut short = self.history.lock();
        short.push_back(Exchange { human, ai });
        while short.len() > limit {
            short.pop_front();
        }
    }
}

#[async_trait]
impl ConversationEngine for TextGenerationEngine {
    async fn chat(&self, user_name: &str, query: &str) -> anyhow::Result<String> {
        let body = self.build_request(user_name, query);
        let attempts = self.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.attempt(&body).await {
                Ok(reply) => {
                    debug!(attempt, reply = %reply, "text-generation reply");
                    self.remember(format!("{user_name}说{query}"), reply.clone());
                    return Ok(reply);
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "text-generation attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("no attempt was made"))
            .context(format!("text-generation failed after {attempts} attempts")))
    }
}
