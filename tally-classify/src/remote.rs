//! Remote categorization through an OpenAI-compatible chat-completion endpoint.
//!
//! One request per description, no retries. Any failure (transport error,
//! timeout, non-2xx status, unexpected body, unrecognized or ambiguous reply)
//! falls back to the keyword classifier, so `classify` always returns.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_core::{keywords, Category, Classifier};
use tokio::runtime::{Builder, Handle, RuntimeFlavor};

use crate::prompt::{self, ReplyMatch};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub model: String,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.3,
            max_tokens: 10,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

/// Why a remote attempt did not produce a category.
#[derive(Debug)]
enum Miss {
    Failed(anyhow::Error),
    Unrecognized(String),
    Ambiguous(String, Vec<Category>),
}

pub struct RemoteClassifier {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("build http client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Categorize via the endpoint, falling back to keywords on any miss.
    pub async fn classify_async(&self, description: &str) -> Category {
        let miss = match self.request_reply(description).await {
            Ok(reply) => match prompt::match_category(&reply) {
                ReplyMatch::One(category) => {
                    tracing::info!(%description, %category, "remote category");
                    return category;
                }
                ReplyMatch::None => Miss::Unrecognized(reply),
                ReplyMatch::Ambiguous(found) => Miss::Ambiguous(reply, found),
            },
            Err(e) => Miss::Failed(e),
        };

        let category = keywords::classify(description);
        match miss {
            Miss::Failed(e) => {
                tracing::warn!(%description, %category, error = %format!("{e:#}"), "remote unavailable, using keywords")
            }
            Miss::Unrecognized(reply) => {
                tracing::warn!(%description, %category, %reply, "remote reply unrecognized, using keywords")
            }
            Miss::Ambiguous(reply, found) => {
                tracing::warn!(%description, %category, %reply, ?found, "remote reply ambiguous, using keywords")
            }
        }
        category
    }

    async fn request_reply(&self, description: &str) -> Result<String> {
        let body = Req {
            model: &self.config.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: prompt::system_instruction(),
                },
                Msg {
                    role: "user",
                    content: prompt::user_message(description),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut req = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let resp = req.send().await.context("completion request")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("completion endpoint returned {status}");
        }

        let out: Resp = resp.json().await.context("parse completion response")?;
        let content = out
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("completion response has no choices"))?;

        Ok(content.trim().to_string())
    }

    /// Drive one request on a private current-thread runtime.
    fn classify_on_fresh_runtime(&self, description: &str) -> Category {
        match Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(self.classify_async(description)),
            Err(e) => {
                tracing::warn!(error = %e, "cannot start runtime, using keywords");
                keywords::classify(description)
            }
        }
    }
}

impl Classifier for RemoteClassifier {
    fn classify(&self, description: &str) -> Category {
        // A nested `block_on` panics inside a runtime, and `block_in_place`
        // panics on a current_thread runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.classify_async(description)))
            }
            Ok(_) => std::thread::scope(|s| {
                s.spawn(|| self.classify_on_fresh_runtime(description))
                    .join()
                    .unwrap_or_else(|_| {
                        tracing::warn!(%description, "remote worker panicked, using keywords");
                        keywords::classify(description)
                    })
            }),
            Err(_) => self.classify_on_fresh_runtime(description),
        }
    }
}
