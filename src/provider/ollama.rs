use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AffirmationAgent, GenerateOptions};

pub struct OllamaAgent {
    model: String,
    url: String,
    timeout: Duration,
}

impl OllamaAgent {
    pub fn new(model: String, url: String, timeout_secs: u64) -> Self {
        Self {
            model,
            url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

#[async_trait]
impl AffirmationAgent for OllamaAgent {
    async fn generate(&self, prompt: &str, opts: &GenerateOptions, debug: bool) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Msg {
                role: "user".into(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: OllamaOptions {
                temperature: opts.temperature,
            },
        };

        if debug {
            eprintln!("debug/ollama: POST {}", url);
        }

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let text = resp.text().await.context("ollama read body failed")?;

        if debug {
            eprintln!("debug/ollama: raw body:\n{}\n", text);
        }

        // Standard ollama envelope first; if the server replied with bare
        // text, hand that downstream as-is.
        let content = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(c) => c.message.content,
            Err(_) => text,
        };

        Ok(content)
    }
}
