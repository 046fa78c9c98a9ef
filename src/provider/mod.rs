use anyhow::Result;
use async_trait::async_trait;

use crate::cli::ProviderKind;

pub mod ollama;
pub mod openai;

/// Knobs forwarded to the model call. Temperature defaults to 0.9; the
/// template store may override it per stage.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { temperature: 0.9 }
    }
}

/// The LLM behind the onboarding flow. Output is free text with no enforced
/// schema; all structure is recovered downstream by the parsers.
#[async_trait]
pub trait AffirmationAgent: Send + Sync {
    async fn generate(&self, prompt: &str, opts: &GenerateOptions, debug: bool) -> Result<String>;
}

pub type DynAgent = Box<dyn AffirmationAgent + Send + Sync>;

pub fn make_agent(
    kind: ProviderKind,
    model: String,
    timeout_secs: u64,
    ollama_url: Option<String>,
) -> DynAgent {
    match kind {
        ProviderKind::OpenAI => Box::new(openai::OpenAIAgent::new(model, timeout_secs)),
        ProviderKind::Ollama => Box::new(ollama::OllamaAgent::new(
            model,
            ollama_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
            timeout_secs,
        )),
    }
}
