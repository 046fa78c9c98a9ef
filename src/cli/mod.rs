use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "open-ai", alias = "openai")]
    OpenAI,
    #[value(alias = "ollama")]
    Ollama,
}

/// Which onboarding experiment to run. Same protocol throughout; the preset
/// fixes batch size, chips vs. fragments, and skippable steps.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    #[value(name = "fo-01")]
    Fo01,
    #[value(name = "fo-03")]
    Fo03,
    #[value(name = "fo-05")]
    Fo05,
    #[value(name = "fo-07")]
    Fo07,
    #[value(name = "fo-08")]
    Fo08,
    #[value(name = "fo-09")]
    Fo09,
    #[value(name = "fo-11")]
    Fo11,
}

impl VariantKind {
    pub fn id(&self) -> &'static str {
        match self {
            VariantKind::Fo01 => "fo-01",
            VariantKind::Fo03 => "fo-03",
            VariantKind::Fo05 => "fo-05",
            VariantKind::Fo07 => "fo-07",
            VariantKind::Fo08 => "fo-08",
            VariantKind::Fo09 => "fo-09",
            VariantKind::Fo11 => "fo-11",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "affirm-flow", version, about = "Terminal onboarding wizard for personalized affirmations")]
pub struct Args {
    // Flags that also live in the config file are optional here, so a file
    // value survives unless the flag is explicitly passed.
    /// Directory for session logs.
    #[arg(long)]
    pub root: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, value_enum, default_value_t = VariantKind::Fo09)]
    pub variant: VariantKind,

    /// Display name for the session; prompted for when omitted.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub templates: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub ollama_url: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long)]
    pub config: Option<String>,
}
