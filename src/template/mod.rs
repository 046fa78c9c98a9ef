use std::collections::HashMap;
use std::path::Path;

use fs_err as fs;
use serde::Deserialize;

/// External prompt-wording configuration. Lookup failure is never an error:
/// callers fall back to the hardcoded prompt builders.
pub trait TemplateStore {
    /// Render the template under `key` with `{placeholder}` substitution.
    /// `None` when the key is absent for this implementation.
    fn render(&self, key: &str, vars: &[(&str, String)]) -> Option<String>;

    /// Raw text lookup, e.g. a per-stage temperature override.
    fn get_text(&self, key: &str) -> Option<String>;
}

/// TOML-backed store. Keys are looked up as `<implementation>.<key>` first,
/// then bare `<key>`, so one file can carry shared wording plus per-variant
/// overrides:
///
/// ```toml
/// [templates]
/// "screen" = "Ask {name} one question..."
/// "fo-11.screen" = "..."
/// "batch.temperature" = "0.7"
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlTemplateStore {
    implementation: String,
    entries: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: HashMap<String, String>,
}

impl TomlTemplateStore {
    pub fn empty(implementation: impl Into<String>) -> Self {
        Self {
            implementation: implementation.into(),
            entries: HashMap::new(),
        }
    }

    pub fn load(path: &Path, implementation: impl Into<String>) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let file: TemplateFile = toml::from_str(&raw)?;
        Ok(Self {
            implementation: implementation.into(),
            entries: file.templates,
        })
    }

    /// Best-effort load: a missing or malformed file degrades to an empty
    /// store, which in turn degrades every lookup to the hardcoded defaults.
    pub fn load_or_empty(path: Option<&Path>, implementation: impl Into<String>) -> Self {
        let implementation = implementation.into();
        match path {
            Some(p) => Self::load(p, implementation.clone()).unwrap_or_else(|_| Self::empty(implementation)),
            None => Self::empty(implementation),
        }
    }

    fn lookup(&self, key: &str) -> Option<&String> {
        self.entries
            .get(&format!("{}.{}", self.implementation, key))
            .or_else(|| self.entries.get(key))
    }
}

impl TemplateStore for TomlTemplateStore {
    fn render(&self, key: &str, vars: &[(&str, String)]) -> Option<String> {
        let mut out = self.lookup(key)?.clone();
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        Some(out)
    }

    fn get_text(&self, key: &str) -> Option<String> {
        self.lookup(key).cloned()
    }
}

/// Temperature for a stage: store override when present and parseable,
/// otherwise the configured default.
pub fn temperature_for(store: &dyn TemplateStore, stage: &str, default: f32) -> f32 {
    store
        .get_text(&format!("{stage}.temperature"))
        .and_then(|t| t.trim().parse::<f32>().ok())
        .unwrap_or(default)
}
