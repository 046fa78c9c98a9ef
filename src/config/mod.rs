use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: String,
    pub provider: ProviderKind,
    pub model: String,
    /// Default sampling temperature; the template store may override per
    /// stage (e.g. `batch.temperature`).
    pub temperature: f32,
    pub timeout_secs: u64,
    pub ollama_url: Option<String>,
    pub templates_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: ".".into(),
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1-mini".into(),
            temperature: 0.9,
            timeout_secs: 120,
            ollama_url: Some("http://localhost:11434".into()),
            templates_path: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with a TOML file when one is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = fs_err::read_to_string(p)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Explicitly passed flags win over the file; absent flags leave the
    /// file's (or default) values alone.
    pub fn merge_args(&mut self, args: &Args) {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(provider) = args.provider {
            self.provider = provider;
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(timeout) = args.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(temperature) = args.temperature {
            self.temperature = temperature;
        }
        if args.ollama_url.is_some() {
            self.ollama_url = args.ollama_url.clone();
        }
        if args.templates.is_some() {
            self.templates_path = args.templates.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_temperature_is_point_nine() {
        assert_eq!(Config::default().temperature, 0.9);
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(f, "model = \"llama3\"\ntemperature = 0.5").expect("write");
        let cfg = Config::load(Some(f.path())).expect("load");
        assert_eq!(cfg.model, "llama3");
        assert_eq!(cfg.temperature, 0.5);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.timeout_secs, 120);
    }

    fn no_args() -> Args {
        Args {
            root: None,
            provider: None,
            model: None,
            variant: crate::cli::VariantKind::Fo09,
            name: None,
            templates: None,
            timeout_secs: None,
            temperature: None,
            ollama_url: None,
            debug: false,
            config: None,
        }
    }

    #[test]
    fn file_values_survive_absent_flags() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(f, "provider = \"ollama\"\nmodel = \"llama3\"\ntimeout_secs = 300").expect("write");
        let mut cfg = Config::load(Some(f.path())).expect("load");
        cfg.merge_args(&no_args());
        // Nothing passed on the command line: the file wins.
        assert_eq!(cfg.provider, ProviderKind::Ollama);
        assert_eq!(cfg.model, "llama3");
        assert_eq!(cfg.timeout_secs, 300);
    }

    #[test]
    fn explicit_flags_win_over_the_file() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(f, "provider = \"ollama\"\nmodel = \"llama3\"").expect("write");
        let mut cfg = Config::load(Some(f.path())).expect("load");
        let args = Args {
            model: Some("gpt-4.1-mini".into()),
            temperature: Some(0.2),
            ..no_args()
        };
        cfg.merge_args(&args);
        assert_eq!(cfg.model, "gpt-4.1-mini");
        assert_eq!(cfg.temperature, 0.2);
        // The provider flag was not passed, so the file's choice stands.
        assert_eq!(cfg.provider, ProviderKind::Ollama);
    }
}
