//! Runtime settings shared by the script and the service

use clap::Args;
use std::time::Duration;

/// Chat and embedding model served by Ollama
pub const MODEL_NAME: &str = "tinyllama";

pub const DEFAULT_OLLAMA_URL: &str = "http://ollama:11434";

pub const OLLAMA_URL_ENV: &str = "OLLAMA_BASE_URL";

/// The one document the index is built from
pub const DEFAULT_CORPUS: &str =
  "Pablo é um especialista em MLOps que está testando arquiteturas de containers Docker.";

/// Question asked by the one-shot script when none is given
pub const DEFAULT_QUESTION: &str = "What is Pablo testing?";

pub const DEFAULT_MAX_RETRIES: u32 = 30;

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// How a target model name is compared against registry entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelMatch {
  /// `tinyllama` matches `tinyllama:latest`
  #[default]
  Substring,
  /// Registry name must equal the target, tag included
  Exact,
}

#[derive(Debug, Clone)]
pub struct Settings {
  pub ollama_base_url: String,
  pub model: String,
  pub max_retries: u32,
  pub retry_interval: Duration,
  /// `None` leaves the transport default in place
  pub request_timeout: Option<Duration>,
  pub model_match: ModelMatch,
  pub corpus: Vec<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      ollama_base_url: DEFAULT_OLLAMA_URL.to_string(),
      model: MODEL_NAME.to_string(),
      max_retries: DEFAULT_MAX_RETRIES,
      retry_interval: DEFAULT_RETRY_INTERVAL,
      request_timeout: None,
      model_match: ModelMatch::default(),
      corpus: vec![DEFAULT_CORPUS.to_string()],
    }
  }
}

impl Settings {
  /// Defaults with the base URL taken from `OLLAMA_BASE_URL` when set
  pub fn from_env() -> Self {
    let mut settings = Self::default();
    if let Ok(url) = std::env::var(OLLAMA_URL_ENV) {
      if !url.trim().is_empty() {
        settings = settings.with_base_url(url);
      }
    }
    settings
  }

  pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
    self.ollama_base_url = normalize_base_url(&url.into());
    self
  }

  pub fn with_retries(mut self, max_retries: u32, interval: Duration) -> Self {
    self.max_retries = max_retries;
    self.retry_interval = interval;
    self
  }

  pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.request_timeout = timeout;
    self
  }

  pub fn with_model_match(mut self, model_match: ModelMatch) -> Self {
    self.model_match = model_match;
    self
  }
}

/// Model-server flags shared by both binaries
#[derive(Debug, Clone, Args)]
pub struct ModelServerArgs {
  /// Base URL of the Ollama server; falls back to OLLAMA_BASE_URL
  #[arg(long = "ollama-url")]
  pub ollama_url: Option<String>,

  /// Connection attempts before giving up on the server
  #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
  pub max_retries: u32,

  /// Seconds between connection attempts
  #[arg(long, default_value_t = DEFAULT_RETRY_INTERVAL.as_secs())]
  pub retry_interval_secs: u64,

  /// Timeout for each request to the server (none by default)
  #[arg(long)]
  pub timeout_secs: Option<u64>,

  /// Require the registry name to equal the model name, tag included
  #[arg(long)]
  pub exact_model_match: bool,
}

impl ModelServerArgs {
  pub fn into_settings(self) -> Settings {
    let model_match = if self.exact_model_match { ModelMatch::Exact } else { ModelMatch::Substring };

    let mut settings = Settings::from_env();
    if let Some(url) = self.ollama_url {
      settings = settings.with_base_url(url);
    }

    settings
      .with_retries(self.max_retries, Duration::from_secs(self.retry_interval_secs))
      .with_timeout(self.timeout_secs.map(Duration::from_secs))
      .with_model_match(model_match)
  }
}

fn normalize_base_url(url: &str) -> String {
  url.trim().trim_end_matches('/').to_string()
}
