//! Configuration management for the news agent.
//!
//! Configuration can be set via environment variables:
//! - `OPENAI_API_KEY` - Required. API key for the chat-completions provider.
//! - `OPENAI_BASE_URL` - Optional. Provider base URL. Defaults to `https://api.openai.com/v1`.
//! - `DEFAULT_MODEL` - Optional. The LLM model to use. Defaults to `gpt-4o`.
//! - `TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.0`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `15`.
//! - `AGENT_TIMEOUT_SECS` - Optional. Wall-clock limit for the whole run. Unset means no limit.
//! - `WORKSPACE_PATH` - Optional. Base directory for relative file paths. Defaults to current directory.
//! - `SEARCH_ENDPOINT` - Optional. DuckDuckGo lite endpoint.
//! - `SEARCH_REGION` - Optional. Search region code. Defaults to `jp-jp`.
//! - `SEARCH_SAFESEARCH` - Optional. `on`, `moderate` or `off`. Defaults to `off`.
//! - `SEARCH_MAX_RESULTS` - Optional. Default result cap for searches. Defaults to `5`.
//! - `FETCH_TIMEOUT_SECS` - Optional. Page fetch timeout. Unset means the client default.
//! - `FETCH_MAX_CHARS` - Optional. Maximum characters of page text returned. Defaults to `20000`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://lite.duckduckgo.com/lite/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// SafeSearch level passed to the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeSearch {
    On,
    Moderate,
    Off,
}

impl FromStr for SafeSearch {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "on" | "strict" => Ok(SafeSearch::On),
            "moderate" => Ok(SafeSearch::Moderate),
            "off" => Ok(SafeSearch::Off),
            other => Err(format!("expected on, moderate or off, got: {}", other)),
        }
    }
}

/// Search backend configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// DuckDuckGo lite endpoint
    pub endpoint: String,

    /// Region code, e.g. `jp-jp`
    pub region: String,

    pub safesearch: SafeSearch,

    /// Result cap used when the LLM does not pass one
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            region: "jp-jp".to_string(),
            safesearch: SafeSearch::Off,
            max_results: 5,
        }
    }
}

/// Page fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout. `None` keeps the HTTP client's default (no timeout).
    pub timeout: Option<Duration>,

    /// Maximum number of characters of extracted text handed back to the LLM
    pub max_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            max_chars: 20_000,
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completions API key
    pub api_key: String,

    /// Chat-completions base URL (OpenAI-compatible)
    pub base_url: String,

    /// LLM model identifier
    pub default_model: String,

    pub temperature: f32,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Overall run timeout
    pub run_timeout: Option<Duration>,

    /// Base directory for relative file paths
    pub workspace_path: PathBuf,

    pub search: SearchConfig,

    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENAI_API_KEY` is not set, or
    /// `ConfigError::InvalidValue` if an optional variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let default_model = lookup("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature: f32 = parse_or(&lookup, "TEMPERATURE", 0.0)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "TEMPERATURE".to_string(),
                format!("{} is outside 0.0..=2.0", temperature),
            ));
        }

        let max_iterations: usize =
            at_least_one("MAX_ITERATIONS", parse_or(&lookup, "MAX_ITERATIONS", 15)?)?;

        let run_timeout = parse_optional::<u64, _>(&lookup, "AGENT_TIMEOUT_SECS")?
            .map(|secs| at_least_one("AGENT_TIMEOUT_SECS", secs))
            .transpose()?
            .map(Duration::from_secs);

        let workspace_path = lookup("WORKSPACE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let defaults = SearchConfig::default();
        let search = SearchConfig {
            endpoint: lookup("SEARCH_ENDPOINT").unwrap_or(defaults.endpoint),
            region: lookup("SEARCH_REGION").unwrap_or(defaults.region),
            safesearch: parse_or(&lookup, "SEARCH_SAFESEARCH", defaults.safesearch)?,
            max_results: at_least_one(
                "SEARCH_MAX_RESULTS",
                parse_or(&lookup, "SEARCH_MAX_RESULTS", defaults.max_results)?,
            )?,
        };

        let fetch = FetchConfig {
            timeout: parse_optional::<u64, _>(&lookup, "FETCH_TIMEOUT_SECS")?
                .map(|secs| at_least_one("FETCH_TIMEOUT_SECS", secs))
                .transpose()?
                .map(Duration::from_secs),
            max_chars: parse_or(&lookup, "FETCH_MAX_CHARS", FetchConfig::default().max_chars)?,
        };

        Ok(Self {
            api_key,
            base_url,
            default_model,
            temperature,
            max_iterations,
            run_timeout,
            workspace_path,
            search,
            fetch,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String, workspace_path: PathBuf) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model,
            temperature: 0.0,
            max_iterations: 15,
            run_timeout: None,
            workspace_path,
            search: SearchConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e)))
        })
        .transpose()
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

fn at_least_one<T>(key: &str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + From<u8>,
{
    if value == T::from(0) {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(value)
}
