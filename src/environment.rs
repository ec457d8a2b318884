use anyhow::{bail, Context, Result};
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::org::RuleTables;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

const DEFAULT_OLLAMA_HOST: &str = "http://localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Ollama,
    OpenAI,
}

impl LlmBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(LlmBackend::Ollama),
            "openai" => Ok(LlmBackend::OpenAI),
            other => bail!("Unknown translator LLM type '{}' (expected 'ollama' or 'openai')", other),
        }
    }
}

/// Runtime configuration, read from the environment.
///
/// - `TRANSLATOR_LLM_TYPE`: "ollama" or "openai" (default: "ollama")
/// - `OLLAMA_HOST` / `OLLAMA_PORT`: Ollama endpoint (default: http://localhost:11434)
/// - `OPENAI_API_KEY`: required when the type is "openai"
/// - `TRANSLATOR_MODEL`: model name (default: "llama3")
/// - `TRANSLATOR_TEMPERATURE`: sampling temperature (default: 0.0)
/// - `TRANSLATOR_TIMEOUT_SECS`: per-request timeout (default: 120)
/// - `RULE_TABLES_PATH`: JSON rule tables replacing the built-in ones
/// - `LOG_DIR`: directory for daily rolling log files
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: LlmBackend,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub openai_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub tables_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// Parse a numeric variable; unset takes the default, unparsable is an error.
fn parse_or<T: std::str::FromStr>(var: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => bail!("Invalid value '{}' for {}", raw, var),
        },
        None => Ok(default),
    }
}

/// Ollama endpoint URL; a bare host is assumed to be plain http.
pub fn ollama_url(host: &str) -> Result<Url> {
    let host = host.trim();
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let url = Url::parse(&with_scheme)
        .with_context(|| format!("Invalid OLLAMA_HOST '{}'", host))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        bail!("OLLAMA_HOST must be an http(s) host, got '{}'", host);
    }
    Ok(url)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("TRANSLATOR_LLM_TYPE") {
            Some(value) => LlmBackend::parse(&value)?,
            None => LlmBackend::Ollama,
        };

        let non_empty = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        Ok(Config {
            backend,
            ollama_host: non_empty("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            ollama_port: parse_or("OLLAMA_PORT", non_empty("OLLAMA_PORT"), DEFAULT_OLLAMA_PORT)?,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            model: non_empty("TRANSLATOR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or("TRANSLATOR_TEMPERATURE", non_empty("TRANSLATOR_TEMPERATURE"), 0.0)?,
            request_timeout: Duration::from_secs(parse_or(
                "TRANSLATOR_TIMEOUT_SECS",
                non_empty("TRANSLATOR_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
            tables_path: non_empty("RULE_TABLES_PATH").map(PathBuf::from),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn llm_client(&self) -> Result<LLMClient> {
        match self.backend {
            LlmBackend::OpenAI => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY must be set when TRANSLATOR_LLM_TYPE is 'openai'")?;
                let config = OpenAIConfig::new().with_api_key(api_key);
                Ok(LLMClient::OpenAI(OpenAIClient::with_config(config)))
            }
            LlmBackend::Ollama => {
                let url = ollama_url(&self.ollama_host)?;
                info!(target: TARGET_LLM_REQUEST, "Connecting to Ollama at {}:{}", url, self.ollama_port);
                Ok(LLMClient::Ollama(Ollama::new(url.to_string(), self.ollama_port)))
            }
        }
    }

    pub fn llm_params(&self) -> Result<LLMParams> {
        Ok(LLMParams {
            llm_client: self.llm_client()?,
            model: self.model.clone(),
            temperature: self.temperature,
        })
    }

    /// Built-in tables, or the JSON resource at `tables_path`.
    pub fn load_tables(&self) -> Result<RuleTables> {
        match &self.tables_path {
            Some(path) => RuleTables::from_path(path)
                .with_context(|| format!("Failed to load rule tables from {}", path.display())),
            None => Ok(RuleTables::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend, LlmBackend::Ollama);
        assert_eq!(config.ollama_host, "http://localhost");
        assert_eq!(config.ollama_port, 11434);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.tables_path.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TRANSLATOR_LLM_TYPE", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TRANSLATOR_MODEL", "gpt-4o-mini"),
            ("TRANSLATOR_TEMPERATURE", "0.2"),
            ("TRANSLATOR_TIMEOUT_SECS", "30"),
            ("RULE_TABLES_PATH", "/etc/tarjama/tables.json"),
        ]))
        .unwrap();
        assert_eq!(config.backend, LlmBackend::OpenAI);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.tables_path,
            Some(PathBuf::from("/etc/tarjama/tables.json"))
        );
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        for (var, value) in [
            ("OLLAMA_PORT", "not-a-port"),
            ("TRANSLATOR_TIMEOUT_SECS", "-5"),
            ("TRANSLATOR_TEMPERATURE", "warm"),
        ] {
            let err = Config::from_lookup(lookup_from(&[(var, value)])).unwrap_err();
            assert!(err.to_string().contains(var), "{}: {}", var, err);
        }
    }

    #[test]
    fn test_ollama_url_adds_scheme() {
        assert_eq!(ollama_url("localhost").unwrap().as_str(), "http://localhost/");
        assert_eq!(
            ollama_url("https://ollama.internal").unwrap().as_str(),
            "https://ollama.internal/"
        );
        assert!(ollama_url("ftp://ollama.internal").is_err());
        assert!(ollama_url("http://bad host").is_err());
        assert!(ollama_url("").is_err());
    }

    #[test]
    fn test_bare_ollama_host_builds_client() {
        let config = Config::from_lookup(lookup_from(&[("OLLAMA_HOST", "localhost")])).unwrap();
        assert!(matches!(config.llm_client().unwrap(), LLMClient::Ollama(_)));
    }

    #[test]
    fn test_invalid_ollama_host_is_an_error() {
        let config =
            Config::from_lookup(lookup_from(&[("OLLAMA_HOST", "http://bad host")])).unwrap();
        assert!(config.llm_client().is_err());
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("TRANSLATOR_LLM_TYPE", "moses")])).is_err());
    }

    #[test]
    fn test_openai_requires_key() {
        let config =
            Config::from_lookup(lookup_from(&[("TRANSLATOR_LLM_TYPE", "openai")])).unwrap();
        assert!(config.llm_client().is_err());
    }

    #[test]
    fn test_load_builtin_tables() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        let tables = config.load_tables().unwrap();
        assert_eq!(tables.lexical("الخليج"), Some("Al-Khalij"));
    }
}
