// src/settings.rs
use crate::errors::QrStudioError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

impl AiProvider {
    pub fn parse(raw: &str) -> Result<Self, QrStudioError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(QrStudioError::InvalidProvider(other.to_string())),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-3-flash-preview",
            AiProvider::OpenAi => "gpt-4o",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            AiProvider::Gemini => "https://generativelanguage.googleapis.com",
            AiProvider::OpenAi => "https://api.openai.com",
        }
    }

    fn key_variable(self) -> &'static str {
        match self {
            AiProvider::Gemini => "GEMINI_API_KEY",
            AiProvider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    pub provider: AiProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub ai: AiSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, QrStudioError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, QrStudioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider = match get("QRSTUDIO_AI_PROVIDER") {
            Some(raw) => AiProvider::parse(&raw)?,
            None => AiProvider::Gemini,
        };

        let timeout_secs = match get("QRSTUDIO_AI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                QrStudioError::Configuration(format!("QRSTUDIO_AI_TIMEOUT_SECS: {}", e))
            })?,
            None => 30,
        };

        Ok(Self {
            bind_addr: get("QRSTUDIO_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            ai: AiSettings {
                provider,
                api_key: get("API_KEY").or_else(|| get(provider.key_variable())),
                model: get("QRSTUDIO_AI_MODEL")
                    .unwrap_or_else(|| provider.default_model().to_string()),
                base_url: get("QRSTUDIO_AI_BASE_URL")
                    .unwrap_or_else(|| provider.default_base_url().to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
