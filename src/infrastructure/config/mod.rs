use crate::domain::language::LanguageCode;
use crate::domain::orchestrator::PreloadOptions;
use crate::domain::provider::{ApiSettings, ProviderId};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRELOAD_LANGUAGES: &str =
    "English,Spanish,French,German,Italian,Portuguese,Japanese,Chinese";

#[derive(Debug, Clone)]
pub struct Config {
    // Environment-level default keys
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub primary_provider: ProviderId,
    pub backup_provider: Option<ProviderId>,
    pub endpoints: ProviderEndpoints,
    // Remote credential store
    pub remote_config_url: Option<String>,
    pub remote_config_key: Option<String>,
    pub remote_config_app_id: String,
    // Preload
    pub preload_languages: Vec<LanguageCode>,
    pub preload_delay_ms: u64,
    pub general_article_count: usize,
    pub data_dir: PathBuf,
    pub decode_cache_enabled: bool,
    pub environment: Environment,
    pub log_format: LogFormat,
}

/// Base URLs and model names per provider
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub gemini_base_url: String,
    pub gemini_text_model: String,
    pub gemini_tts_model: String,
    pub gemini_voice: String,
    pub openai_base_url: String,
    pub openai_text_model: String,
    pub openai_tts_model: String,
    /// Empty means one voice per language
    pub openai_voice: String,
    pub deepseek_base_url: String,
    pub deepseek_model: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_text_model: "gemini-2.0-flash".to_string(),
            gemini_tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            gemini_voice: "Kore".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_text_model: "gpt-4o-mini".to_string(),
            openai_tts_model: "tts-1".to_string(),
            openai_voice: String::new(),
            deepseek_base_url: "https://api.deepseek.com/v1".to_string(),
            deepseek_model: "deepseek-chat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = ProviderEndpoints::default();
        let endpoints = ProviderEndpoints {
            gemini_base_url: env_or("GEMINI_BASE_URL", &defaults.gemini_base_url),
            gemini_text_model: env_or("GEMINI_TEXT_MODEL", &defaults.gemini_text_model),
            gemini_tts_model: env_or("GEMINI_TTS_MODEL", &defaults.gemini_tts_model),
            gemini_voice: env_or("GEMINI_VOICE", &defaults.gemini_voice),
            openai_base_url: env_or("OPENAI_BASE_URL", &defaults.openai_base_url),
            openai_text_model: env_or("OPENAI_TEXT_MODEL", &defaults.openai_text_model),
            openai_tts_model: env_or("OPENAI_TTS_MODEL", &defaults.openai_tts_model),
            openai_voice: env_or("OPENAI_VOICE", &defaults.openai_voice),
            deepseek_base_url: env_or("DEEPSEEK_BASE_URL", &defaults.deepseek_base_url),
            deepseek_model: env_or("DEEPSEEK_MODEL", &defaults.deepseek_model),
        };

        let config = Config {
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            deepseek_api_key: env_opt("DEEPSEEK_API_KEY"),
            primary_provider: env_or("PRIMARY_PROVIDER", "gemini").parse::<ProviderId>()?,
            backup_provider: env_opt("BACKUP_PROVIDER")
                .map(|s| s.parse::<ProviderId>())
                .transpose()?,
            endpoints,
            remote_config_url: env_opt("REMOTE_CONFIG_URL"),
            remote_config_key: env_opt("REMOTE_CONFIG_KEY"),
            remote_config_app_id: env_or("REMOTE_CONFIG_APP_ID", "polyglot-reader"),
            preload_languages: parse_language_list(&env_or(
                "PRELOAD_LANGUAGES",
                DEFAULT_PRELOAD_LANGUAGES,
            ))?,
            preload_delay_ms: env_or("PRELOAD_DELAY_MS", "1500").parse()?,
            general_article_count: env_or("GENERAL_ARTICLE_COUNT", "2").parse()?,
            data_dir: PathBuf::from(env_or("DATA_DIR", ".polyglot-reader")),
            decode_cache_enabled: env_or("DECODE_CACHE_ENABLED", "true").to_lowercase() == "true",
            environment: match env_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Keys used when the user's settings have none
    pub fn default_keys(&self) -> HashMap<ProviderId, String> {
        [
            (ProviderId::Gemini, &self.gemini_api_key),
            (ProviderId::OpenAi, &self.openai_api_key),
            (ProviderId::DeepSeek, &self.deepseek_api_key),
        ]
        .into_iter()
        .filter_map(|(provider, key)| key.clone().map(|key| (provider, key)))
        .collect()
    }

    /// Settings for a first run, before the user has saved any
    pub fn default_settings(&self) -> ApiSettings {
        ApiSettings::new(self.primary_provider, self.backup_provider)
    }

    pub fn preload_options(&self) -> PreloadOptions {
        PreloadOptions {
            languages: self.preload_languages.clone(),
            delay: Duration::from_millis(self.preload_delay_ms),
            general_article_count: self.general_article_count,
        }
    }

    /// URL and key of the remote credential store, when both are set
    pub fn remote_config(&self) -> Option<(String, String)> {
        match (&self.remote_config_url, &self.remote_config_key) {
            (Some(url), Some(key)) => Some((url.clone(), key.clone())),
            _ => None,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Comma separated display names or ISO codes
pub fn parse_language_list(raw: &str) -> Result<Vec<LanguageCode>, String> {
    let mut languages = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let language = LanguageCode::from_display_name(name)
            .ok_or_else(|| format!("unknown language in PRELOAD_LANGUAGES: {}", name))?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    Ok(languages)
}
