use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    DeepSeek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::OpenAi, ProviderId::DeepSeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "openai" => Ok(ProviderId::OpenAi),
            "deepseek" => Ok(ProviderId::DeepSeek),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// User-editable provider selection and keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub primary: ProviderId,
    #[serde(default)]
    pub backup: Option<ProviderId>,
    #[serde(default)]
    pub keys: HashMap<ProviderId, String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            primary: ProviderId::Gemini,
            backup: None,
            keys: HashMap::new(),
        }
    }
}

impl ApiSettings {
    pub fn new(primary: ProviderId, backup: Option<ProviderId>) -> Self {
        Self {
            primary,
            backup,
            keys: HashMap::new(),
        }
    }

    pub fn with_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }

    /// The user's own key, ignoring blanks
    pub fn key(&self, provider: ProviderId) -> Option<&str> {
        self.keys
            .get(&provider)
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
    }

    /// Backup worth trying: configured and different from the primary
    pub fn effective_backup(&self) -> Option<ProviderId> {
        self.backup.filter(|backup| *backup != self.primary)
    }

    /// Adopt rows fetched from the remote credential store. Keys overwrite
    /// per provider, the first row's provider becomes primary, and a backup
    /// equal to the new primary moves to the next row's provider.
    pub fn merge_remote(&self, rows: &[RemoteCredential]) -> ApiSettings {
        let mut merged = self.clone();
        let Some(first) = rows.first() else {
            return merged;
        };

        for row in rows {
            merged.keys.insert(row.provider, row.api_key.clone());
        }

        merged.primary = first.provider;
        if merged.backup == Some(merged.primary) {
            merged.backup = rows
                .iter()
                .map(|row| row.provider)
                .find(|provider| *provider != merged.primary);
        }

        merged
    }
}

/// One `{provider, api_key}` row of the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCredential {
    pub provider: ProviderId,
    pub api_key: String,
}

/// Resolved key set: the user's key for a provider, else the environment default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    keys: HashMap<ProviderId, String>,
}

impl Credentials {
    pub fn resolve(settings: &ApiSettings, defaults: &HashMap<ProviderId, String>) -> Self {
        let keys = ProviderId::ALL
            .iter()
            .filter_map(|provider| {
                let key = settings.key(*provider).or_else(|| {
                    defaults
                        .get(provider)
                        .map(|key| key.trim())
                        .filter(|key| !key.is_empty())
                })?;
                Some((*provider, key.to_string()))
            })
            .collect();
        Self { keys }
    }

    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    pub fn has(&self, provider: ProviderId) -> bool {
        self.keys.contains_key(&provider)
    }
}
