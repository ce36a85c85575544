use crate::constants::{
    ANTHROPIC_BASE_URL, CONFIG_FILE_NAME, DEFAULT_TARGET_BRANCH, DEFAULT_TEMPERATURE,
    GITIGNORE_FILE_NAME, MAX_TEMPERATURE, OPENAI_BASE_URL,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no .autocommitrc found in {}, run `autocommit --setup` first", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{provider} provider selected but no {field} is set")]
    MissingApiKey {
        provider: Provider,
        field: &'static str,
    },

    #[error("{provider} provider selected but {field} is also set, keep only one API key")]
    ConflictingApiKey {
        provider: Provider,
        field: &'static str,
    },

    #[error("temperature {0} is outside 0.0..=2.0")]
    Temperature(f32),

    #[error("model name is empty")]
    EmptyModel,
}

/// the two families of text generation APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai-compatible", alias = "gpt", alias = "openai")]
    OpenAiCompatible,
    #[serde(rename = "anthropic-compatible", alias = "claude", alias = "anthropic")]
    AnthropicCompatible,
}

impl Provider {
    pub fn api_key_field(self) -> &'static str {
        match self {
            Provider::OpenAiCompatible => "openaiApiKey",
            Provider::AnthropicCompatible => "claudeApiKey",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAiCompatible => OPENAI_BASE_URL,
            Provider::AnthropicCompatible => ANTHROPIC_BASE_URL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAiCompatible => write!(f, "openai-compatible"),
            Provider::AnthropicCompatible => write!(f, "anthropic-compatible"),
        }
    }
}

fn default_target_branch() -> String {
    DEFAULT_TARGET_BRANCH.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// contents of the repo-local `.autocommitrc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: Provider,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_target_branch")]
    pub target_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_api_key: Option<String>,
    /// endpoint root for self-hosted compatible gateways
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// build a config holding `api_key` in the field matching `provider`
    pub fn new(
        provider: Provider,
        model: String,
        temperature: f32,
        target_branch: String,
        api_key: String,
    ) -> Self {
        let (openai_api_key, claude_api_key) = match provider {
            Provider::OpenAiCompatible => (Some(api_key), None),
            Provider::AnthropicCompatible => (None, Some(api_key)),
        };
        Self {
            provider,
            model,
            temperature,
            target_branch,
            openai_api_key,
            claude_api_key,
            base_url: None,
        }
    }

    /// the key for the declared provider, if present and non-blank
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            Provider::OpenAiCompatible => self.openai_api_key.as_deref(),
            Provider::AnthropicCompatible => self.claude_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    fn other_api_key(&self) -> Option<&str> {
        let key = match self.provider {
            Provider::OpenAiCompatible => self.claude_api_key.as_deref(),
            Provider::AnthropicCompatible => self.openai_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::Temperature(self.temperature));
        }
        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey {
                provider: self.provider,
                field: self.provider.api_key_field(),
            });
        }
        if self.other_api_key().is_some() {
            let other = match self.provider {
                Provider::OpenAiCompatible => Provider::AnthropicCompatible,
                Provider::AnthropicCompatible => Provider::OpenAiCompatible,
            };
            return Err(ConfigError::ConflictingApiKey {
                provider: self.provider,
                field: other.api_key_field(),
            });
        }
        Ok(())
    }
}

pub fn config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_FILE_NAME)
}

/// load and validate `.autocommitrc` from the repository root
pub fn load(repo_root: &Path) -> Result<ProviderConfig, ConfigError> {
    let path = config_path(repo_root);
    if !path.exists() {
        return Err(ConfigError::Missing(repo_root.to_path_buf()));
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config: ProviderConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), provider = %config.provider, model = %config.model, "loaded config");
    Ok(config)
}

/// write `.autocommitrc` through a sibling temp file that is renamed into place
pub fn save(repo_root: &Path, config: &ProviderConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path(repo_root);
    let write_error = |source| ConfigError::Write {
        path: path.clone(),
        source,
    };

    let json = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut temp_file = tempfile::NamedTempFile::new_in(repo_root).map_err(write_error)?;
    temp_file
        .write_all(format!("{json}\n").as_bytes())
        .map_err(write_error)?;
    temp_file
        .persist(&path)
        .map_err(|e| write_error(e.error))?;

    Ok(path)
}

/// what `ensure_gitignored` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreUpdate {
    Created,
    Appended,
    AlreadyPresent,
}

/// make sure the config file, which holds an API key, is never committed
pub fn ensure_gitignored(repo_root: &Path) -> Result<GitignoreUpdate, ConfigError> {
    let path = repo_root.join(GITIGNORE_FILE_NAME);
    let write_error = |source| ConfigError::Write {
        path: path.clone(),
        source,
    };

    if !path.exists() {
        fs::write(&path, format!("{CONFIG_FILE_NAME}\n")).map_err(write_error)?;
        return Ok(GitignoreUpdate::Created);
    }

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let already_ignored = contents.lines().map(str::trim).any(|line| {
        line == CONFIG_FILE_NAME || line.strip_prefix('/') == Some(CONFIG_FILE_NAME)
    });
    if already_ignored {
        return Ok(GitignoreUpdate::AlreadyPresent);
    }

    let separator = if contents.is_empty() || contents.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(write_error)?;
    file.write_all(format!("{separator}{CONFIG_FILE_NAME}\n").as_bytes())
        .map_err(write_error)?;

    Ok(GitignoreUpdate::Appended)
}

#[cfg(test)]
mod tests;
