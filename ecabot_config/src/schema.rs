use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use ecabot_core::{GenerationConfig, SessionSettings};
use ecabot_providers::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the Gemini API key. Takes precedence over
/// the config file.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AssistantConfig {
    /// Replaces the built-in ECA Heaven persona when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct GeminiConfig {
    #[serde(default = "GeminiConfig::default_model")]
    pub model: String,
    #[serde(default = "GeminiConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "GeminiConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            api_key: None,
        }
    }
}

impl GeminiConfig {
    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }
}

// Keeps the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load `~/ecabot/config.json`, falling back to defaults when absent.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = serde_json::from_str(&content)?;
        info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// The API key from the environment, else from the file, else empty.
    ///
    /// An empty key is passed through: the service rejects it and the
    /// session shows its fallback reply.
    #[must_use]
    pub fn api_key(&self) -> String {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.file_api_key().map(str::to_string))
            .unwrap_or_default()
    }

    /// The key from the config file, ignoring a blank value.
    #[must_use]
    pub fn file_api_key(&self) -> Option<&str> {
        self.providers
            .gemini
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        let settings = SessionSettings::default().with_generation(self.generation);
        match &self.assistant.system_prompt {
            Some(prompt) if !prompt.trim().is_empty() => settings.with_persona(prompt.clone()),
            _ => settings,
        }
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("ecabot"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::create_config_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Export your Gemini key: export {API_KEY_ENV}=...");
        println!("   2. Run 'ecabot chat' to start a conversation");
        println!();
        println!("🔧 Configuration options:");
        println!("   - assistant.system_prompt: replace the built-in persona");
        println!("   - generation.temperature / max_output_tokens: sampling settings");
        println!("   - providers.gemini.model / base_url / timeout_secs: endpoint settings");
        println!();
        Ok(())
    }

    /// Write the default template to `config_path`. Never includes a key.
    pub fn create_config_at(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(config_path, template)?;
        Ok(())
    }
}
