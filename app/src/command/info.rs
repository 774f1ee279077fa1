use ecabot_config::{API_KEY_ENV, Config};

/// Strategy for displaying the effective configuration.
///
/// The API key itself is never printed, only where it comes from.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let gemini = &config.providers.gemini;

        println!("=== ecabot Configuration ===\n");

        println!("API Key:");
        let from_env = std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty());
        let source = if from_env {
            format!("set (from {API_KEY_ENV})")
        } else if config.file_api_key().is_some() {
            "set (from config file)".to_string()
        } else {
            "not set, replies will use the fallback message".to_string()
        };
        println!("  Gemini: {source}");
        println!();

        println!("Gemini:");
        println!("  Model: {}", gemini.model);
        println!("  Base URL: {}", gemini.base_url);
        println!("  Timeout: {}s", gemini.timeout_secs);
        println!();

        println!("Generation:");
        println!("  Temperature: {}", config.generation.temperature);
        println!("  Max Output Tokens: {}", config.generation.max_output_tokens);
        println!();

        println!("Assistant:");
        match &config.assistant.system_prompt {
            Some(prompt) => println!("  System Prompt: custom ({} chars)", prompt.len()),
            None => println!("  System Prompt: built-in ECA Heaven persona"),
        }

        Ok(())
    }
}
