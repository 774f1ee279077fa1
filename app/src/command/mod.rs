//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use ecabot_config::Config;
use ecabot_core::{Role, SessionController, Transcript, Turn};
use ecabot_providers::GeminiProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod ask;
mod chat;
mod info;
mod init;
mod version;

pub use ask::{AskInput, AskStrategy};
pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Load the config and open a fresh session against Gemini.
fn open_session(model: Option<String>) -> anyhow::Result<SessionController<GeminiProvider>> {
    let config = Config::load()?;
    let gemini = &config.providers.gemini;
    let model = model.unwrap_or_else(|| gemini.model.clone());

    info!("Using Gemini model {model} at {}", gemini.base_url);

    let provider = GeminiProvider::new(
        config.api_key(),
        Duration::from_secs(gemini.timeout_secs),
    )?
    .with_base_url(gemini.base_url.clone())
    .with_model(model);

    Ok(SessionController::new(
        Arc::new(provider),
        config.session_settings(),
    ))
}

/// Print the turns of `transcript` not yet shown, advancing `shown`.
fn render_new_turns(transcript: &Transcript, shown: &mut usize) {
    for turn in transcript.turns().iter().skip(*shown) {
        print_turn(turn);
    }
    *shown = transcript.len();
}

fn print_turn(turn: &Turn) {
    match turn.role {
        Role::Assistant => println!("\nECA Bot: {}\n", turn.text),
        Role::User => println!("You: {}", turn.text),
    }
}
