use ecabot_config::Config;

/// Strategy for initializing the configuration.
///
/// This strategy creates the default configuration file at `~/ecabot/config.json`.
/// The API key is never written there; it is read from the environment.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
