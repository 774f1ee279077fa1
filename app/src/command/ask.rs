use super::open_session;

/// Input parameters for the Ask command strategy.
#[derive(Debug, Clone)]
pub struct AskInput {
    /// The message to send
    pub message: String,
    /// Optional model override
    pub model: Option<String>,
}

/// Strategy for a single exchange: send one message, print the reply.
///
/// Failures still print the fallback reply, exactly as the chat would show
/// it.
#[derive(Debug, Clone, Copy)]
pub struct AskStrategy;

impl super::CommandStrategy for AskStrategy {
    type Input = AskInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut session = open_session(input.model)?;

        let Some(handle) = session.submit(&input.message) else {
            anyhow::bail!("Message must not be empty");
        };
        handle.settled().await;

        if let Some(reply) = session.snapshot().last() {
            println!("{}", reply.text);
        }
        Ok(())
    }
}
