//! Interactive chat: the terminal rendering of one widget session.

use std::io::Write;

use tracing::info;

use super::{open_session, render_new_turns};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional model override
    pub model: Option<String>,
}

/// Strategy for executing the Chat command.
///
/// - Opens one session seeded with the greeting
/// - Offers the quick questions until the first exchange
/// - Sends one message at a time and renders the reply when it settles
/// - Ctrl+C while waiting closes the session and drops the late reply
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut session = open_session(input.model)?;
        let mut updates = session.subscribe();
        let mut shown = 0;

        println!("=== ECA Bot ===");
        println!("Type 'exit' or 'quit' to leave. Press Enter on an empty line to send the draft.");
        render_new_turns(&updates.borrow_and_update(), &mut shown);

        loop {
            print_suggestions(session.suggestions());
            if !session.draft().is_empty() {
                println!("(draft: {})", session.draft());
            }
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = read_line()? else {
                break;
            };
            let line = line.trim();

            if matches!(line, "exit" | "quit" | "q") {
                break;
            }

            let handle = if let Some(pick) = quick_question_pick(line) {
                select_suggestion(&mut session, pick);
                continue;
            } else if line.is_empty() {
                session.submit_draft()
            } else {
                session.submit(line)
            };

            let Some(handle) = handle else {
                continue;
            };
            render_new_turns(&updates.borrow_and_update(), &mut shown);
            println!("ECA Bot is typing...");

            tokio::select! {
                () = handle.settled() => {}
                _ = tokio::signal::ctrl_c() => {
                    println!("\nClosing session.");
                    break;
                }
            }
            render_new_turns(&updates.borrow_and_update(), &mut shown);
        }

        info!("Conversation ended: {} turns", session.snapshot().len());
        session.close();
        Ok(())
    }
}

fn print_suggestions(suggestions: &[&str]) {
    if suggestions.is_empty() {
        return;
    }
    println!("Quick questions:");
    for (i, question) in suggestions.iter().enumerate() {
        println!("  /{} {question}", i + 1);
    }
}

/// `/N` picks the N-th quick question. Any other input starting with `/` is
/// an ordinary message.
fn quick_question_pick(line: &str) -> Option<usize> {
    let digits = line.strip_prefix('/')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn select_suggestion<P>(session: &mut ecabot_core::SessionController<P>, pick: usize)
where
    P: ?Sized,
{
    let chosen = pick
        .checked_sub(1)
        .and_then(|i| session.suggestions().get(i).copied());

    match chosen {
        Some(question) if session.select_suggestion(question) => {
            println!("(draft: {question}) press Enter to send");
        }
        _ => println!("No quick question /{pick}"),
    }
}

/// Read one line from stdin; `None` at end of input.
fn read_line() -> std::io::Result<Option<String>> {
    let mut input = String::new();
    let read = std::io::stdin().read_line(&mut input)?;
    Ok((read > 0).then_some(input))
}

#[cfg(test)]
mod tests {
    use super::quick_question_pick;

    #[test]
    fn only_slash_digits_pick_a_question() {
        assert_eq!(quick_question_pick("/1"), Some(1));
        assert_eq!(quick_question_pick("/4"), Some(4));
        assert_eq!(quick_question_pick("/9"), Some(9));
        assert_eq!(quick_question_pick("/"), None);
        assert_eq!(quick_question_pick("/help me"), None);
        assert_eq!(quick_question_pick("/2x"), None);
        assert_eq!(quick_question_pick("where are you?"), None);
    }
}
