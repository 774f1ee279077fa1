//! Session controller: stages user input, runs the single in-flight
//! completion request and turns its outcome into a transcript reply.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::prompt::{
    DEFAULT_PERSONA, FALLBACK_REPLY, SUGGESTED_PROMPTS, build_prompt, is_suggestion,
};
use crate::{
    CompletionProvider, CompletionRequest, GenerationConfig, Transcript, TranscriptStore, Turn,
};

/// Per-session settings for building outbound requests.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub persona: String,
    pub generation: GenerationConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub fn with_persona(mut self, persona: String) -> Self {
        self.persona = persona;
        self
    }

    #[must_use]
    pub const fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

/// Handle to an accepted submit. Awaiting it waits for the reply turn.
#[derive(Debug)]
pub struct ReplyHandle {
    task: JoinHandle<()>,
}

impl ReplyHandle {
    /// Wait until the request has settled (or was discarded on teardown).
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            warn!("Reply task ended abnormally: {e}");
        }
    }
}

/// One chat session, created when the widget opens and dropped when it
/// closes.
///
/// The pending flag in the transcript is the only mutual exclusion: while
/// it is set, [`submit`](Self::submit) is a no-op.
pub struct SessionController<P: ?Sized = dyn CompletionProvider> {
    id: Uuid,
    provider: Arc<P>,
    settings: SessionSettings,
    store: TranscriptStore,
    draft: String,
    cancel: CancellationToken,
}

impl<P> SessionController<P>
where
    P: CompletionProvider + ?Sized + 'static,
{
    pub fn new(provider: Arc<P>, settings: SessionSettings) -> Self {
        let id = Uuid::now_v7();
        info!(session_id = %id, provider = provider.name(), "Opening chat session");
        Self {
            id,
            provider,
            settings,
            store: TranscriptStore::new(),
            draft: String::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Send `raw_text` as the next user turn.
    ///
    /// Returns `None` without touching the transcript when the trimmed text
    /// is empty or a request is already pending. Must be called from within
    /// a tokio runtime.
    pub fn submit(&mut self, raw_text: &str) -> Option<ReplyHandle> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!(session_id = %self.id, "Ignoring empty submit");
            return None;
        }
        if !self.store.begin_request(Turn::user(text)) {
            debug!(session_id = %self.id, "Request already pending, ignoring submit");
            return None;
        }
        self.draft.clear();

        let request = CompletionRequest {
            prompt: build_prompt(&self.settings.persona, text),
            generation: self.settings.generation,
        };
        info!(
            session_id = %self.id,
            turns = self.store.len(),
            "Dispatching completion request"
        );

        let task = tokio::spawn(run_completion(
            self.id,
            Arc::clone(&self.provider),
            request,
            self.store.clone(),
            self.cancel.clone(),
        ));
        Some(ReplyHandle { task })
    }

    /// Submit whatever is currently in the draft.
    pub fn submit_draft(&mut self) -> Option<ReplyHandle> {
        let draft = self.draft.clone();
        self.submit(&draft)
    }
}

impl<P: ?Sized> SessionController<P> {
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Quick questions to offer; empty once the first exchange has started.
    #[must_use]
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.store.is_cold_start() {
            &SUGGESTED_PROMPTS
        } else {
            &[]
        }
    }

    /// Copy a quick question into the draft. Never sends anything.
    ///
    /// Only has an effect at cold start and for one of the listed questions.
    pub fn select_suggestion(&mut self, text: &str) -> bool {
        if !self.store.is_cold_start() || !is_suggestion(text) {
            return false;
        }
        self.draft = text.to_string();
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.store.is_pending()
    }

    #[must_use]
    pub fn snapshot(&self) -> Transcript {
        self.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.store.subscribe()
    }

    /// Close the session; a reply still in flight is discarded.
    pub fn close(self) {
        drop(self);
    }
}

impl<P: ?Sized> Drop for SessionController<P> {
    fn drop(&mut self) {
        debug!(session_id = %self.id, "Closing chat session");
        self.store.close();
        self.cancel.cancel();
    }
}

/// Run one completion and settle the pending request with its outcome.
///
/// Successful text is appended verbatim. A reply that is blank after trimming
/// counts as a failure, so every assistant turn has visible text. Failures
/// become [`FALLBACK_REPLY`]. Nothing is appended once the session is closed.
async fn run_completion<P>(
    session_id: Uuid,
    provider: Arc<P>,
    request: CompletionRequest,
    store: TranscriptStore,
    cancel: CancellationToken,
) where
    P: CompletionProvider + ?Sized,
{
    let outcome = tokio::select! {
        biased;

        () = cancel.cancelled() => {
            info!(%session_id, "Session closed, discarding pending reply");
            return;
        }

        result = provider.complete(&request) => result,
    };

    let reply = match outcome {
        Ok(text) if !text.trim().is_empty() => {
            info!(%session_id, len = text.len(), "Received completion");
            text
        }
        Ok(_) => {
            warn!(%session_id, "Completion was empty, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            warn!(%session_id, kind = e.kind(), "Completion failed: {e}");
            FALLBACK_REPLY.to_string()
        }
    };

    if !store.settle(Turn::assistant(reply)) {
        debug!(%session_id, "Session closed while reply was being prepared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompletionError;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl CompletionProvider for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            Ok(request.prompt.clone())
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn controller() -> SessionController<Echo> {
        let settings = SessionSettings::default().with_persona("P".to_string());
        SessionController::new(Arc::new(Echo), settings)
    }

    #[test]
    fn suggestion_fills_draft_without_sending() {
        let mut session = controller();

        assert_eq!(session.suggestions().len(), 4);
        assert!(session.select_suggestion("What are the class timings?"));
        assert_eq!(session.draft(), "What are the class timings?");
        assert_eq!(session.snapshot().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn unknown_suggestion_is_ignored() {
        let mut session = controller();
        session.set_draft("typed");

        assert!(!session.select_suggestion("Something else"));
        assert_eq!(session.draft(), "typed");
    }

    #[tokio::test]
    async fn only_latest_user_turn_is_sent() {
        let mut session = controller();

        let first = session.submit("first");
        assert!(first.is_some());
        if let Some(handle) = first {
            handle.settled().await;
        }
        if let Some(handle) = session.submit("second") {
            handle.settled().await;
        }

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(
            snapshot.last().map(|t| t.text.as_str()),
            Some("System: P\n\nUser: second")
        );
    }

    #[tokio::test]
    async fn submit_draft_clears_draft() {
        let mut session = controller();
        session.set_draft("  hello  ");

        let handle = session.submit_draft();
        assert!(handle.is_some());
        assert_eq!(session.draft(), "");
        assert_eq!(session.snapshot().turns()[1], Turn::user("hello"));
    }
}
