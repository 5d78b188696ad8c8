//! Sans-IO tutorial session state machine.
//!
//! `TutorialSession` owns the step list, the chat transcript, the cursor and a
//! single-slot request guard. It never talks to the network: `begin_*` hands
//! out a [`CompletionRequest`] and the caller reports back with
//! [`TutorialSession::complete`] or [`TutorialSession::fail`].
//!
//! # State transitions
//!
//! ```text
//!  Idle ──begin_start/begin_advance(fetch)──▶ Pending
//!  Pending ──complete──▶ Idle
//!  Pending ──fail / empty reply──▶ Failed
//!  Failed ──begin_start/begin_advance(fetch)──▶ Pending
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MentorConfig;
use crate::error::{MentorError, MentorResult};

use super::image::ImageAttachment;
use super::model::{ChatMessage, CompletionRequest, CompletionResponse, ContentPart, TutorialStep};
use super::prompt::{initial_request_text, CONTINUE_PROMPT, SYSTEM_PROMPT};

/// In-flight guard. At most one request exists per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RequestState {
    Idle,
    Pending,
    Failed { reason: String },
}

/// Outcome of asking for the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Advance {
    /// The step was already fetched; the cursor moved onto it.
    Cached { step: TutorialStep },
    /// The cursor is on the last step; this request fetches a new one.
    Fetch { request: CompletionRequest },
}

/// Tutorial state for one session.
#[derive(Debug, Clone)]
pub struct TutorialSession {
    id: Uuid,
    model: String,
    max_tokens: u32,
    steps: Vec<TutorialStep>,
    transcript: Vec<ChatMessage>,
    cursor: usize,
    state: RequestState,
    /// Transcript length to restore if the pending request fails.
    rollback_len: usize,
}

impl TutorialSession {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates an empty session using the model and token cap from `config`.
    pub fn new(config: &MentorConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            steps: Vec::new(),
            transcript: Vec::new(),
            cursor: 0,
            state: RequestState::Idle,
            rollback_len: 0,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn steps(&self) -> &[TutorialStep] {
        &self.steps
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Pending
    }

    pub fn is_started(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Step under the cursor, if any step exists.
    pub fn current_step(&self) -> Option<&TutorialStep> {
        self.steps.get(self.cursor)
    }

    /// True when the cursor sits on the last known step.
    pub fn at_last_step(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    // =========================================================================
    // REQUEST LIFECYCLE
    // =========================================================================

    /// Seeds the transcript and returns the opening request.
    ///
    /// Empty image attachments are skipped.
    pub fn begin_start(
        &mut self,
        description: &str,
        images: &[ImageAttachment],
    ) -> MentorResult<CompletionRequest> {
        self.ensure_not_pending()?;
        if self.is_started() {
            return Err(MentorError::AlreadyStarted);
        }
        // A whitespace-only description counts as missing.
        if description.trim().is_empty() && images.iter().all(ImageAttachment::is_empty) {
            return Err(MentorError::EmptyInput);
        }

        let mut parts = vec![ContentPart::text(initial_request_text(description))];
        parts.extend(
            images
                .iter()
                .filter_map(ImageAttachment::to_data_url)
                .map(ContentPart::image_url),
        );

        self.transcript = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user_parts(parts),
        ];
        self.rollback_len = 0;
        self.state = RequestState::Pending;

        log::debug!(
            "Session {}: starting with {} image(s)",
            self.id,
            self.transcript[1].content.image_count()
        );
        Ok(self.request())
    }

    /// Moves to the next step, fetching one when the cursor is on the last.
    pub fn begin_advance(&mut self) -> MentorResult<Advance> {
        self.ensure_not_pending()?;
        if !self.is_started() {
            return Err(MentorError::NotStarted);
        }

        if let Some(step) = self.step_forward() {
            return Ok(Advance::Cached { step });
        }

        self.rollback_len = self.transcript.len();
        self.transcript.push(ChatMessage::user(CONTINUE_PROMPT));
        self.state = RequestState::Pending;

        log::debug!(
            "Session {}: requesting step {} with {} transcript message(s)",
            self.id,
            self.steps.len() + 1,
            self.transcript.len()
        );
        Ok(Advance::Fetch {
            request: self.request(),
        })
    }

    /// Applies the reply to the pending request and returns the new step.
    pub fn complete(&mut self, response: &CompletionResponse) -> MentorResult<TutorialStep> {
        if !self.is_loading() {
            return Err(MentorError::NoRequestPending);
        }

        let content = match response.first_content() {
            Some(content) => content.to_string(),
            None => {
                self.fail("completion response contained no choices");
                return Err(MentorError::EmptyCompletion);
            }
        };

        let step = TutorialStep::new(self.next_ordinal(), content.clone());
        self.steps.push(step.clone());
        self.transcript.push(ChatMessage::assistant(content));
        self.cursor = self.steps.len() - 1;
        self.state = RequestState::Idle;

        log::info!("Session {}: received step {}", self.id, step.step);
        Ok(step)
    }

    /// Marks the pending request as failed and undoes its transcript entries.
    ///
    /// Does nothing unless a request is pending.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.is_loading() {
            return;
        }
        let reason = reason.into();
        log::warn!("Session {}: request failed: {}", self.id, reason);
        self.transcript.truncate(self.rollback_len);
        self.state = RequestState::Failed { reason };
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Moves onto an already fetched step without issuing a request.
    ///
    /// Returns `None` when the cursor is on the last step or a request is in flight.
    pub fn step_forward(&mut self) -> Option<TutorialStep> {
        if self.is_loading() || self.at_last_step() {
            return None;
        }
        self.cursor += 1;
        self.current_step().cloned()
    }

    /// Moves the cursor back one step, stopping at the first.
    pub fn retreat(&mut self) -> Option<&TutorialStep> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current_step()
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn ensure_not_pending(&self) -> MentorResult<()> {
        if self.is_loading() {
            return Err(MentorError::RequestInFlight);
        }
        Ok(())
    }

    fn next_ordinal(&self) -> u32 {
        u32::try_from(self.steps.len() + 1).unwrap_or(u32::MAX)
    }

    fn request(&self) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: self.transcript.clone(),
            max_tokens: self.max_tokens,
        }
    }
}
