//! Async driver tying a [`TutorialSession`] to a backend and a credential store.
//!
//! The driver owns the session for the lifetime of one tutorial. Request-issuing
//! operations read the credential at call time; without one they return
//! `Ok(None)` and leave the session untouched.

use std::sync::Arc;

use crate::config::MentorConfig;
use crate::error::MentorResult;

use super::client::CompletionBackend;
use super::credential::{Credential, CredentialStore};
use super::image::ImageAttachment;
use super::model::{CompletionRequest, CompletionResponse, TutorialStep};
use super::session::{Advance, TutorialSession};

/// Session controller with I/O.
pub struct Mentor<B: CompletionBackend> {
    backend: B,
    credentials: Arc<dyn CredentialStore>,
    session: TutorialSession,
}

impl<B: CompletionBackend> Mentor<B> {
    pub fn new(backend: B, credentials: Arc<dyn CredentialStore>, config: &MentorConfig) -> Self {
        Self {
            backend,
            credentials,
            session: TutorialSession::new(config),
        }
    }

    pub fn session(&self) -> &TutorialSession {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Issues the opening request and returns step 1.
    pub async fn start(
        &mut self,
        description: &str,
        images: &[ImageAttachment],
    ) -> MentorResult<Option<TutorialStep>> {
        let Some(credential) = self.credential()? else {
            return Ok(None);
        };
        let request = self.session.begin_start(description, images)?;
        self.send(&credential, request).await.map(Some)
    }

    /// Moves to the next step, fetching it when the cursor is on the last one.
    ///
    /// Only the fetch needs a credential; moving onto a known step does not.
    pub async fn advance(&mut self) -> MentorResult<Option<TutorialStep>> {
        if let Some(step) = self.session.step_forward() {
            return Ok(Some(step));
        }
        let Some(credential) = self.credential()? else {
            return Ok(None);
        };
        match self.session.begin_advance()? {
            Advance::Cached { step } => Ok(Some(step)),
            Advance::Fetch { request } => self.send(&credential, request).await.map(Some),
        }
    }

    /// Moves back one step. Never issues a request.
    pub fn retreat(&mut self) -> Option<TutorialStep> {
        self.session.retreat().cloned()
    }

    fn credential(&self) -> MentorResult<Option<Credential>> {
        let credential = self.credentials.load()?;
        if credential.is_none() {
            log::debug!("No API credential stored; ignoring request");
        }
        Ok(credential)
    }

    async fn send(
        &mut self,
        credential: &Credential,
        request: CompletionRequest,
    ) -> MentorResult<TutorialStep> {
        let mut pending = PendingRequest {
            session: &mut self.session,
            settled: false,
        };
        let result = self.backend.complete(credential, &request).await;
        pending.settle(result)
    }
}

/// Fails the session's in-flight request if dropped before it settles, so a
/// cancelled `start`/`advance` future leaves the session retryable.
struct PendingRequest<'a> {
    session: &'a mut TutorialSession,
    settled: bool,
}

impl PendingRequest<'_> {
    fn settle(&mut self, result: MentorResult<CompletionResponse>) -> MentorResult<TutorialStep> {
        self.settled = true;
        match result {
            Ok(response) => self.session.complete(&response),
            Err(err) => {
                self.session.fail(err.to_string());
                Err(err)
            }
        }
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.fail("request cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::MentorError;
    use crate::tutorial::credential::MemoryCredentialStore;
    use crate::tutorial::session::RequestState;

    /// Backend that replays canned replies and records what it was sent.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<MentorResult<CompletionResponse>>>,
        requests: Mutex<Vec<CompletionRequest>>,
        stalls: Mutex<usize>,
    }

    impl ScriptedBackend {
        fn with_replies(replies: Vec<MentorResult<CompletionResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                stalls: Mutex::new(0),
            }
        }

        /// Makes the next `calls` requests hang instead of replying.
        fn stalling(self, calls: usize) -> Self {
            *self.stalls.lock().unwrap() = calls;
            self
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(
            &self,
            credential: &Credential,
            request: &CompletionRequest,
        ) -> MentorResult<CompletionResponse> {
            assert_eq!(credential.expose(), "sk-test");
            self.requests.lock().unwrap().push(request.clone());
            let stall = {
                let mut stalls = self.stalls.lock().unwrap();
                let stall = *stalls > 0;
                if stall {
                    *stalls -= 1;
                }
                stall
            };
            if stall {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(MentorError::http("no scripted reply")))
        }
    }

    fn reply(text: &str) -> MentorResult<CompletionResponse> {
        Ok(CompletionResponse::from_text(text))
    }

    fn mentor_with(replies: Vec<MentorResult<CompletionResponse>>) -> Mentor<ScriptedBackend> {
        mentor_on(ScriptedBackend::with_replies(replies))
    }

    fn mentor_on(backend: ScriptedBackend) -> Mentor<ScriptedBackend> {
        let store = MemoryCredentialStore::with_credential(Credential::new("sk-test").unwrap());
        Mentor::new(backend, Arc::new(store), &MentorConfig::default())
    }

    #[tokio::test]
    async fn test_start_and_advance() {
        let mut mentor = mentor_with(vec![reply("step one"), reply("step two")]);

        let step = mentor.start("a login page", &[]).await.unwrap().unwrap();
        assert_eq!(step.step, 1);
        assert_eq!(mentor.backend().last_request().messages.len(), 2);

        let step = mentor.advance().await.unwrap().unwrap();
        assert_eq!(step.step, 2);
        assert_eq!(step.content, "step two");
        assert_eq!(mentor.backend().last_request().messages.len(), 4);
        assert_eq!(mentor.session().transcript().len(), 5);
        assert_eq!(mentor.backend().calls(), 2);
    }

    #[tokio::test]
    async fn test_advance_over_known_steps_makes_no_request() {
        let mut mentor = mentor_with(vec![reply("1"), reply("2"), reply("3")]);
        mentor.start("a blog", &[]).await.unwrap();
        mentor.advance().await.unwrap();
        mentor.advance().await.unwrap();
        assert_eq!(mentor.backend().calls(), 3);

        assert_eq!(mentor.retreat().unwrap().step, 2);
        assert_eq!(mentor.retreat().unwrap().step, 1);
        assert_eq!(mentor.retreat().unwrap().step, 1);

        assert_eq!(mentor.advance().await.unwrap().unwrap().step, 2);
        assert_eq!(mentor.advance().await.unwrap().unwrap().step, 3);
        assert_eq!(mentor.backend().calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_is_a_no_op() {
        let mut mentor = Mentor::new(
            ScriptedBackend::with_replies(vec![reply("never")]),
            Arc::new(MemoryCredentialStore::new()),
            &MentorConfig::default(),
        );

        assert_eq!(mentor.start("a shop", &[]).await.unwrap(), None);
        assert_eq!(mentor.advance().await.unwrap(), None);
        assert_eq!(mentor.backend().calls(), 0);
        assert!(mentor.session().transcript().is_empty());
        assert_eq!(*mentor.session().state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_and_allows_retry() {
        let mut mentor = mentor_with(vec![
            reply("1"),
            Err(MentorError::api(500, "upstream exploded")),
            reply("2"),
        ]);
        mentor.start("a portfolio", &[]).await.unwrap();

        let err = mentor.advance().await.unwrap_err();
        assert!(matches!(err, MentorError::Api { status: 500, .. }));
        assert!(matches!(
            mentor.session().state(),
            RequestState::Failed { .. }
        ));
        assert_eq!(mentor.session().transcript().len(), 3);

        let step = mentor.advance().await.unwrap().unwrap();
        assert_eq!(step.step, 2);
        assert_eq!(*mentor.session().state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_request() {
        let mut mentor = mentor_with(vec![]);
        let err = mentor.start("", &[]).await.unwrap_err();
        assert!(matches!(err, MentorError::EmptyInput));
        assert_eq!(mentor.backend().calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_start_can_be_retried() {
        let mut mentor = mentor_on(ScriptedBackend::with_replies(vec![reply("1")]).stalling(1));

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), mentor.start("a blog", &[])).await;
        assert!(timed_out.is_err());
        assert!(matches!(
            mentor.session().state(),
            RequestState::Failed { .. }
        ));
        assert!(mentor.session().transcript().is_empty());

        let step = mentor.start("a blog", &[]).await.unwrap().unwrap();
        assert_eq!(step.step, 1);
        assert_eq!(*mentor.session().state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_advance_can_be_retried() {
        let mut mentor = mentor_with(vec![reply("1"), reply("2")]);
        mentor.start("a blog", &[]).await.unwrap();
        *mentor.backend().stalls.lock().unwrap() = 1;

        let timed_out = tokio::time::timeout(Duration::from_millis(20), mentor.advance()).await;
        assert!(timed_out.is_err());
        assert!(!mentor.session().is_loading());
        assert_eq!(mentor.session().transcript().len(), 3);

        let step = mentor.advance().await.unwrap().unwrap();
        assert_eq!(step.step, 2);
        assert_eq!(step.content, "2");
        assert_eq!(mentor.backend().calls(), 3);
    }
}
