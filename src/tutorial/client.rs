//! Completion backends.
//!
//! [`CompletionBackend`] is the seam between the session driver and the
//! network. [`OpenAiClient`] talks to an OpenAI-compatible
//! `/chat/completions` endpoint over reqwest.

use async_trait::async_trait;

use crate::error::MentorResult;

use super::credential::Credential;
use super::model::{CompletionRequest, CompletionResponse};

/// Anything that can answer a chat-completion request.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> MentorResult<CompletionResponse>;
}

#[cfg(feature = "client")]
pub use http::OpenAiClient;

#[cfg(feature = "client")]
mod http {
    use async_trait::async_trait;
    use reqwest::{header, Client};

    use super::CompletionBackend;
    use crate::config::MentorConfig;
    use crate::error::{MentorError, MentorResult};
    use crate::tutorial::credential::Credential;
    use crate::tutorial::model::{CompletionRequest, CompletionResponse};

    /// Client for OpenAI-compatible chat-completion APIs.
    #[derive(Debug, Clone)]
    pub struct OpenAiClient {
        client: Client,
        url: String,
    }

    impl OpenAiClient {
        /// Creates a client posting to `{api_base_url}/chat/completions`.
        pub fn new(config: &MentorConfig) -> MentorResult<Self> {
            let client = Client::builder().build()?;
            Ok(Self {
                client,
                url: config.completions_url(),
            })
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    #[async_trait]
    impl CompletionBackend for OpenAiClient {
        /// POST /chat/completions
        async fn complete(
            &self,
            credential: &Credential,
            request: &CompletionRequest,
        ) -> MentorResult<CompletionResponse> {
            log::debug!(
                "POST {} (model {}, {} message(s))",
                self.url,
                request.model,
                request.messages.len()
            );
            let resp = self
                .client
                .post(&self.url)
                .header(header::AUTHORIZATION, credential.bearer())
                .json(request)
                .send()
                .await?;

            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let message = resp.text().await.unwrap_or_default();
                return Err(MentorError::api(status, message));
            }

            resp.json().await.map_err(Into::into)
        }
    }

}
