//! Tutorial session module.
//!
//! Provides the step/transcript state machine, the completion backend seam and
//! the async driver that connects them.

pub mod client;
pub mod credential;
pub mod image;
pub mod markdown;
pub mod mentor;
pub mod model;
pub mod prompt;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use client::CompletionBackend;
pub use credential::{Credential, CredentialStore, MemoryCredentialStore};
pub use image::ImageAttachment;
pub use markdown::{code_blocks, CodeBlock};
pub use mentor::Mentor;
pub use model::{
    ChatMessage, CompletionRequest, CompletionResponse, ContentPart, MessageContent, Role,
    TutorialStep,
};
pub use session::{Advance, RequestState, TutorialSession};

#[cfg(feature = "client")]
pub use client::OpenAiClient;
#[cfg(feature = "client")]
pub use credential::FileCredentialStore;

#[cfg(feature = "wasm")]
pub use wasm::JsTutorialSession;
