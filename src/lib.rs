//! UI Mentor - step-by-step website build tutorials with a live preview.
//!
//! The crate has two independent halves:
//!
//! - **Tutorial sessions**: a vision-capable chat-completion API turns
//!   screenshots and/or a description into numbered build steps. The session
//!   keeps the transcript, the steps and a cursor, and allows one request in
//!   flight at a time.
//! - **Live preview**: three code buffers (markup, styles, script) plus editor
//!   settings are composed into one HTML document after a short debounce.
//!
//! # Example
//!
//! ```rust
//! use uimentor::{CompletionResponse, MentorConfig, PreviewCompositor, TutorialSession};
//! use uimentor::tutorial::Advance;
//!
//! let config = MentorConfig::default();
//! let mut session = TutorialSession::new(&config);
//!
//! // Build the opening request; send it with any HTTP client.
//! let request = session.begin_start("a login page", &[]).unwrap();
//! assert_eq!(request.messages.len(), 2);
//!
//! // Feed the reply back in.
//! let step = session
//!     .complete(&CompletionResponse::from_text("Create `index.html`..."))
//!     .unwrap();
//! assert_eq!(step.step, 1);
//!
//! // On the last step, advancing asks for another one.
//! assert!(matches!(session.begin_advance().unwrap(), Advance::Fetch { .. }));
//!
//! // Meanwhile the preview recomposes once edits settle.
//! let mut preview = PreviewCompositor::new(Default::default(), config.debounce_ms);
//! preview.set_markup("<h1>Hello</h1>", 0);
//! assert!(preview.poll(100).is_none());
//! assert!(preview.poll(250).unwrap().contains("<h1>Hello</h1>"));
//! ```

pub mod config;
pub mod error;

// Tutorial module
pub mod tutorial;

// Preview module
pub mod preview;

#[cfg(feature = "wasm")]
mod wasm;

// Re-exports for convenience
pub use config::MentorConfig;
pub use error::{MentorError, MentorResult};
pub use preview::{compose, EditorSettings, PreviewCompositor, SettingsEditor};
pub use tutorial::{
    CompletionBackend, CompletionRequest, CompletionResponse, Credential, CredentialStore,
    ImageAttachment, Mentor, TutorialSession, TutorialStep,
};

#[cfg(feature = "client")]
pub use tutorial::{FileCredentialStore, OpenAiClient};

#[cfg(feature = "wasm")]
pub use preview::{JsPreviewCompositor, JsSettingsEditor};
#[cfg(feature = "wasm")]
pub use tutorial::JsTutorialSession;
