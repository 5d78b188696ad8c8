//! Live preview module.
//!
//! Provides the document compositor, its debounced buffer owner and the
//! settings editor.

pub mod compose;
pub mod compositor;
pub mod settings;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use compose::compose;
pub use compositor::PreviewCompositor;
pub use settings::{
    EditorSettings, HtmlSettings, QuickSetup, ResourceKind, ResourceSettings, SettingsEditor,
    QUICK_SETUPS, VIEWPORT_META,
};

#[cfg(feature = "wasm")]
pub use wasm::{JsPreviewCompositor, JsSettingsEditor};
