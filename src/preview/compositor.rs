//! Debounced live preview.
//!
//! `PreviewCompositor` owns the markup/styles/script buffers and the editor
//! settings. Every change pushes the recompose deadline out to
//! `now + debounce`; [`PreviewCompositor::poll`] recomposes once the deadline
//! has passed, so a burst of edits yields a single document.
//!
//! Time is passed in as milliseconds by the caller (a monotonic clock natively,
//! `performance.now()` in the browser).

use super::compose::compose;
use super::settings::EditorSettings;

/// The three code buffers plus settings, with a trailing-edge debounce.
#[derive(Debug, Clone)]
pub struct PreviewCompositor {
    markup: String,
    styles: String,
    script: String,
    settings: EditorSettings,
    debounce_ms: u64,
    /// When the pending recomposition may run.
    deadline: Option<u64>,
    document: String,
}

impl PreviewCompositor {
    /// Creates a compositor with empty buffers and composes the initial document.
    pub fn new(settings: EditorSettings, debounce_ms: u64) -> Self {
        let document = compose("", "", "", &settings);
        Self {
            markup: String::new(),
            styles: String::new(),
            script: String::new(),
            settings,
            debounce_ms,
            deadline: None,
            document,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn styles(&self) -> &str {
        &self.styles
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    /// Last composed document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// True while a recomposition is waiting for the quiet window.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Deadline of the pending recomposition, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    pub fn set_markup(&mut self, markup: impl Into<String>, now_ms: u64) {
        self.markup = markup.into();
        self.touch(now_ms);
    }

    pub fn set_styles(&mut self, styles: impl Into<String>, now_ms: u64) {
        self.styles = styles.into();
        self.touch(now_ms);
    }

    pub fn set_script(&mut self, script: impl Into<String>, now_ms: u64) {
        self.script = script.into();
        self.touch(now_ms);
    }

    /// Replaces the settings wholesale and schedules a recomposition.
    pub fn apply_settings(&mut self, settings: EditorSettings, now_ms: u64) {
        self.settings = settings;
        self.touch(now_ms);
    }

    /// Recomposes if the quiet window has elapsed. Returns the new document.
    pub fn poll(&mut self, now_ms: u64) -> Option<&str> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => Some(self.flush()),
            _ => None,
        }
    }

    /// Recomposes immediately, dropping any pending deadline.
    pub fn flush(&mut self) -> &str {
        self.deadline = None;
        self.document = compose(&self.markup, &self.styles, &self.script, &self.settings);
        log::debug!("Recomposed preview ({} bytes)", self.document.len());
        &self.document
    }

    fn touch(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.debounce_ms));
    }
}

impl Default for PreviewCompositor {
    fn default() -> Self {
        Self::new(EditorSettings::default(), crate::config::DEFAULT_DEBOUNCE_MS)
    }
}
