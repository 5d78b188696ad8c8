//! WASM bindings for the tutorial module.
//!
//! The browser performs the HTTP call itself: `beginStart` / `beginAdvance`
//! return the request body, and the page reports back with `complete` or
//! `fail`. The in-flight guard still lives on the Rust side.

use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

use crate::config::MentorConfig;
use crate::wasm::{js_result, to_js_value};
use super::image::ImageAttachment;
use super::markdown::code_blocks;
use super::model::CompletionResponse;
use super::session::TutorialSession;

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around TutorialSession.
#[wasm_bindgen]
pub struct JsTutorialSession {
    inner: TutorialSession,
    images: Vec<ImageAttachment>,
}

#[wasm_bindgen]
impl JsTutorialSession {
    /// Creates a session. `config` is an optional object with `model`,
    /// `max_tokens`, `api_base_url` and `debounce_ms`.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const session = new JsTutorialSession({ max_tokens: 500 });
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsTutorialSession, JsValue> {
        let config: MentorConfig = if config.is_undefined() || config.is_null() {
            MentorConfig::default()
        } else {
            from_value(config)?
        };
        Ok(JsTutorialSession {
            inner: TutorialSession::new(&config),
            images: Vec::new(),
        })
    }

    /// Stages an uploaded image for the opening request.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const bytes = new Uint8Array(await file.arrayBuffer());
    /// session.addImage(bytes, file.type);
    /// ```
    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, bytes: &[u8], mime: Option<String>) {
        let mut image = ImageAttachment::new(bytes.to_vec());
        image.mime = mime.filter(|m| !m.is_empty());
        self.images.push(image);
    }

    /// Drops all staged images.
    #[wasm_bindgen(js_name = clearImages)]
    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    /// Builds the opening request body to POST to `/chat/completions`.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const body = session.beginStart('a login page');
    /// const res = await fetch(url, { method: 'POST', headers, body: JSON.stringify(body) });
    /// session.complete(await res.json());
    /// ```
    #[wasm_bindgen(js_name = beginStart)]
    pub fn begin_start(&mut self, description: &str) -> Result<JsValue, JsValue> {
        let request = js_result!(self.inner.begin_start(description, &self.images))?;
        Ok(to_js_value(&request)?)
    }

    /// Returns `{ kind: 'cached', step }` or `{ kind: 'fetch', request }`.
    #[wasm_bindgen(js_name = beginAdvance)]
    pub fn begin_advance(&mut self) -> Result<JsValue, JsValue> {
        let advance = js_result!(self.inner.begin_advance())?;
        Ok(to_js_value(&advance)?)
    }

    /// Applies a chat-completion response body and returns the new step.
    #[wasm_bindgen]
    pub fn complete(&mut self, response: JsValue) -> Result<JsValue, JsValue> {
        let response: CompletionResponse = from_value(response)?;
        let step = js_result!(self.inner.complete(&response))?;
        Ok(to_js_value(&step)?)
    }

    /// Reports a failed request so the session can be retried.
    #[wasm_bindgen]
    pub fn fail(&mut self, reason: &str) {
        self.inner.fail(reason);
    }

    /// Moves back one step; returns the step now under the cursor or null.
    #[wasm_bindgen]
    pub fn retreat(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.retreat() {
            Some(step) => Ok(to_js_value(step)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// All steps fetched so far.
    #[wasm_bindgen]
    pub fn steps(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.steps())?)
    }

    /// Step under the cursor, or null.
    #[wasm_bindgen(js_name = currentStep)]
    pub fn current_step(&self) -> Result<JsValue, JsValue> {
        match self.inner.current_step() {
            Some(step) => Ok(to_js_value(step)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Fenced code blocks of the current step, for copy buttons.
    #[wasm_bindgen(js_name = currentCodeBlocks)]
    pub fn current_code_blocks(&self) -> Result<JsValue, JsValue> {
        let blocks = self
            .inner
            .current_step()
            .map(|step| code_blocks(&step.content))
            .unwrap_or_default();
        Ok(to_js_value(&blocks)?)
    }

    #[wasm_bindgen]
    pub fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    /// `{ state: 'idle' | 'pending' }` or `{ state: 'failed', reason }`.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.state())?)
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }
}
