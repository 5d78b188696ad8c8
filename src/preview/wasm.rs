//! WASM bindings for the preview module.

use js_sys::Array;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::error::MentorError;
use crate::wasm::{js_result, to_js_value};
use super::compositor::PreviewCompositor;
use super::settings::{EditorSettings, ResourceKind, SettingsEditor, QUICK_SETUPS};

fn parse_kind(kind: &str) -> Result<ResourceKind, JsValue> {
    match kind {
        "css" => Ok(ResourceKind::Css),
        "js" => Ok(ResourceKind::Js),
        other => Err(JsValue::from_str(&format!(
            "Unknown resource kind '{}', expected 'css' or 'js'",
            other
        ))),
    }
}

fn settings_from_js(settings: JsValue) -> Result<EditorSettings, JsValue> {
    if settings.is_undefined() || settings.is_null() {
        Ok(EditorSettings::default())
    } else {
        Ok(from_value(settings)?)
    }
}

// =============================================================================
// COMPOSITOR
// =============================================================================

/// JavaScript-friendly wrapper around PreviewCompositor.
///
/// # Example (JavaScript)
/// ```js
/// const preview = new JsPreviewCompositor(null, 250);
/// editor.onChange((html) => preview.setMarkup(html, performance.now()));
/// setInterval(() => {
///   const doc = preview.poll(performance.now());
///   if (doc !== undefined) iframe.srcdoc = doc;
/// }, 50);
/// ```
#[wasm_bindgen]
pub struct JsPreviewCompositor {
    inner: PreviewCompositor,
}

#[wasm_bindgen]
impl JsPreviewCompositor {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue, debounce_ms: Option<u32>) -> Result<JsPreviewCompositor, JsValue> {
        let settings = settings_from_js(settings)?;
        let debounce_ms = debounce_ms.map(u64::from).unwrap_or(DEFAULT_DEBOUNCE_MS);
        Ok(JsPreviewCompositor {
            inner: PreviewCompositor::new(settings, debounce_ms),
        })
    }

    #[wasm_bindgen(js_name = setMarkup)]
    pub fn set_markup(&mut self, markup: String, now_ms: f64) {
        self.inner.set_markup(markup, now_ms as u64);
    }

    #[wasm_bindgen(js_name = setStyles)]
    pub fn set_styles(&mut self, styles: String, now_ms: f64) {
        self.inner.set_styles(styles, now_ms as u64);
    }

    #[wasm_bindgen(js_name = setScript)]
    pub fn set_script(&mut self, script: String, now_ms: f64) {
        self.inner.set_script(script, now_ms as u64);
    }

    /// Replaces the settings with an object shaped like `EditorSettings`.
    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&mut self, settings: JsValue, now_ms: f64) -> Result<(), JsValue> {
        let settings = settings_from_js(settings)?;
        self.inner.apply_settings(settings, now_ms as u64);
        Ok(())
    }

    /// Returns the new document once the quiet window has passed, else undefined.
    #[wasm_bindgen]
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        self.inner.poll(now_ms as u64).map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn flush(&mut self) -> String {
        self.inner.flush().to_string()
    }

    #[wasm_bindgen]
    pub fn document(&self) -> String {
        self.inner.document().to_string()
    }

    #[wasm_bindgen]
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.settings())?)
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }
}

// =============================================================================
// SETTINGS EDITOR
// =============================================================================

/// JavaScript-friendly wrapper around SettingsEditor.
///
/// # Example (JavaScript)
/// ```js
/// const editor = new JsSettingsEditor(preview.settings());
/// editor.quickSetup(0); // Tailwind CSS
/// preview.applySettings(editor.save(), performance.now());
/// ```
#[wasm_bindgen]
pub struct JsSettingsEditor {
    inner: SettingsEditor,
}

#[wasm_bindgen]
impl JsSettingsEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<JsSettingsEditor, JsValue> {
        let settings = settings_from_js(settings)?;
        Ok(JsSettingsEditor {
            inner: SettingsEditor::from_settings(&settings),
        })
    }

    /// Re-syncs the draft from the owner's settings.
    #[wasm_bindgen]
    pub fn sync(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings = settings_from_js(settings)?;
        self.inner.sync(&settings);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn draft(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.draft())?)
    }

    #[wasm_bindgen(js_name = setClassName)]
    pub fn set_class_name(&mut self, class_name: String) {
        self.inner.set_class_name(class_name);
    }

    #[wasm_bindgen(js_name = setBodyClassName)]
    pub fn set_body_class_name(&mut self, class_name: String) {
        self.inner.set_body_class_name(class_name);
    }

    #[wasm_bindgen(js_name = setHeadTags)]
    pub fn set_head_tags(&mut self, head_tags: String) {
        self.inner.set_head_tags(head_tags);
    }

    #[wasm_bindgen(js_name = insertViewportMeta)]
    pub fn insert_viewport_meta(&mut self) {
        self.inner.insert_viewport_meta();
    }

    /// Appends a blank entry to the `'css'` or `'js'` list.
    #[wasm_bindgen(js_name = addLink)]
    pub fn add_link(&mut self, kind: &str) -> Result<(), JsValue> {
        self.inner.add_link(parse_kind(kind)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setLink)]
    pub fn set_link(&mut self, kind: &str, index: usize, link: String) -> Result<(), JsValue> {
        js_result!(self.inner.set_link(parse_kind(kind)?, index, link))
    }

    #[wasm_bindgen(js_name = removeLink)]
    pub fn remove_link(&mut self, kind: &str, index: usize) -> Result<String, JsValue> {
        js_result!(self.inner.remove_link(parse_kind(kind)?, index))
    }

    /// Labels of the quick setup shortcuts, indexed for `quickSetup`.
    #[wasm_bindgen(js_name = quickSetupLabels)]
    pub fn quick_setup_labels() -> Array {
        let array = Array::new();
        for setup in QUICK_SETUPS {
            array.push(&JsValue::from_str(setup.label));
        }
        array
    }

    #[wasm_bindgen(js_name = quickSetup)]
    pub fn quick_setup(&mut self, index: usize) -> Result<(), JsValue> {
        let setup = QUICK_SETUPS
            .get(index)
            .ok_or_else(|| MentorError::index_out_of_bounds(index, QUICK_SETUPS.len()))?;
        self.inner.apply_quick_setup(setup);
        Ok(())
    }

    /// Returns the full draft for the owner to store.
    #[wasm_bindgen]
    pub fn save(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner.save())?)
    }

    #[wasm_bindgen]
    pub fn cancel(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings = settings_from_js(settings)?;
        self.inner.cancel(&settings);
        Ok(())
    }
}
