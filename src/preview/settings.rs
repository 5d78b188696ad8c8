//! Editor settings and the settings editor draft.
//!
//! Serialized field names follow the browser shape (`className`,
//! `externalLinks`, ...) so settings can cross the wasm boundary unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{MentorError, MentorResult};

// =============================================================================
// SETTINGS
// =============================================================================

/// Classes and head markup for the composed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlSettings {
    /// Class attribute of `<html>`.
    pub class_name: String,
    /// Class attribute of `<body>`.
    pub body_class_name: String,
    /// Raw markup injected at the top of `<head>`.
    pub head_tags: String,
}

/// Ordered external resource URLs. Blank entries are allowed and skipped on compose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceSettings {
    pub external_links: Vec<String>,
}

impl Default for ResourceSettings {
    /// One blank entry, ready to be filled in.
    fn default() -> Self {
        Self {
            external_links: vec![String::new()],
        }
    }
}

impl ResourceSettings {
    /// Non-blank links in list order.
    pub fn active_links(&self) -> impl Iterator<Item = &str> {
        self.external_links
            .iter()
            .map(String::as_str)
            .filter(|link| !is_blank(link))
    }
}

/// Everything the compositor needs besides the three code buffers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorSettings {
    pub html: HtmlSettings,
    pub css: ResourceSettings,
    pub js: ResourceSettings,
}

impl EditorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self, kind: ResourceKind) -> &[String] {
        &self.resources(kind).external_links
    }

    fn resources(&self, kind: ResourceKind) -> &ResourceSettings {
        match kind {
            ResourceKind::Css => &self.css,
            ResourceKind::Js => &self.js,
        }
    }

    fn resources_mut(&mut self, kind: ResourceKind) -> &mut ResourceSettings {
        match kind {
            ResourceKind::Css => &mut self.css,
            ResourceKind::Js => &mut self.js,
        }
    }
}

/// Which external-link list an operation targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Css,
    Js,
}

/// Whitespace-only entries count as blank, not just the empty string.
pub(crate) fn is_blank(link: &str) -> bool {
    link.trim().is_empty()
}

// =============================================================================
// QUICK SETUP
// =============================================================================

/// A shortcut that appends one known external resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSetup {
    pub kind: ResourceKind,
    pub link: &'static str,
    pub label: &'static str,
}

pub const QUICK_SETUPS: &[QuickSetup] = &[
    QuickSetup {
        kind: ResourceKind::Css,
        link: "https://cdn.tailwindcss.com",
        label: "Add Tailwind CSS",
    },
    QuickSetup {
        kind: ResourceKind::Js,
        link: "https://unpkg.com/react@18/umd/react.development.js",
        label: "Add React 18 (Dev)",
    },
    QuickSetup {
        kind: ResourceKind::Js,
        link: "https://unpkg.com/react-dom@18/umd/react-dom.development.js",
        label: "Add ReactDOM 18 (Dev)",
    },
    QuickSetup {
        kind: ResourceKind::Js,
        link: "https://unpkg.com/react@18/umd/react.production.min.js",
        label: "Add React 18 (Prod)",
    },
    QuickSetup {
        kind: ResourceKind::Js,
        link: "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js",
        label: "Add ReactDOM 18 (Prod)",
    },
];

/// Charset and viewport tags offered for the head section.
pub const VIEWPORT_META: &str = "<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n";

// =============================================================================
// SETTINGS EDITOR
// =============================================================================

/// Local draft of [`EditorSettings`].
///
/// Edits stay in the draft until [`SettingsEditor::save`] hands the whole
/// object back to its owner. Syncing from the owner drops blank links from
/// the draft; the owner's copy keeps whatever was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEditor {
    draft: EditorSettings,
}

impl SettingsEditor {
    /// Opens an editor over `settings`.
    pub fn from_settings(settings: &EditorSettings) -> Self {
        let mut editor = Self {
            draft: EditorSettings::default(),
        };
        editor.sync(settings);
        editor
    }

    /// Replaces the draft with `settings`, minus blank links.
    pub fn sync(&mut self, settings: &EditorSettings) {
        self.draft = EditorSettings {
            html: settings.html.clone(),
            css: ResourceSettings {
                external_links: settings.css.active_links().map(str::to_string).collect(),
            },
            js: ResourceSettings {
                external_links: settings.js.active_links().map(str::to_string).collect(),
            },
        };
    }

    pub fn draft(&self) -> &EditorSettings {
        &self.draft
    }

    // =========================================================================
    // HTML
    // =========================================================================

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.draft.html.class_name = class_name.into();
    }

    pub fn set_body_class_name(&mut self, class_name: impl Into<String>) {
        self.draft.html.body_class_name = class_name.into();
    }

    pub fn set_head_tags(&mut self, head_tags: impl Into<String>) {
        self.draft.html.head_tags = head_tags.into();
    }

    /// Prepends the charset and viewport meta tags to the head markup.
    pub fn insert_viewport_meta(&mut self) {
        self.draft.html.head_tags = format!("{}{}", VIEWPORT_META, self.draft.html.head_tags);
    }

    // =========================================================================
    // EXTERNAL LINKS
    // =========================================================================

    /// Appends a blank entry.
    pub fn add_link(&mut self, kind: ResourceKind) {
        self.draft.resources_mut(kind).external_links.push(String::new());
    }

    /// Appends `link` as-is.
    pub fn push_link(&mut self, kind: ResourceKind, link: impl Into<String>) {
        self.draft.resources_mut(kind).external_links.push(link.into());
    }

    /// Replaces the entry at `index`.
    pub fn set_link(
        &mut self,
        kind: ResourceKind,
        index: usize,
        link: impl Into<String>,
    ) -> MentorResult<()> {
        let links = &mut self.draft.resources_mut(kind).external_links;
        let length = links.len();
        let slot = links
            .get_mut(index)
            .ok_or_else(|| MentorError::index_out_of_bounds(index, length))?;
        *slot = link.into();
        Ok(())
    }

    /// Removes the entry at `index`, shifting later entries down.
    pub fn remove_link(&mut self, kind: ResourceKind, index: usize) -> MentorResult<String> {
        let links = &mut self.draft.resources_mut(kind).external_links;
        if index >= links.len() {
            return Err(MentorError::index_out_of_bounds(index, links.len()));
        }
        Ok(links.remove(index))
    }

    pub fn apply_quick_setup(&mut self, setup: &QuickSetup) {
        self.push_link(setup.kind, setup.link);
    }

    // =========================================================================
    // SAVE / CANCEL
    // =========================================================================

    /// Returns the full draft for the owner to store. Blank entries are kept.
    pub fn save(&self) -> EditorSettings {
        self.draft.clone()
    }

    /// Discards local edits by re-syncing from the owner's settings.
    pub fn cancel(&mut self, settings: &EditorSettings) {
        self.sync(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_have_one_blank_link() {
        let settings = EditorSettings::default();
        assert_eq!(settings.css.external_links, vec![String::new()]);
        assert_eq!(settings.js.external_links, vec![String::new()]);
        assert_eq!(settings.css.active_links().count(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(EditorSettings::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "html": { "className": "", "bodyClassName": "", "headTags": "" },
                "css": { "externalLinks": [""] },
                "js": { "externalLinks": [""] }
            })
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "css": { "externalLinks": ["https://a.css"] } }"#).unwrap();
        assert_eq!(settings.css.external_links, vec!["https://a.css".to_string()]);
        assert_eq!(settings.js.external_links, vec![String::new()]);
    }

    #[test]
    fn test_save_keeps_blanks_and_reopen_drops_them() {
        let mut editor = SettingsEditor::from_settings(&EditorSettings::default());
        assert!(editor.draft().css.external_links.is_empty());

        editor.push_link(ResourceKind::Css, "https://a.css");
        editor.add_link(ResourceKind::Css);
        editor.push_link(ResourceKind::Css, "https://b.css");
        editor.add_link(ResourceKind::Css);

        let saved = editor.save();
        assert_eq!(
            saved.css.external_links,
            vec!["https://a.css", "", "https://b.css", ""]
        );

        let reopened = SettingsEditor::from_settings(&saved);
        assert_eq!(
            reopened.draft().css.external_links,
            vec!["https://a.css", "https://b.css"]
        );
    }

    #[test]
    fn test_whitespace_only_links_are_blank() {
        let mut settings = EditorSettings::default();
        settings.css.external_links = vec![" \t".to_string(), "https://a.css".to_string()];

        assert_eq!(settings.css.active_links().collect::<Vec<_>>(), vec!["https://a.css"]);
        let editor = SettingsEditor::from_settings(&settings);
        assert_eq!(editor.draft().css.external_links, vec!["https://a.css"]);
    }

    #[test]
    fn test_edit_and_remove_by_position() {
        let mut editor = SettingsEditor::from_settings(&EditorSettings::default());
        editor.push_link(ResourceKind::Js, "one.js");
        editor.push_link(ResourceKind::Js, "two.js");
        editor.push_link(ResourceKind::Js, "three.js");

        editor.set_link(ResourceKind::Js, 1, "TWO.js").unwrap();
        assert_eq!(editor.remove_link(ResourceKind::Js, 0).unwrap(), "one.js");
        assert_eq!(editor.draft().js.external_links, vec!["TWO.js", "three.js"]);

        assert!(matches!(
            editor.set_link(ResourceKind::Js, 5, "x").unwrap_err(),
            MentorError::IndexOutOfBounds { index: 5, length: 2 }
        ));
        assert!(editor.remove_link(ResourceKind::Css, 0).is_err());
    }

    #[test]
    fn test_quick_setup_appends_to_matching_list() {
        let mut editor = SettingsEditor::from_settings(&EditorSettings::default());
        for setup in QUICK_SETUPS.iter().take(2) {
            editor.apply_quick_setup(setup);
        }
        assert_eq!(
            editor.draft().links(ResourceKind::Css),
            ["https://cdn.tailwindcss.com".to_string()]
        );
        assert_eq!(
            editor.draft().links(ResourceKind::Js),
            ["https://unpkg.com/react@18/umd/react.development.js".to_string()]
        );
    }

    #[test]
    fn test_insert_viewport_meta_prepends() {
        let mut editor = SettingsEditor::from_settings(&EditorSettings::default());
        editor.set_head_tags("<title>x</title>");
        editor.insert_viewport_meta();
        assert!(editor.draft().html.head_tags.starts_with("<meta charset=\"UTF-8\">\n"));
        assert!(editor.draft().html.head_tags.ends_with("/>\n<title>x</title>"));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut parent = EditorSettings::default();
        parent.html.body_class_name = "dark".to_string();

        let mut editor = SettingsEditor::from_settings(&parent);
        editor.set_body_class_name("light");
        editor.push_link(ResourceKind::Css, "https://a.css");
        editor.cancel(&parent);

        assert_eq!(editor.draft().html.body_class_name, "dark");
        assert!(editor.draft().css.external_links.is_empty());
    }
}
