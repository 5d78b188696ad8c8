//! Image attachments and their inline `data:` URL encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// An uploaded screenshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type if the caller knows it; sniffed from the bytes otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,

    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Creates an attachment with the MIME type sniffed on encode.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime: None,
            bytes: bytes.into(),
        }
    }

    /// Builder: Set MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Returns true if there are no bytes to send.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Effective MIME type.
    pub fn mime_type(&self) -> &str {
        match self.mime.as_deref() {
            Some(mime) if !mime.trim().is_empty() => mime,
            _ => sniff_mime(&self.bytes),
        }
    }

    /// Encodes the image as `data:{mime};base64,{payload}`.
    ///
    /// Empty attachments have nothing to show the model and yield `None`.
    pub fn to_data_url(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "data:{};base64,{}",
            self.mime_type(),
            STANDARD.encode(&self.bytes)
        ))
    }
}

/// Guess the MIME type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
        "image/png"
    } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}
