//! Attachment value object

use serde::{Deserialize, Serialize};

/// A file uploaded alongside the prompt
///
/// Owned by the caller. The orchestrator never inspects the payload; it
/// only forwards image attachments to backends that declare vision support.
/// Field names follow the request wire format (`type`, `base64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(rename = "base64", default)]
    pub base64_payload: String,
}

impl Attachment {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        base64_payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            base64_payload: base64_payload.into(),
        }
    }

    /// Whether this attachment carries image data
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// An image with a payload; the only kind forwarded to vision backends
    pub fn is_forwardable_image(&self) -> bool {
        self.is_image() && !self.is_empty()
    }

    /// Whether there is any payload at all
    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// The raw base64 payload with any `data:<mime>;base64,` prefix removed
    pub fn payload(&self) -> &str {
        if self.base64_payload.starts_with("data:")
            && let Some((_, data)) = self.base64_payload.split_once(',')
        {
            return data;
        }
        &self.base64_payload
    }

    /// Media type to declare to a backend, defaulting images to JPEG
    pub fn media_type(&self) -> &str {
        if self.mime_type.is_empty() {
            "image/jpeg"
        } else {
            &self.mime_type
        }
    }

    /// The payload as a `data:` URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type(), self.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(Attachment::new("a.png", "image/png", "AAAA").is_image());
        assert!(!Attachment::new("a.pdf", "application/pdf", "AAAA").is_image());
    }

    #[test]
    fn test_payload_strips_data_uri() {
        let att = Attachment::new("a.png", "image/png", "data:image/png;base64,iVBORw0");
        assert_eq!(att.payload(), "iVBORw0");

        let plain = Attachment::new("a.png", "image/png", "iVBORw0");
        assert_eq!(plain.payload(), "iVBORw0");
    }

    #[test]
    fn test_data_url() {
        let att = Attachment::new("a.png", "image/png", "data:image/png;base64,xyz");
        assert_eq!(att.data_url(), "data:image/png;base64,xyz");
    }

    #[test]
    fn test_wire_field_names() {
        let att: Attachment =
            serde_json::from_str(r#"{"name":"cat.jpg","type":"image/jpeg","base64":"Zm9v"}"#)
                .unwrap();
        assert_eq!(att.mime_type, "image/jpeg");
        assert_eq!(att.base64_payload, "Zm9v");
    }
}
