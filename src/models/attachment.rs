//! Out-of-band binary content attached to messages.

use serde::{Deserialize, Deserializer, Serialize};
use typed_builder::TypedBuilder;

use super::data_url;

/// A binary asset associated with a message, referenced by URL or carried inline.
///
/// Serializes with a fixed field set (`title`, `data`, `type`, `url`), writing
/// `null` for absent values. Unknown keys are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct Attachment {
    /// Display name of the asset.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub title: Option<String>,
    /// Inline base64 payload, optionally prefixed with `data:<mime>;base64,`.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub data: Option<String>,
    /// MIME type of the asset.
    #[builder(default, setter(into, strip_option))]
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    /// Reference to bytes held in the bucket or elsewhere.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub url: Option<String>,
}

/// Where the bytes of an [`Attachment`] live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSource<'a> {
    /// Stored remotely and addressed by a reference.
    Url(&'a str),
    /// Inline base64 data.
    Data(&'a str),
}

impl Attachment {
    /// An attachment referencing stored bytes.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::builder().url(url).build()
    }

    /// An attachment carrying inline base64 data.
    pub fn from_data(data: impl Into<String>) -> Self {
        Self::builder().data(data).build()
    }

    /// Returns where the bytes can be found. A `url` takes precedence over
    /// inline `data` when both are set; `None` means nothing is retrievable.
    pub fn source(&self) -> Option<AttachmentSource<'_>> {
        match (self.url.as_deref(), self.data.as_deref()) {
            (Some(url), _) => Some(AttachmentSource::Url(url)),
            (None, Some(data)) => Some(AttachmentSource::Data(data)),
            (None, None) => None,
        }
    }

    /// True when neither `url` nor `data` is present.
    pub fn is_empty(&self) -> bool {
        self.source().is_none()
    }

    /// Decodes the inline payload, stripping any `data:` marker.
    /// Returns `Ok(None)` when there is no inline data.
    pub fn decode_data(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        self.data.as_deref().map(data_url::decode).transpose()
    }

    /// MIME type from the `type` field, falling back to the `data:` header.
    pub fn effective_mime_type(&self) -> Option<&str> {
        self.mime_type
            .as_deref()
            .or_else(|| self.data.as_deref().and_then(data_url::mime_type))
    }

    /// File extension (without the dot) suitable for saving the asset locally.
    pub fn file_extension(&self) -> &'static str {
        match self.effective_mime_type() {
            Some(mime) if mime.contains("jpeg") || mime.contains("jpg") => "jpg",
            Some(mime) if mime.contains("webp") => "webp",
            _ => "png",
        }
    }
}

/// The ordered attachments carried by a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomContent {
    /// Attachments in caller order.
    #[serde(default, deserialize_with = "lenient_attachments")]
    pub attachments: Vec<Attachment>,
}

impl CustomContent {
    /// Wraps the given attachments.
    pub fn new(attachments: impl Into<Vec<Attachment>>) -> Self {
        Self {
            attachments: attachments.into(),
        }
    }

    /// True when there are no attachments.
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

impl From<Vec<Attachment>> for CustomContent {
    fn from(attachments: Vec<Attachment>) -> Self {
        Self::new(attachments)
    }
}

// A missing, null, or non-list `attachments` value reads as empty.
fn lenient_attachments<'de, D>(deserializer: D) -> Result<Vec<Attachment>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Attachment {
        Attachment::builder()
            .title("banner.png")
            .mime_type("image/png")
            .url("files/bucket/banner.png")
            .build()
    }

    #[test]
    fn attachment_round_trips() {
        let attachment = sample();
        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(serde_json::from_value::<Attachment>(value).unwrap(), attachment);
    }

    #[test]
    fn attachment_writes_fixed_field_set() {
        let value = serde_json::to_value(Attachment::from_url("u")).unwrap();
        assert_eq!(
            value,
            json!({"title": null, "data": null, "type": null, "url": "u"})
        );
    }

    #[test]
    fn unknown_attachment_keys_are_dropped() {
        let raw = json!({
            "title": "t",
            "type": "image/png",
            "url": "files/b/t.png",
            "reference_url": "ignored",
            "extra": {"nested": true}
        });
        let attachment: Attachment = serde_json::from_value(raw).unwrap();
        assert_eq!(
            attachment,
            Attachment::builder()
                .title("t")
                .mime_type("image/png")
                .url("files/b/t.png")
                .build()
        );
    }

    #[test]
    fn custom_content_preserves_order_and_count() {
        let content = CustomContent::new(vec![
            Attachment::from_url("a"),
            Attachment::from_data("YWJj"),
            sample(),
        ]);
        let wire = serde_json::to_string(&content).unwrap();
        let back: CustomContent = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn custom_content_tolerates_missing_or_malformed_list() {
        let missing: CustomContent = serde_json::from_value(json!({})).unwrap();
        assert!(missing.is_empty());

        let not_a_list: CustomContent =
            serde_json::from_value(json!({"attachments": "nope"})).unwrap();
        assert!(not_a_list.is_empty());

        let null: CustomContent = serde_json::from_value(json!({"attachments": null})).unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn url_takes_precedence_over_data() {
        let both = Attachment::builder().url("files/b/x").data("YWJj").build();
        assert_eq!(both.source(), Some(AttachmentSource::Url("files/b/x")));
        assert_eq!(
            Attachment::from_data("YWJj").source(),
            Some(AttachmentSource::Data("YWJj"))
        );
        assert!(Attachment::default().is_empty());
    }

    #[test]
    fn decode_data_strips_marker() {
        let attachment = Attachment::from_data("data:image/png;base64,YWJj");
        assert_eq!(attachment.decode_data().unwrap(), Some(b"abc".to_vec()));
        assert_eq!(Attachment::from_url("u").decode_data().unwrap(), None);
    }

    #[test]
    fn file_extension_follows_mime_type() {
        let jpeg = Attachment::builder().mime_type("image/jpeg").build();
        assert_eq!(jpeg.file_extension(), "jpg");
        let webp = Attachment::from_data("data:image/webp;base64,AAAA");
        assert_eq!(webp.file_extension(), "webp");
        assert_eq!(Attachment::default().file_extension(), "png");
    }
}
