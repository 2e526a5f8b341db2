//! Typed generation options for DALL-E style image models.
//!
//! Other vendors (e.g. Google's `imagegeneration@005`) ignore these fields.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::CustomFields;

/// The size of the generated image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// 1024x1024
    #[serde(rename = "1024x1024")]
    Square,
    /// 1024x1792
    #[serde(rename = "1024x1792")]
    Portrait,
    /// 1792x1024
    #[serde(rename = "1792x1024")]
    Landscape,
}

/// The style of the generated image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    /// Hyper-real and dramatic.
    Vivid,
    /// More natural, less hyper-real.
    Natural,
}

/// The quality of the generated image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    /// Default quality.
    Standard,
    /// Finer details and greater consistency.
    Hd,
}

/// Image generation options, converted into completion custom fields.
#[derive(Debug, Clone, Default, TypedBuilder)]
#[builder(doc)]
pub struct ImageGenerationOptions {
    /// Output size
    #[builder(default, setter(strip_option))]
    pub size: Option<ImageSize>,
    /// Output style
    #[builder(default, setter(strip_option))]
    pub style: Option<ImageStyle>,
    /// Output quality
    #[builder(default, setter(strip_option))]
    pub quality: Option<ImageQuality>,
}

impl From<ImageGenerationOptions> for CustomFields {
    fn from(options: ImageGenerationOptions) -> Self {
        let mut fields = CustomFields::new();
        if let Some(size) = options.size {
            fields.insert("size".into(), serde_json::json!(size));
        }
        if let Some(style) = options.style {
            fields.insert("style".into(), serde_json::json!(style));
        }
        if let Some(quality) = options.quality {
            fields.insert("quality".into(), serde_json::json!(quality));
        }
        fields
    }
}
