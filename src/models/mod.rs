//! Data structures for chat-completion requests and responses.

mod attachment;
mod content;
pub mod data_url;
mod image_generation;
mod message;
mod request;
mod response;
mod role;

pub use attachment::{Attachment, AttachmentSource, CustomContent};
pub use content::{ContentPart, ImageDetail, ImageUrl};
pub use image_generation::{ImageGenerationOptions, ImageQuality, ImageSize, ImageStyle};
pub use message::{Message, MessageContent};
pub use request::{ChatCompletionRequest, CustomFields};
pub use response::{ChatCompletionResponse, Choice, Usage};
pub use role::Role;
