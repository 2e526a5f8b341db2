//! Response models for the chat-completion endpoint.

use std::fmt;

use serde::de::{IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::Message;

/// A chat-completion response from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Identifier assigned by the gateway.
    #[serde(default)]
    pub id: Option<String>,
    /// The model that served the request.
    #[serde(default)]
    pub model: Option<String>,
    /// The first generated choice, if any.
    ///
    /// Only element 0 of the wire list is parsed. Later choices are skipped
    /// without validation, so this holds at most one entry.
    #[serde(deserialize_with = "first_choice")]
    pub choices: Vec<Choice>,
    /// Token accounting, when reported.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// The message of the first choice.
    pub fn first_message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Consumes the response and returns the first choice's message.
    pub fn into_first_message(self) -> Option<Message> {
        self.choices.into_iter().next().map(|choice| choice.message)
    }
}

fn first_choice<'de, D>(deserializer: D) -> Result<Vec<Choice>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FirstChoice;

    impl<'de> Visitor<'de> for FirstChoice {
        type Value = Vec<Choice>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of choices")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let first = seq.next_element::<Choice>()?;
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(first.into_iter().collect())
        }
    }

    deserializer.deserialize_seq(FirstChoice)
}

/// A generated choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Position of the choice in the response.
    #[serde(default)]
    pub index: u32,
    /// The generated message.
    pub message: Message,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage of a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens in the generated output.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total tokens billed.
    #[serde(default)]
    pub total_tokens: u64,
}
