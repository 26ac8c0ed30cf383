//! OpenAI chat-completions client (text, JSON and vision calls).

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, parse_json_reply, send_with_retry, LlmError};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Text model for content analysis, networking and self-introduction drafting.
pub const CHAT_MODEL: &str = "gpt-4o-mini";
/// Vision-capable model for image summaries and question extraction.
pub const VISION_MODEL: &str = "gpt-4o";

/// Sampling options for a single completion.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatOptions {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client()?,
            api_key,
        })
    }

    /// Single-turn chat completion with an optional system message.
    pub async fn chat(
        &self,
        system: Option<&str>,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(system),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: MessageContent::Text(user),
        });

        self.complete(CHAT_MODEL, messages, options).await
    }

    /// Chat completion whose reply is deserialized as JSON.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        system: Option<&str>,
        user: &str,
        options: ChatOptions,
    ) -> Result<T, LlmError> {
        let text = self.chat(system, user, options).await?;
        parse_json_reply(&text)
    }

    /// Sends `prompt` together with an image given as a `data:` URL.
    pub async fn vision(
        &self,
        prompt: &str,
        image_data_url: &str,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let messages = vec![ChatMessage {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url,
                    },
                },
            ]),
        }];

        self.complete(VISION_MODEL, messages, options).await
    }

    async fn complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage<'_>>,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = send_with_retry("OpenAI", || {
            self.client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&request_body)
        })
        .await?;

        let body: ChatResponse = response.json().await?;

        if let Some(usage) = &body.usage {
            debug!(
                "OpenAI call succeeded: model={model}, prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_message_serializes_as_parts() {
        let message = ChatMessage {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: "read this" },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/jpeg;base64,AAAA",
                    },
                },
            ]),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_text_message_serializes_as_string() {
        let message = ChatMessage {
            role: "system",
            content: MessageContent::Text("be concise"),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"], "be concise");
    }

    #[test]
    fn test_response_with_null_content_deserializes() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
        assert!(parsed.usage.is_none());
    }
}
