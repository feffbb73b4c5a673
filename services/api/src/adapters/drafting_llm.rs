//! services/api/src/adapters/drafting_llm.rs
//!
//! This module contains the adapter for the email-drafting LLM.
//! It implements the `EmailDraftingService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a professional email writer.

You will receive the language, tone, category, and a free-form description of
an email the user wants written.

Requirements for every draft:
1. A concise and clear subject line.
2. A professional greeting.
3. A well-structured body with appropriate paragraphs.
4. A professional closing/sign-off.
5. Placeholders in [brackets] for names or specific details that need user input.

If the language is Arabic, ensure formal phrasing appropriate for professional
business communication in the Middle East.

Respond with a JSON object of exactly this shape and nothing else:
{"subject": "<the subject line>", "body": "<the full body text>"}"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use promail_core::domain::{EmailDraft, EmailRequest};
use promail_core::ports::{EmailDraftingService, PortError, PortResult};
use serde::Deserialize;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `EmailDraftingService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiDraftingAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

/// The JSON shape the model is instructed to reply with.
#[derive(Deserialize)]
struct DraftPayload {
    subject: String,
    body: String,
}

impl OpenAiDraftingAdapter {
    /// Creates a new `OpenAiDraftingAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn user_input(request: &EmailRequest) -> String {
        format!(
            "Generate a professional email in {} based on the following details:\n\
             - Context/Purpose: {}\n\
             - Tone: {}\n\
             - Category: {}",
            request.language, request.description, request.tone, request.category
        )
    }
}

//=========================================================================================
// `EmailDraftingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl EmailDraftingService for OpenAiDraftingAdapter {
    /// Produces a subject/body draft for one generation request.
    async fn draft(&self, request: &EmailRequest) -> PortResult<EmailDraft> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::user_input(request))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Drafting LLM response contained no text content.".to_string(),
                )
            })?;

        let payload: DraftPayload = serde_json::from_str(&content).map_err(|e| {
            PortError::Unexpected(format!("Drafting LLM response was not valid JSON: {e}"))
        })?;

        Ok(EmailDraft {
            subject: payload.subject,
            body: payload.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promail_core::domain::{Category, Language, Tone};

    #[test]
    fn user_input_carries_all_four_selections() {
        let request = EmailRequest {
            description: "Ask my boss for a 30% raise".to_string(),
            language: Language::Arabic,
            tone: Tone::Persuasive,
            category: Category::General,
        };

        let input = OpenAiDraftingAdapter::user_input(&request);
        assert!(input.contains("Arabic"));
        assert!(input.contains("Persuasive"));
        assert!(input.contains("General Business"));
        assert!(input.contains("Ask my boss for a 30% raise"));
    }
}
