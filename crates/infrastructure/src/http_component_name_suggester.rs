use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchboard_application::ComponentNameSuggester;
use switchboard_core::{AppError, AppResult};
use tracing::debug;

const SYSTEM_PROMPT: &str = "You name UI components. Reply with a single PascalCase \
component name and nothing else.";

/// Component name suggester backed by an OpenAI-compatible chat completions endpoint.
pub struct HttpComponentNameSuggester {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpComponentNameSuggester {
    /// Creates a suggester posting to `endpoint` with bearer `api_key`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ComponentNameSuggester for HttpComponentNameSuggester {
    async fn suggest(&self, description: &str) -> AppResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: description,
                },
            ],
            temperature: 0.2,
            max_tokens: 16,
        };

        let response = self
            .http_client
            .post(self.endpoint.as_str())
            .bearer_auth(self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("component name request failed: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "component name endpoint returned {status}: {body}"
            )));
        }

        let payload = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("invalid component name response: {error}"))
            })?;

        let content = extract_suggestion(payload)?;
        debug!(model = %self.model, suggestion = %content, "component name endpoint answered");
        Ok(content)
    }
}

fn extract_suggestion(payload: ChatCompletionResponse) -> AppResult<String> {
    payload
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::Internal("component name response had no content".to_owned()))
}

#[cfg(test)]
mod tests {
    use switchboard_core::AppError;

    use super::{ChatCompletionResponse, extract_suggestion};

    fn parse(raw: &str) -> ChatCompletionResponse {
        serde_json::from_str(raw).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn first_choice_content_is_used() {
        let payload = parse(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"DeviceCard"}}]}"#,
        );
        assert_eq!(
            extract_suggestion(payload).unwrap_or_else(|_| unreachable!()),
            "DeviceCard"
        );
    }

    #[test]
    fn empty_choices_are_internal_error() {
        let payload = parse(r#"{"choices":[{"message":{"content":null}}]}"#);
        assert!(matches!(
            extract_suggestion(payload),
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            extract_suggestion(parse(r#"{"choices":[]}"#)),
            Err(AppError::Internal(_))
        ));
    }
}
