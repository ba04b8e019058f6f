use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::base::{GenerationParameters, ProviderResult};
use crate::errors::ProviderError;
use crate::models::message::{ContentPart, Message, MessageContent};

/// Convert internal Message format to OpenAI's API message specification.
/// Messages with no text and no images are dropped.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .filter_map(|message| {
            let content = match &message.content {
                MessageContent::Text(text) if text.is_empty() => return None,
                MessageContent::Text(text) => json!(text),
                MessageContent::Image(image) => json!([ContentPart::image(image.clone())]),
                MessageContent::Parts(parts) if parts.is_empty() => return None,
                MessageContent::Parts(parts) => json!(parts),
            };
            Some(json!({
                "role": message.role,
                "content": content,
            }))
        })
        .collect()
}

/// Build a chat completion request body; optional parameters are only included when set
pub fn build_payload(model: &str, messages: Vec<Value>, params: &GenerationParameters) -> Value {
    let mut payload = Map::new();
    payload.insert("model".to_string(), json!(model));
    payload.insert("messages".to_string(), Value::Array(messages));
    if let Ok(Value::Object(options)) = serde_json::to_value(params) {
        payload.extend(options);
    }
    Value::Object(payload)
}

/// POST a JSON payload, mapping non-success statuses and error bodies to [`ProviderError`]
pub async fn post(
    client: &Client,
    url: &str,
    api_key: Option<&str>,
    payload: &Value,
) -> ProviderResult<Value> {
    debug!(url, "sending completion request");
    let mut request = client.post(url).json(payload);
    if let Some(key) = api_key {
        request = request.header("Authorization", format!("Bearer {}", key));
    }
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::OK {
        let body: Value = response.json().await?;
        // some compatible servers report failures with a 200 and an error object
        if let Some(error) = body.get("error") {
            return Err(error_from_body(status, error));
        }
        return Ok(body);
    }

    let text = response.text().await.unwrap_or_default();
    let error = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body.get("error").cloned());
    match error {
        Some(error) => Err(error_from_body(status, &error)),
        None => Err(ProviderError::Api {
            status: status.as_u16(),
            message: if text.is_empty() {
                status.to_string()
            } else {
                text
            },
        }),
    }
}

fn error_from_body(status: StatusCode, error: &Value) -> ProviderError {
    if let Some(err) = check_openai_context_length_error(error) {
        return err;
    }
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}

pub fn check_openai_context_length_error(error: &Value) -> Option<ProviderError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ProviderError::ContextLengthExceeded(message))
    } else {
        None
    }
}

/// Extract the assistant text from an OpenAI-style chat completion response
pub fn openai_response_to_text(response: &Value) -> ProviderResult<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(ProviderError::EmptyResponse)
}
