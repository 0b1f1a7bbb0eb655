use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
	pub role: &'static str,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system", content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user", content: content.into() }
	}
}

/// Sends an OpenAI-style chat completion request and returns the first choice's text.
pub async fn complete(
	cfg: &ptg_config::LlmProviderConfig,
	messages: &[ChatMessage],
) -> Result<String> {
	let client = crate::http_client(cfg.timeout_ms)?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion(&json)
}

fn parse_completion(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(|content| content.as_str())
		.ok_or_else(|| Error::invalid_response("Completion response is missing choice content."))?;
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return Err(Error::invalid_response("Completion content is empty."));
	}

	Ok(trimmed.to_string())
}
