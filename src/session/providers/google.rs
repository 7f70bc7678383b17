// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Google Gemini (Generative Language API) provider implementation

use super::{AiProvider, ProviderExchange, ProviderResponse, TokenUsage};
use crate::config::Config;
use crate::session::{ChatError, ContentPart, Message, MessageContent};
use crate::{log_debug, log_info};
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Gemini pricing constants (per 1M tokens in USD)
/// Longer names first: lookup takes the first substring match
const PRICING: &[(&str, f64, f64)] = &[
	// Model, Input price per 1M tokens, Output price per 1M tokens
	("gemini-2.5-flash-lite", 0.10, 0.40),
	("gemini-2.5-flash", 0.30, 2.50),
	("gemini-2.5-pro", 1.25, 10.00), // <= 200K tokens
	("gemini-2.0-flash-lite", 0.075, 0.30),
	("gemini-2.0-flash", 0.10, 0.40),
	("gemini-1.5-flash", 0.075, 0.30),
	("gemini-1.5-pro", 1.25, 5.00),
];

/// Finish reasons that mean the reply was withheld
const BLOCKED_FINISH_REASONS: &[&str] = &[
	"SAFETY",
	"RECITATION",
	"BLOCKLIST",
	"PROHIBITED_CONTENT",
	"SPII",
	"IMAGE_SAFETY",
];

/// Calculate cost for Gemini models
fn calculate_cost(model: &str, prompt_tokens: u64, output_tokens: u64) -> Option<f64> {
	for (pricing_model, input_price, output_price) in PRICING {
		if model.contains(pricing_model) {
			let input_cost = (prompt_tokens as f64 / 1_000_000.0) * input_price;
			let output_cost = (output_tokens as f64 / 1_000_000.0) * output_price;
			return Some(input_cost + output_cost);
		}
	}
	None
}

/// Google Gemini provider implementation
pub struct GoogleGeminiProvider;

impl Default for GoogleGeminiProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl GoogleGeminiProvider {
	pub fn new() -> Self {
		Self
	}
}

/// Content entry of a generateContent request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiContent {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
	pub parts: Vec<serde_json::Value>,
}

#[async_trait::async_trait]
impl AiProvider for GoogleGeminiProvider {
	fn name(&self) -> &str {
		"google"
	}

	fn supports_model(&self, model: &str) -> bool {
		model.starts_with("gemini")
	}

	fn supports_vision(&self, model: &str) -> bool {
		// gemini-pro / gemini-1.0-pro were text-only; everything newer reads images
		if model == "gemini-pro" || model.starts_with("gemini-1.0-pro") {
			return model.contains("vision");
		}
		self.supports_model(model)
	}

	async fn chat_completion(
		&self,
		messages: &[Message],
		model: &str,
		temperature: f32,
		api_key: &str,
		config: &Config,
	) -> Result<ProviderResponse, ChatError> {
		let api_url = format!(
			"{}/models/{}:generateContent",
			config.api_base_url.trim_end_matches('/'),
			model
		);

		let request_body = build_request_body(messages, temperature, config.max_output_tokens);
		log_debug!(
			"Gemini request: {}",
			serde_json::to_string_pretty(&redact_inline_data(&request_body)).unwrap_or_default()
		);

		let client = Client::builder()
			.timeout(Duration::from_secs(config.request_timeout_seconds))
			.build()?;

		let started = Instant::now();
		let response = client
			.post(&api_url)
			.header("x-goog-api-key", api_key)
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await?;

		let status = response.status();
		let response_text = response.text().await?;
		let request_time_ms = started.elapsed().as_millis() as u64;

		log_debug!("Gemini response ({}): {}", status, response_text);

		let response_json: serde_json::Value = match serde_json::from_str(&response_text) {
			Ok(json) => json,
			Err(e) => {
				if !status.is_success() {
					return Err(classify_http_error(
						status.as_u16(),
						&serde_json::Value::Null,
						&response_text,
					));
				}
				return Err(ChatError::Transient(format!(
					"Failed to parse response JSON: {}. Response: {}",
					e, response_text
				)));
			}
		};

		if !status.is_success() {
			return Err(classify_http_error(
				status.as_u16(),
				&response_json,
				&response_text,
			));
		}

		let (content, mut usage, finish_reason) = parse_response(&response_json, model)?;
		if let Some(ref mut usage) = usage {
			usage.request_time_ms = Some(request_time_ms);
			log_info!(
				"Gemini usage: {} prompt / {} output tokens in {}ms",
				usage.prompt_tokens,
				usage.output_tokens,
				request_time_ms
			);
		}

		let exchange = ProviderExchange::new(usage, self.name());

		Ok(ProviderResponse {
			content,
			exchange,
			finish_reason,
		})
	}
}

/// Convert the transcript to (systemInstruction, contents)
pub fn convert_messages(messages: &[Message]) -> (Option<GeminiContent>, Vec<GeminiContent>) {
	let mut system_parts = Vec::new();
	let mut contents = Vec::new();

	for msg in messages {
		let parts = convert_content(msg.content());
		match msg {
			Message::System(_) => system_parts.extend(parts),
			Message::User(_) => contents.push(GeminiContent {
				role: Some("user".to_string()),
				parts,
			}),
			Message::Assistant(_) => contents.push(GeminiContent {
				role: Some("model".to_string()),
				parts,
			}),
		}
	}

	let system_instruction = if system_parts.is_empty() {
		None
	} else {
		Some(GeminiContent {
			role: None,
			parts: system_parts,
		})
	};

	(system_instruction, contents)
}

fn convert_content(content: &MessageContent) -> Vec<serde_json::Value> {
	match content {
		MessageContent::Text(text) => vec![serde_json::json!({ "text": text })],
		MessageContent::Parts(parts) => parts
			.iter()
			.map(|part| match part {
				ContentPart::Text { text } => serde_json::json!({ "text": text }),
				ContentPart::Image { mime_type, data } => serde_json::json!({
					"inline_data": {
						"mime_type": mime_type,
						"data": general_purpose::STANDARD.encode(data)
					}
				}),
			})
			.collect(),
	}
}

/// Build the generateContent request body
pub fn build_request_body(
	messages: &[Message],
	temperature: f32,
	max_output_tokens: u32,
) -> serde_json::Value {
	let (system_instruction, contents) = convert_messages(messages);

	let mut request_body = serde_json::json!({
		"contents": contents,
		"generationConfig": {
			"temperature": temperature,
			"maxOutputTokens": max_output_tokens,
			"candidateCount": 1
		}
	});

	if let Some(system_instruction) = system_instruction {
		request_body["systemInstruction"] = serde_json::json!(system_instruction);
	}

	request_body
}

/// Map a non-2xx reply to the turn error taxonomy
pub fn classify_http_error(status: u16, body: &serde_json::Value, raw: &str) -> ChatError {
	let error_obj = body.get("error");
	let message = error_obj
		.and_then(|e| e.get("message"))
		.and_then(|m| m.as_str())
		.map(|m| m.to_string())
		.unwrap_or_else(|| {
			if raw.trim().is_empty() {
				"no response body".to_string()
			} else {
				raw.trim().to_string()
			}
		});
	let detail = format!("HTTP {} | {}", status, message);

	let key_rejected = error_obj
		.and_then(|e| e.get("details"))
		.and_then(|d| d.as_array())
		.map(|details| {
			details.iter().any(|d| {
				d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID")
			})
		})
		.unwrap_or(false)
		|| message.contains("API key not valid");

	match status {
		401 | 403 => ChatError::Auth(detail),
		400 if key_rejected => ChatError::Auth(detail),
		408 | 429 | 500..=599 => ChatError::Transient(detail),
		_ => ChatError::Model(detail),
	}
}

/// Extract reply content, usage and finish reason from a successful reply
pub fn parse_response(
	response_json: &serde_json::Value,
	model: &str,
) -> Result<(MessageContent, Option<TokenUsage>, Option<String>), ChatError> {
	if let Some(reason) = response_json
		.get("promptFeedback")
		.and_then(|f| f.get("blockReason"))
		.and_then(|r| r.as_str())
	{
		return Err(ChatError::Model(format!("Prompt was blocked: {}", reason)));
	}

	let candidate = response_json
		.get("candidates")
		.and_then(|c| c.as_array())
		.and_then(|candidates| candidates.first())
		.ok_or_else(|| ChatError::Model("Model returned no candidates".to_string()))?;

	let finish_reason = candidate
		.get("finishReason")
		.and_then(|fr| fr.as_str())
		.map(|s| s.to_string());

	if let Some(ref reason) = finish_reason {
		log_debug!("Finish reason: {}", reason);
		if BLOCKED_FINISH_REASONS.contains(&reason.as_str()) {
			return Err(ChatError::Model(format!("Reply was withheld: {}", reason)));
		}
	}

	// Thought summaries are not part of the reply
	let mut parts = Vec::new();
	if let Some(raw_parts) = candidate
		.get("content")
		.and_then(|c| c.get("parts"))
		.and_then(|p| p.as_array())
	{
		for part in raw_parts {
			if part.get("thought").and_then(|t| t.as_bool()).unwrap_or(false) {
				continue;
			}
			if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
				parts.push(ContentPart::text(text));
			} else if let Some(inline) = part.get("inlineData").or_else(|| part.get("inline_data")) {
				parts.push(parse_inline_data(inline)?);
			}
		}
	}

	let content = match parts.as_slice() {
		[] => {
			return Err(ChatError::Model(format!(
				"Model returned an empty reply (finish reason: {})",
				finish_reason.as_deref().unwrap_or("unknown")
			)));
		}
		[ContentPart::Text { text }] => MessageContent::Text(text.clone()),
		_ => MessageContent::Parts(parts),
	};

	let usage = response_json.get("usageMetadata").map(|usage_obj| {
		let prompt_tokens = usage_obj
			.get("promptTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(0);
		let output_tokens = usage_obj
			.get("candidatesTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(0)
			+ usage_obj
				.get("thoughtsTokenCount")
				.and_then(|v| v.as_u64())
				.unwrap_or(0);
		let total_tokens = usage_obj
			.get("totalTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(prompt_tokens + output_tokens);

		TokenUsage {
			prompt_tokens,
			output_tokens,
			total_tokens,
			cost: calculate_cost(model, prompt_tokens, output_tokens),
			request_time_ms: None,
		}
	});

	Ok((content, usage, finish_reason))
}

fn parse_inline_data(inline: &serde_json::Value) -> Result<ContentPart, ChatError> {
	let mime_type = inline
		.get("mimeType")
		.or_else(|| inline.get("mime_type"))
		.and_then(|m| m.as_str())
		.unwrap_or("application/octet-stream");
	let encoded = inline.get("data").and_then(|d| d.as_str()).unwrap_or_default();
	let data = general_purpose::STANDARD
		.decode(encoded)
		.map_err(|e| ChatError::Model(format!("Reply carried undecodable inline data: {}", e)))?;
	Ok(ContentPart::image(data, mime_type))
}

/// Replace inline image payloads with their size so logs stay readable
pub fn redact_inline_data(value: &serde_json::Value) -> serde_json::Value {
	match value {
		serde_json::Value::Object(map) => {
			let mut redacted = serde_json::Map::new();
			for (key, val) in map {
				if key == "inline_data" || key == "inlineData" {
					let mut inline = val.clone();
					if let Some(data) = val.get("data").and_then(|d| d.as_str()) {
						inline["data"] =
							serde_json::json!(format!("<{} base64 chars>", data.len()));
					}
					redacted.insert(key.clone(), inline);
				} else {
					redacted.insert(key.clone(), redact_inline_data(val));
				}
			}
			serde_json::Value::Object(redacted)
		}
		serde_json::Value::Array(items) => {
			serde_json::Value::Array(items.iter().map(redact_inline_data).collect())
		}
		other => other.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn transcript() -> Vec<Message> {
		vec![
			Message::system("You are Chef."),
			Message::user(MessageContent::Parts(vec![
				ContentPart::image(b"abc".to_vec(), "image/jpeg"),
				ContentPart::text("What can I cook?"),
			])),
			Message::assistant(MessageContent::Text("Fried rice.".to_string())),
		]
	}

	#[test]
	fn test_request_body_shape() {
		let body = build_request_body(&transcript(), 0.7, 1024);

		assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are Chef.");
		assert!(body["systemInstruction"].get("role").is_none());

		let contents = body["contents"].as_array().unwrap();
		assert_eq!(contents.len(), 2);
		assert_eq!(contents[0]["role"], "user");
		assert_eq!(contents[0]["parts"][0]["inline_data"]["mime_type"], "image/jpeg");
		assert_eq!(contents[0]["parts"][0]["inline_data"]["data"], "YWJj");
		assert_eq!(contents[0]["parts"][1]["text"], "What can I cook?");
		assert_eq!(contents[1]["role"], "model");
		assert_eq!(contents[1]["parts"][0]["text"], "Fried rice.");

		assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
		assert_eq!(body["generationConfig"]["candidateCount"], 1);
	}

	#[test]
	fn test_parse_single_text_reply() {
		let response = json!({
			"candidates": [{
				"content": {"role": "model", "parts": [{"text": "Make shakshuka."}]},
				"finishReason": "STOP"
			}],
			"usageMetadata": {
				"promptTokenCount": 1000,
				"candidatesTokenCount": 200,
				"totalTokenCount": 1200
			}
		});

		let (content, usage, finish) = parse_response(&response, "gemini-2.5-flash").unwrap();
		assert_eq!(content, MessageContent::Text("Make shakshuka.".to_string()));
		assert_eq!(finish.as_deref(), Some("STOP"));

		let usage = usage.unwrap();
		assert_eq!(usage.prompt_tokens, 1000);
		assert_eq!(usage.output_tokens, 200);
		assert_eq!(usage.total_tokens, 1200);
		let cost = usage.cost.unwrap();
		assert!((cost - 0.0008).abs() < 1e-9);
	}

	#[test]
	fn test_parse_multi_part_reply_skips_thoughts() {
		let response = json!({
			"candidates": [{
				"content": {"parts": [
					{"text": "thinking...", "thought": true},
					{"text": "Part one."},
					{"text": "Part two."}
				]},
				"finishReason": "STOP"
			}]
		});

		let (content, usage, _) = parse_response(&response, "gemini-2.5-flash").unwrap();
		assert_eq!(
			content,
			MessageContent::Parts(vec![
				ContentPart::text("Part one."),
				ContentPart::text("Part two.")
			])
		);
		assert!(usage.is_none());
	}

	#[test]
	fn test_parse_reply_keeps_inline_images_in_order() {
		let response = json!({
			"candidates": [{
				"content": {"parts": [
					{"text": "Here is a plating idea:"},
					{"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
				]},
				"finishReason": "STOP"
			}]
		});

		let (content, _, _) = parse_response(&response, "gemini-2.5-flash").unwrap();
		assert_eq!(
			content,
			MessageContent::Parts(vec![
				ContentPart::text("Here is a plating idea:"),
				ContentPart::image(
					vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
					"image/png"
				),
			])
		);

		let image_only = json!({
			"candidates": [{"content": {"parts": [
				{"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}}
			]}}]
		});
		let (content, _, _) = parse_response(&image_only, "gemini-2.5-flash").unwrap();
		assert!(content.has_image());
		assert!(content.texts().is_empty());

		let garbled = json!({
			"candidates": [{"content": {"parts": [
				{"inlineData": {"mimeType": "image/png", "data": "***"}}
			]}}]
		});
		assert!(matches!(
			parse_response(&garbled, "gemini-2.5-flash"),
			Err(ChatError::Model(_))
		));
	}

	#[test]
	fn test_parse_blocked_replies() {
		let blocked_prompt = json!({"promptFeedback": {"blockReason": "SAFETY"}});
		assert!(matches!(
			parse_response(&blocked_prompt, "gemini-2.5-flash"),
			Err(ChatError::Model(_))
		));

		let withheld = json!({"candidates": [{"finishReason": "SAFETY"}]});
		assert!(matches!(
			parse_response(&withheld, "gemini-2.5-flash"),
			Err(ChatError::Model(_))
		));

		let empty = json!({"candidates": []});
		assert!(matches!(
			parse_response(&empty, "gemini-2.5-flash"),
			Err(ChatError::Model(_))
		));

		let no_text = json!({"candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]});
		assert!(matches!(
			parse_response(&no_text, "gemini-2.5-flash"),
			Err(ChatError::Model(_))
		));
	}

	#[test]
	fn test_classify_http_errors() {
		let invalid_key = json!({
			"error": {
				"code": 400,
				"message": "API key not valid. Please pass a valid API key.",
				"status": "INVALID_ARGUMENT",
				"details": [{"reason": "API_KEY_INVALID"}]
			}
		});
		assert!(classify_http_error(400, &invalid_key, "").is_auth());
		assert!(classify_http_error(403, &json!({}), "forbidden").is_auth());

		assert!(matches!(
			classify_http_error(429, &json!({"error": {"message": "quota"}}), ""),
			ChatError::Transient(_)
		));
		assert!(matches!(
			classify_http_error(503, &serde_json::Value::Null, "overloaded"),
			ChatError::Transient(_)
		));

		let bad_request = json!({"error": {"message": "Unsupported MIME type", "status": "INVALID_ARGUMENT"}});
		match classify_http_error(400, &bad_request, "") {
			ChatError::Model(detail) => assert!(detail.contains("Unsupported MIME type")),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn test_redact_inline_data() {
		let body = build_request_body(&transcript(), 0.7, 1024);
		let redacted = redact_inline_data(&body);
		assert_eq!(
			redacted["contents"][0]["parts"][0]["inline_data"]["data"],
			"<4 base64 chars>"
		);
		assert_eq!(
			redacted["contents"][0]["parts"][0]["inline_data"]["mime_type"],
			"image/jpeg"
		);
		assert_eq!(redacted["contents"][0]["parts"][1]["text"], "What can I cook?");
	}

	#[test]
	fn test_model_support() {
		let provider = GoogleGeminiProvider::new();
		assert!(provider.supports_model("gemini-2.5-flash"));
		assert!(!provider.supports_model("text-bison"));
		assert!(provider.supports_vision("gemini-2.5-flash"));
		assert!(provider.supports_vision("gemini-1.0-pro-vision"));
		assert!(!provider.supports_vision("gemini-1.0-pro"));
		assert!(!provider.supports_vision("gemini-pro"));
	}

	#[test]
	fn test_calculate_cost_prefers_specific_model() {
		let lite = calculate_cost("gemini-2.5-flash-lite", 1_000_000, 0).unwrap();
		assert!((lite - 0.10).abs() < 1e-9);
		assert!(calculate_cost("gemini-exp", 10, 10).is_none());
	}
}
