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

// Transcript message types

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
	Assistant,
}

/// A single entry of the transcript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
	System(MessageContent),
	User(MessageContent),
	Assistant(MessageContent),
}

/// Message body: a plain string or an ordered list of parts
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
	Text(String),
	Parts(Vec<ContentPart>),
}

/// One piece of a multimodal message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
	Text {
		text: String,
	},
	Image {
		mime_type: String,
		#[serde(with = "base64_bytes")]
		data: Vec<u8>,
	},
}

impl Message {
	pub fn system(text: impl Into<String>) -> Self {
		Message::System(MessageContent::Text(text.into()))
	}

	pub fn user(content: MessageContent) -> Self {
		Message::User(content)
	}

	pub fn assistant(content: MessageContent) -> Self {
		Message::Assistant(content)
	}

	pub fn role(&self) -> Role {
		match self {
			Message::System(_) => Role::System,
			Message::User(_) => Role::User,
			Message::Assistant(_) => Role::Assistant,
		}
	}

	pub fn content(&self) -> &MessageContent {
		match self {
			Message::System(content) | Message::User(content) | Message::Assistant(content) => {
				content
			}
		}
	}

	pub fn is_system(&self) -> bool {
		matches!(self, Message::System(_))
	}
}

impl MessageContent {
	/// Text fragments in order; image parts are skipped
	pub fn texts(&self) -> Vec<&str> {
		match self {
			MessageContent::Text(text) => vec![text.as_str()],
			MessageContent::Parts(parts) => parts
				.iter()
				.filter_map(|part| match part {
					ContentPart::Text { text } => Some(text.as_str()),
					ContentPart::Image { .. } => None,
				})
				.collect(),
		}
	}

	pub fn has_image(&self) -> bool {
		match self {
			MessageContent::Text(_) => false,
			MessageContent::Parts(parts) => parts
				.iter()
				.any(|part| matches!(part, ContentPart::Image { .. })),
		}
	}
}

impl ContentPart {
	pub fn text(text: impl Into<String>) -> Self {
		ContentPart::Text { text: text.into() }
	}

	pub fn image(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
		ContentPart::Image {
			mime_type: mime_type.into(),
			data,
		}
	}
}

// Image bytes travel as standard base64 strings
mod base64_bytes {
	use base64::{engine::general_purpose, Engine as _};
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&general_purpose::STANDARD.encode(data))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let encoded = String::deserialize(deserializer)?;
		general_purpose::STANDARD
			.decode(encoded.as_bytes())
			.map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_transcript() -> Vec<Message> {
		vec![
			Message::system("You are a chef."),
			Message::user(MessageContent::Parts(vec![
				ContentPart::image(vec![0xFF, 0xD8, 0xFF, 0x00, 0x10], "image/jpeg"),
				ContentPart::text("What can I cook?"),
			])),
			Message::assistant(MessageContent::Text("Try an omelette.".to_string())),
			Message::user(MessageContent::Text("Something vegan?".to_string())),
		]
	}

	#[test]
	fn test_transcript_roundtrip_preserves_order_and_roles() {
		let transcript = sample_transcript();
		let json = serde_json::to_string(&transcript).unwrap();
		let restored: Vec<Message> = serde_json::from_str(&json).unwrap();

		assert_eq!(restored, transcript);
		let roles: Vec<Role> = restored.iter().map(Message::role).collect();
		assert_eq!(
			roles,
			vec![Role::System, Role::User, Role::Assistant, Role::User]
		);
	}

	#[test]
	fn test_wire_shape() {
		let message = Message::user(MessageContent::Parts(vec![
			ContentPart::image(b"abc".to_vec(), "image/png"),
			ContentPart::text("hi"),
		]));
		let value = serde_json::to_value(&message).unwrap();

		assert_eq!(value["role"], "user");
		assert_eq!(value["content"][0]["type"], "image");
		assert_eq!(value["content"][0]["mime_type"], "image/png");
		assert_eq!(value["content"][0]["data"], "YWJj");
		assert_eq!(value["content"][1]["type"], "text");
		assert_eq!(value["content"][1]["text"], "hi");

		let plain = serde_json::to_value(Message::system("rules")).unwrap();
		assert_eq!(plain, serde_json::json!({"role": "system", "content": "rules"}));
	}

	#[test]
	fn test_texts_skip_images() {
		let content = MessageContent::Parts(vec![
			ContentPart::image(vec![1, 2, 3], "image/png"),
			ContentPart::text("first"),
			ContentPart::text("second"),
		]);
		assert_eq!(content.texts(), vec!["first", "second"]);
		assert!(content.has_image());
		assert!(!MessageContent::Text("x".to_string()).has_image());
	}

	#[test]
	fn test_invalid_base64_is_rejected() {
		let json = r#"{"role":"user","content":[{"type":"image","mime_type":"image/png","data":"***"}]}"#;
		assert!(serde_json::from_str::<Message>(json).is_err());
	}
}
