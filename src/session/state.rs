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

// In-memory state of one conversation

use super::image::ImageAttachment;
use super::message::Message;
use super::providers::{ProviderExchange, TokenUsage};
use super::ChatError;
use chrono::{DateTime, Local};
use uuid::Uuid;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	AwaitingCredential,
	AwaitingImage,
	Conversing,
}

/// Running totals shown by /info
#[derive(Debug, Clone)]
pub struct SessionInfo {
	pub name: String,
	pub started_at: DateTime<Local>,
	pub model: String,
	pub requests: u64,
	pub input_tokens: u64,
	pub output_tokens: u64,
	pub total_cost: f64,
	pub total_api_time_ms: u64,
	pub last_reply_at: Option<DateTime<Local>>,
}

/// One user's conversation: credential, photo and transcript.
///
/// The transcript always starts with exactly one System message; the image
/// can be set once and is never replaced.
#[derive(Debug, Clone)]
pub struct Session {
	info: SessionInfo,
	credential: Option<String>,
	image: Option<ImageAttachment>,
	transcript: Vec<Message>,
}

// Session name in format: YYMMDD-HHMMSS-uuid
fn generate_session_name(now: &DateTime<Local>) -> String {
	let uuid = Uuid::new_v4().to_string();
	format!("{}-{}", now.format("%y%m%d-%H%M%S"), &uuid[..8])
}

impl Session {
	pub fn new(system_prompt: impl Into<String>, model: impl Into<String>) -> Self {
		let now = Local::now();
		Self {
			info: SessionInfo {
				name: generate_session_name(&now),
				started_at: now,
				model: model.into(),
				requests: 0,
				input_tokens: 0,
				output_tokens: 0,
				total_cost: 0.0,
				total_api_time_ms: 0,
				last_reply_at: None,
			},
			credential: None,
			image: None,
			transcript: vec![Message::system(system_prompt)],
		}
	}

	/// Fresh conversation that keeps the credential and model of this one
	pub fn restart(&self) -> Self {
		let mut session = Session::new(self.system_prompt().to_string(), self.info.model.clone());
		session.credential = self.credential.clone();
		session
	}

	pub fn phase(&self) -> Phase {
		if self.credential.is_none() {
			Phase::AwaitingCredential
		} else if self.image.is_none() {
			Phase::AwaitingImage
		} else {
			Phase::Conversing
		}
	}

	pub fn set_credential(&mut self, key: &str) -> Result<(), ChatError> {
		let key = key.trim();
		if key.is_empty() {
			return Err(ChatError::Auth("API key is empty".to_string()));
		}
		self.credential = Some(key.to_string());
		Ok(())
	}

	/// Forget a credential the endpoint rejected
	pub fn clear_credential(&mut self) {
		self.credential = None;
	}

	pub fn credential(&self) -> Option<&str> {
		self.credential.as_deref()
	}

	/// Attach the photo. Returns false and changes nothing when one is already set.
	pub fn set_image(&mut self, image: ImageAttachment) -> bool {
		if self.image.is_some() {
			return false;
		}
		self.image = Some(image);
		true
	}

	pub fn image(&self) -> Option<&ImageAttachment> {
		self.image.as_ref()
	}

	pub fn has_image(&self) -> bool {
		self.image.is_some()
	}

	pub fn append_message(&mut self, message: Message) -> Result<(), ChatError> {
		if message.is_system() {
			return Err(ChatError::Validation(
				"The transcript already has its system instruction".to_string(),
			));
		}
		self.transcript.push(message);
		Ok(())
	}

	pub fn transcript(&self) -> &[Message] {
		&self.transcript
	}

	pub fn system_prompt(&self) -> &str {
		match self.transcript.first() {
			Some(Message::System(content)) => match content {
				super::MessageContent::Text(text) => text,
				super::MessageContent::Parts(_) => "",
			},
			_ => "",
		}
	}

	/// Count a completed request; usage is optional in replies
	pub fn record_usage(&mut self, usage: Option<&TokenUsage>) {
		self.info.requests += 1;
		let Some(usage) = usage else {
			return;
		};
		self.info.input_tokens += usage.prompt_tokens;
		self.info.output_tokens += usage.output_tokens;
		self.info.total_cost += usage.cost.unwrap_or(0.0);
		self.info.total_api_time_ms += usage.request_time_ms.unwrap_or(0);
	}

	/// Record a completed model call: its usage and when it came back
	pub fn record_exchange(&mut self, exchange: &ProviderExchange) {
		self.record_usage(exchange.usage.as_ref());
		self.info.last_reply_at = Some(exchange.completed_at);
	}

	pub fn info(&self) -> &SessionInfo {
		&self.info
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{ContentPart, MessageContent, Role};

	fn photo(name: &str) -> ImageAttachment {
		ImageAttachment {
			data: vec![0xFF, 0xD8, 0xFF, 0xE0],
			media_type: "image/jpeg".to_string(),
			file_name: name.to_string(),
		}
	}

	#[test]
	fn test_new_session_has_only_system_message() {
		let session = Session::new("You are Chef.", "google:gemini-2.5-flash");
		assert_eq!(session.transcript().len(), 1);
		assert_eq!(session.transcript()[0].role(), Role::System);
		assert_eq!(session.system_prompt(), "You are Chef.");
		assert!(session.image().is_none());
		assert_eq!(session.phase(), Phase::AwaitingCredential);
	}

	#[test]
	fn test_phase_follows_state() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		assert!(session.set_credential("   ").is_err());
		assert_eq!(session.phase(), Phase::AwaitingCredential);

		session.set_credential(" X ").unwrap();
		assert_eq!(session.credential(), Some("X"));
		assert_eq!(session.phase(), Phase::AwaitingImage);

		assert!(session.set_image(photo("cheese.jpg")));
		assert_eq!(session.phase(), Phase::Conversing);
	}

	#[test]
	fn test_second_image_is_ignored() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		assert!(session.set_image(photo("cheese.jpg")));
		assert!(!session.set_image(photo("tomato.png")));
		assert_eq!(session.image().unwrap().file_name, "cheese.jpg");
		assert_eq!(session.transcript().len(), 1);
	}

	#[test]
	fn test_second_system_message_rejected() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		let result = session.append_message(Message::system("other rules"));
		assert!(matches!(result, Err(ChatError::Validation(_))));
		assert_eq!(session.transcript().len(), 1);

		session
			.append_message(Message::user(MessageContent::Parts(vec![
				ContentPart::text("hi"),
			])))
			.unwrap();
		assert_eq!(session.transcript().len(), 2);
		assert!(session.transcript()[0].is_system());
	}

	#[test]
	fn test_restart_keeps_credential_only() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		session.set_credential("X").unwrap();
		session.set_image(photo("cheese.jpg"));
		session
			.append_message(Message::assistant(MessageContent::Text("hello".to_string())))
			.unwrap();

		let fresh = session.restart();
		assert_eq!(fresh.credential(), Some("X"));
		assert!(!fresh.has_image());
		assert_eq!(fresh.transcript().len(), 1);
		assert_eq!(fresh.system_prompt(), "sys");
		assert_eq!(fresh.phase(), Phase::AwaitingImage);
	}

	#[test]
	fn test_record_usage() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		session.record_usage(Some(&TokenUsage {
			prompt_tokens: 100,
			output_tokens: 20,
			total_tokens: 120,
			cost: Some(0.5),
			request_time_ms: Some(300),
		}));
		session.record_usage(Some(&TokenUsage {
			prompt_tokens: 50,
			output_tokens: 5,
			total_tokens: 55,
			cost: None,
			request_time_ms: None,
		}));
		session.record_usage(None);

		let info = session.info();
		assert_eq!(info.requests, 3);
		assert_eq!(info.input_tokens, 150);
		assert_eq!(info.output_tokens, 25);
		assert_eq!(info.total_cost, 0.5);
		assert_eq!(info.total_api_time_ms, 300);
	}

	#[test]
	fn test_record_exchange_stamps_last_reply() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		assert!(session.info().last_reply_at.is_none());

		let exchange = ProviderExchange::new(
			Some(TokenUsage {
				prompt_tokens: 7,
				output_tokens: 3,
				total_tokens: 10,
				cost: None,
				request_time_ms: Some(12),
			}),
			"google",
		);
		session.record_exchange(&exchange);

		let info = session.info();
		assert_eq!(info.requests, 1);
		assert_eq!(info.input_tokens, 7);
		assert_eq!(info.last_reply_at, Some(exchange.completed_at));
		assert!(info.last_reply_at.unwrap() >= info.started_at);
	}
}
