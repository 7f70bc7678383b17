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

// Multimodal user turn assembly

use super::message::{ContentPart, Message, MessageContent};
use super::state::Session;
use super::ChatError;

/// Append `[image, text]` as a User message and return the transcript to send.
///
/// Leaves the transcript untouched when there is no photo or no text.
pub fn build_user_turn<'a>(session: &'a mut Session, text: &str) -> Result<&'a [Message], ChatError> {
	let image = session.image().ok_or_else(|| {
		ChatError::Validation("Upload a photo of your ingredients first".to_string())
	})?;

	let text = text.trim();
	if text.is_empty() {
		return Err(ChatError::Validation("Message is empty".to_string()));
	}

	let message = Message::user(MessageContent::Parts(vec![
		ContentPart::image(image.data.clone(), image.media_type.clone()),
		ContentPart::text(text),
	]));
	session.append_message(message)?;

	Ok(session.transcript())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{ImageAttachment, Role};

	fn session_with_photo() -> Session {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		session.set_credential("X").unwrap();
		session.set_image(ImageAttachment {
			data: vec![0xFF, 0xD8, 0xFF],
			media_type: "image/jpeg".to_string(),
			file_name: "cheese.jpg".to_string(),
		});
		session
	}

	#[test]
	fn test_user_turn_is_image_then_text() {
		let mut session = session_with_photo();
		let transcript = build_user_turn(&mut session, "  What can I cook?  ").unwrap();

		assert_eq!(transcript.len(), 2);
		let last = &transcript[1];
		assert_eq!(last.role(), Role::User);
		assert_eq!(
			last.content(),
			&MessageContent::Parts(vec![
				ContentPart::image(vec![0xFF, 0xD8, 0xFF], "image/jpeg"),
				ContentPart::text("What can I cook?"),
			])
		);
	}

	#[test]
	fn test_every_turn_carries_the_image() {
		let mut session = session_with_photo();
		build_user_turn(&mut session, "first").unwrap();
		build_user_turn(&mut session, "second").unwrap();

		assert!(session.transcript()[1..]
			.iter()
			.all(|message| message.content().has_image()));
	}

	#[test]
	fn test_rejects_without_image() {
		let mut session = Session::new("sys", "google:gemini-2.5-flash");
		session.set_credential("X").unwrap();

		let result = build_user_turn(&mut session, "What can I cook?");
		assert!(matches!(result, Err(ChatError::Validation(_))));
		assert_eq!(session.transcript().len(), 1);
	}

	#[test]
	fn test_rejects_blank_text() {
		let mut session = session_with_photo();
		let result = build_user_turn(&mut session, "   ");
		assert!(matches!(result, Err(ChatError::Validation(_))));
		assert_eq!(session.transcript().len(), 1);
	}
}
