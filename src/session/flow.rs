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

// Session lifecycle transitions
//
//   AwaitingCredential --credential--> AwaitingImage --image--> Conversing
//   Conversing --text--> (request, model call, reply) --> Conversing
//
// A rejected credential drops back to AwaitingCredential; the photo stays.

use super::client::ModelClient;
use super::image::ImageAttachment;
use super::request::build_user_turn;
use super::state::{Phase, Session};
use super::ChatError;
use crate::log_info;

/// Something the user did
#[derive(Debug, Clone)]
pub enum Event {
	CredentialSupplied(String),
	ImageUploaded(ImageAttachment),
	TextSubmitted(String),
}

/// Apply one event and return the phase the session ends up in.
///
/// Errors end the turn, never the session.
pub async fn transition(
	session: &mut Session,
	client: &ModelClient,
	event: Event,
) -> Result<Phase, ChatError> {
	match event {
		Event::CredentialSupplied(key) => on_credential(session, &key),
		Event::ImageUploaded(image) => on_image(session, image),
		Event::TextSubmitted(text) => on_text(session, client, &text).await,
	}
}

pub fn on_credential(session: &mut Session, key: &str) -> Result<Phase, ChatError> {
	session.set_credential(key)?;
	Ok(session.phase())
}

pub fn on_image(session: &mut Session, image: ImageAttachment) -> Result<Phase, ChatError> {
	if session.phase() == Phase::AwaitingCredential {
		return Err(ChatError::Auth("Enter an API key first".to_string()));
	}

	if !session.set_image(image) {
		log_info!("A photo is already attached; keeping it");
	}
	Ok(session.phase())
}

pub async fn on_text(
	session: &mut Session,
	client: &ModelClient,
	text: &str,
) -> Result<Phase, ChatError> {
	match session.phase() {
		Phase::AwaitingCredential => {
			return Err(ChatError::Auth("Enter an API key first".to_string()));
		}
		Phase::AwaitingImage => {
			return Err(ChatError::Validation(
				"Upload a photo of your ingredients first".to_string(),
			));
		}
		Phase::Conversing => {}
	}

	build_user_turn(session, text)?;

	let result = client.invoke(session).await.map(|_| ());
	match result {
		Ok(()) => Ok(session.phase()),
		Err(err) => {
			if err.is_auth() {
				session.clear_credential();
			}
			Err(err)
		}
	}
}
