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

// Sends the transcript to the model and records the reply

use super::message::Message;
use super::providers::{AiProvider, ProviderFactory};
use super::state::Session;
use super::ChatError;
use crate::config::Config;
use crate::log_debug;
use anyhow::Result;

pub struct ModelClient {
	provider: Box<dyn AiProvider>,
	model: String,
	temperature: f32,
	config: Config,
}

impl ModelClient {
	/// Resolve the provider from a `provider:model` string
	pub fn from_config(config: &Config) -> Result<Self> {
		let (provider, model) = ProviderFactory::get_provider_for_model(&config.model)?;
		Ok(Self::with_provider(provider, model, config))
	}

	pub fn with_provider(provider: Box<dyn AiProvider>, model: String, config: &Config) -> Self {
		Self {
			provider,
			model,
			temperature: config.temperature,
			config: config.clone(),
		}
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn provider_name(&self) -> &str {
		self.provider.name()
	}

	/// Send the whole transcript and append the reply unchanged.
	///
	/// Nothing is appended on failure; the user message of the turn stays.
	pub async fn invoke<'a>(&self, session: &'a mut Session) -> Result<&'a Message, ChatError> {
		let api_key = session
			.credential()
			.ok_or_else(|| ChatError::Auth("No API key configured".to_string()))?
			.to_string();

		log_debug!(
			"Sending {} messages to {}:{}",
			session.transcript().len(),
			self.provider.name(),
			self.model
		);

		let response = self
			.provider
			.chat_completion(
				session.transcript(),
				&self.model,
				self.temperature,
				&api_key,
				&self.config,
			)
			.await?;

		if let Some(reason) = &response.finish_reason {
			log_debug!("{} finished: {}", response.exchange.provider, reason);
		}
		session.record_exchange(&response.exchange);
		session.append_message(Message::assistant(response.content))?;

		// append_message succeeded, so the transcript is non-empty
		session
			.transcript()
			.last()
			.ok_or_else(|| ChatError::Validation("Transcript is empty".to_string()))
	}
}
