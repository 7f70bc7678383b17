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

// Provider abstraction layer for remote multimodal models

use crate::config::Config;
use crate::session::{ChatError, Message, MessageContent};
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub mod google;

pub use google::GoogleGeminiProvider;

/// Common token usage structure across providers
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
	pub prompt_tokens: u64, // Everything we sent, image included
	pub output_tokens: u64, // Generated tokens, reasoning included
	pub total_tokens: u64,
	#[serde(default)]
	pub cost: Option<f64>,
	#[serde(default)]
	pub request_time_ms: Option<u64>,
}

/// Bookkeeping for one completed model call
#[derive(Debug, Clone)]
pub struct ProviderExchange {
	pub completed_at: DateTime<Local>,
	pub usage: Option<TokenUsage>,
	pub provider: String,
}

impl ProviderExchange {
	pub fn new(usage: Option<TokenUsage>, provider: &str) -> Self {
		Self {
			completed_at: Local::now(),
			usage,
			provider: provider.to_string(),
		}
	}
}

/// Provider response containing the model reply
#[derive(Debug, Clone)]
pub struct ProviderResponse {
	pub content: MessageContent,
	pub exchange: ProviderExchange,
	pub finish_reason: Option<String>,
}

/// Trait that all model providers implement
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
	/// Provider name as used in the model prefix
	fn name(&self) -> &str;

	/// Check if the provider supports the given model
	fn supports_model(&self, model: &str) -> bool;

	/// Check if the model accepts image input
	fn supports_vision(&self, _model: &str) -> bool {
		false
	}

	/// Send the whole transcript and return the reply
	async fn chat_completion(
		&self,
		messages: &[Message],
		model: &str,
		temperature: f32,
		api_key: &str,
		config: &Config,
	) -> Result<ProviderResponse, ChatError>;
}

/// Provider factory to create the appropriate provider based on model string
pub struct ProviderFactory;

impl ProviderFactory {
	/// Parse a model string in format "provider:model" and return (provider_name, model_name)
	pub fn parse_model(model: &str) -> Result<(String, String)> {
		if let Some((provider, model_name)) = model.split_once(':') {
			if provider.is_empty() || model_name.is_empty() {
				return Err(anyhow::anyhow!(
					"Invalid model format. Use 'provider:model' (e.g., 'google:gemini-2.5-flash')"
				));
			}

			Ok((provider.to_string(), model_name.to_string()))
		} else {
			Err(anyhow::anyhow!(
				"Invalid model format '{}'. Must specify provider like 'google:gemini-2.5-flash'",
				model
			))
		}
	}

	/// Create a provider instance based on the provider name
	pub fn create_provider(provider_name: &str) -> Result<Box<dyn AiProvider>> {
		match provider_name.to_lowercase().as_str() {
			"google" => Ok(Box::new(GoogleGeminiProvider::new())),
			_ => Err(anyhow::anyhow!(
				"Unsupported provider: {}. Supported providers: google",
				provider_name
			)),
		}
	}

	/// Get the appropriate provider for a given model string
	pub fn get_provider_for_model(model: &str) -> Result<(Box<dyn AiProvider>, String)> {
		let (provider_name, model_name) = Self::parse_model(model)?;
		let provider = Self::create_provider(&provider_name)?;

		if !provider.supports_model(&model_name) {
			return Err(anyhow::anyhow!(
				"Provider '{}' does not support model '{}'",
				provider_name,
				model_name
			));
		}

		Ok((provider, model_name))
	}
}
