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

use anyhow::{anyhow, Result};

use super::Config;

impl Config {
	/// Validate the configuration for common issues
	pub fn validate(&self) -> Result<()> {
		self.validate_model()?;
		self.validate_generation_settings()?;

		if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
		{
			return Err(anyhow!(
				"Invalid api_base_url '{}'. Must start with http:// or https://",
				self.api_base_url
			));
		}

		Ok(())
	}

	pub fn validate_model(&self) -> Result<()> {
		let (provider_name, model_name) =
			crate::session::ProviderFactory::parse_model(&self.model)?;

		let provider = crate::session::ProviderFactory::create_provider(&provider_name)
			.map_err(|_| anyhow!("Unsupported provider: '{}'. Supported providers: google", provider_name))?;

		if !provider.supports_model(&model_name) {
			return Err(anyhow!(
				"Provider '{}' does not support model '{}'",
				provider_name,
				model_name
			));
		}

		if !provider.supports_vision(&model_name) {
			return Err(anyhow!(
				"Model '{}' cannot read images; pick a multimodal Gemini model",
				model_name
			));
		}

		Ok(())
	}

	pub fn validate_generation_settings(&self) -> Result<()> {
		if !(0.0..=2.0).contains(&self.temperature) {
			return Err(anyhow!(
				"Temperature out of range: {}. Allowed range: 0.0 to 2.0",
				self.temperature
			));
		}

		if self.max_output_tokens == 0 {
			return Err(anyhow!("max_output_tokens must be greater than 0"));
		}

		if self.request_timeout_seconds == 0 {
			return Err(anyhow!("request_timeout_seconds must be greater than 0"));
		}

		Ok(())
	}
}
