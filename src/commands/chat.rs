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

use clap::Args;
use std::path::PathBuf;

use recipe_chat::config::Config;

#[derive(Args, Debug, Default)]
pub struct ChatArgs {
	/// Photo of your ingredients to start with (JPEG or PNG)
	#[arg(long, short)]
	pub image: Option<PathBuf>,

	/// Use a specific model instead of the one configured (provider:model format)
	#[arg(long)]
	pub model: Option<String>,

	/// Temperature for the model reply (0.0 to 2.0)
	#[arg(long)]
	pub temperature: Option<f32>,
}

/// Runtime overrides only; the config file is left alone
pub fn apply_overrides(args: &ChatArgs, config: &mut Config) -> Result<(), anyhow::Error> {
	if let Some(model) = &args.model {
		config.model = model.clone();
	}
	if let Some(temperature) = args.temperature {
		config.temperature = temperature;
	}
	config.validate()
}

pub async fn execute(args: &ChatArgs, mut config: Config) -> Result<(), anyhow::Error> {
	apply_overrides(args, &mut config)?;
	recipe_chat::session::chat::run_interactive_session(&config, args.image.clone()).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_overrides_apply_to_runtime_config() {
		let args = ChatArgs {
			model: Some("google:gemini-2.5-pro".to_string()),
			temperature: Some(0.2),
			..Default::default()
		};
		let mut config = Config::default();
		apply_overrides(&args, &mut config).unwrap();

		assert_eq!(config.model, "google:gemini-2.5-pro");
		assert_eq!(config.temperature, 0.2);
	}

	#[test]
	fn test_invalid_override_is_rejected() {
		let args = ChatArgs {
			temperature: Some(5.0),
			..Default::default()
		};
		assert!(apply_overrides(&args, &mut Config::default()).is_err());

		let args = ChatArgs {
			model: Some("gemini-2.5-flash".to_string()),
			..Default::default()
		};
		assert!(apply_overrides(&args, &mut Config::default()).is_err());
	}
}
