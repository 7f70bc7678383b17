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

use recipe_chat::config::{Config, LogLevel, API_KEY_ENV_VARS};
use recipe_chat::directories;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
	/// Set the model (provider:model format, e.g., google:gemini-2.5-flash)
	#[arg(long)]
	pub model: Option<String>,

	/// Set the default temperature (0.0 to 2.0)
	#[arg(long)]
	pub temperature: Option<f32>,

	/// Set log level (none, info, debug)
	#[arg(long)]
	pub log_level: Option<String>,

	/// Enable markdown rendering for model replies
	#[arg(long)]
	pub markdown_enable: Option<bool>,

	/// Set custom system prompt (or 'default' to reset to the built-in chef)
	#[arg(long)]
	pub system: Option<String>,

	/// Show current configuration values with defaults
	#[arg(long)]
	pub show: bool,

	/// Validate configuration without making changes
	#[arg(long)]
	pub validate: bool,
}

/// Apply the requested edits; returns whether anything changed
pub fn apply_changes(args: &ConfigArgs, config: &mut Config) -> Result<bool, anyhow::Error> {
	let mut modified = false;

	if let Some(model) = &args.model {
		config.model = model.clone();
		config.validate_model()?;
		println!("Set model to {}", model);
		modified = true;
	}

	if let Some(temperature) = args.temperature {
		config.temperature = temperature;
		config.validate_generation_settings()?;
		println!("Set temperature to {}", temperature);
		modified = true;
	}

	if let Some(log_level) = &args.log_level {
		config.log_level = log_level.parse::<LogLevel>()?;
		println!("Set log level to {:?}", config.log_level);
		modified = true;
	}

	if let Some(enable_markdown) = args.markdown_enable {
		config.enable_markdown_rendering = enable_markdown;
		println!(
			"Markdown rendering {}",
			if enable_markdown { "enabled" } else { "disabled" }
		);
		modified = true;
	}

	if let Some(system_prompt) = &args.system {
		if system_prompt.to_lowercase() == "default" {
			config.system_prompt = None;
			println!("Reset system prompt to default");
		} else {
			config.system_prompt = Some(system_prompt.clone());
			println!("Set custom system prompt");
		}
		modified = true;
	}

	Ok(modified)
}

// Handle the configuration command
pub fn execute(args: &ConfigArgs, mut config: Config) -> Result<(), anyhow::Error> {
	if args.show {
		show_configuration(&config)?;
		return Ok(());
	}

	if args.validate {
		return match config.validate() {
			Ok(()) => {
				println!("✅ Configuration is valid!");
				Ok(())
			}
			Err(e) => {
				eprintln!("❌ Configuration validation failed: {}", e);
				Err(e)
			}
		};
	}

	if apply_changes(args, &mut config)? {
		if let Err(e) = config.save() {
			eprintln!("Error saving configuration: {}", e);
			return Err(e);
		}
	} else {
		let config_path = directories::get_config_file_path()?;
		if config_path.exists() {
			println!(
				"Configuration file already exists at: {}",
				config_path.display()
			);
			println!("No changes were made to the configuration.");
		} else {
			Config::default().save_to_path(&config_path)?;
			println!(
				"Created default configuration file at: {}",
				config_path.display()
			);
		}
	}

	println!();
	show_configuration(&config)
}

fn show_configuration(config: &Config) -> Result<(), anyhow::Error> {
	let config_path = match config.config_path() {
		Some(path) => path.clone(),
		None => directories::get_config_file_path()?,
	};

	println!("Configuration file: {}", config_path.display());
	println!("Model: {}", config.model);
	println!("Temperature: {}", config.temperature);
	println!("Max output tokens: {}", config.max_output_tokens);
	println!("Request timeout: {}s", config.request_timeout_seconds);
	println!("API base URL: {}", config.api_base_url);
	println!("Log level: {:?}", config.log_level);
	println!(
		"Markdown rendering: {}",
		if config.enable_markdown_rendering { "enabled" } else { "disabled" }
	);
	println!(
		"System prompt: {}",
		if config.system_prompt.is_some() { "custom" } else { "default" }
	);

	// API keys are only read from the environment
	println!("API key (from environment variables):");
	for name in API_KEY_ENV_VARS {
		let status = match std::env::var(name) {
			Ok(value) if !value.trim().is_empty() => "set",
			_ => "not set",
		};
		println!("  {}: {}", name, status);
	}

	Ok(())
}
