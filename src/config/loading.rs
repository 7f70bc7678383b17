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

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{Config, API_KEY_ENV_VARS};

impl Config {
	/// Load configuration from the system-wide config file
	pub fn load() -> Result<Self> {
		let config_path = crate::directories::get_config_file_path()?;

		let mut config = if config_path.exists() {
			let config_str = fs::read_to_string(&config_path).context(format!(
				"Failed to read config from {}",
				config_path.display()
			))?;
			let config: Config =
				toml::from_str(&config_str).context("Failed to parse TOML configuration")?;

			// Validate the loaded configuration
			if let Err(e) = config.validate() {
				eprintln!("Configuration validation warning: {}", e);
				eprintln!("The application will continue, but you may want to fix these issues.");
			}

			config
		} else {
			Config::default()
		};

		config.config_path = Some(config_path);

		// Environment variables take precedence over config file values
		config.apply_env_overrides(|name| std::env::var(name).ok());

		Ok(config)
	}

	/// Pick up the credential from the first non-empty variable in API_KEY_ENV_VARS
	pub fn apply_env_overrides<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		for name in API_KEY_ENV_VARS {
			if let Some(value) = lookup(name) {
				let value = value.trim();
				if !value.is_empty() {
					self.api_key = Some(value.to_string());
					return;
				}
			}
		}
	}

	/// Save configuration to file
	pub fn save(&self) -> Result<()> {
		let config_path = if let Some(path) = &self.config_path {
			path.clone()
		} else {
			crate::directories::get_config_file_path()?
		};

		self.save_to_path(&config_path)?;
		println!("Configuration saved to {}", config_path.display());
		Ok(())
	}

	/// Load configuration from a specific file path
	pub fn load_from_path(path: &Path) -> Result<Self> {
		let config_str = fs::read_to_string(path)
			.context(format!("Failed to read config from {}", path.display()))?;
		let mut config: Config =
			toml::from_str(&config_str).context("Failed to parse TOML configuration")?;

		config.config_path = Some(path.to_path_buf());

		config.validate()?;

		Ok(config)
	}

	/// Save configuration to a specific file path
	pub fn save_to_path(&self, path: &Path) -> Result<()> {
		// Validate before saving
		self.validate()?;

		// Ensure the parent directory exists
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context(format!(
				"Failed to create config directory: {}",
				parent.display()
			))?;
		}

		let config_str =
			toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

		fs::write(path, config_str)
			.context(format!("Failed to write config to {}", path.display()))?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::LogLevel;

	#[test]
	fn test_save_and_load_roundtrip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.toml");

		let config = Config {
			log_level: LogLevel::Debug,
			model: "google:gemini-2.0-flash".to_string(),
			temperature: 0.3,
			system_prompt: Some("Only vegetarian recipes.".to_string()),
			api_key: Some("do-not-store".to_string()),
			..Default::default()
		};
		config.save_to_path(&path).unwrap();

		let written = fs::read_to_string(&path).unwrap();
		assert!(!written.contains("do-not-store"));

		let loaded = Config::load_from_path(&path).unwrap();
		assert_eq!(loaded.log_level, LogLevel::Debug);
		assert_eq!(loaded.model, "google:gemini-2.0-flash");
		assert_eq!(loaded.temperature, 0.3);
		assert_eq!(
			loaded.system_prompt.as_deref(),
			Some("Only vegetarian recipes.")
		);
		assert!(loaded.api_key.is_none());
		assert_eq!(loaded.config_path(), Some(&path));
	}

	#[test]
	fn test_load_from_path_rejects_invalid_values() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		fs::write(&path, "temperature = 5.0\n").unwrap();

		assert!(Config::load_from_path(&path).is_err());
	}

	#[test]
	fn test_env_precedence() {
		let mut config = Config::default();
		config.apply_env_overrides(|name| match name {
			"GOOGLE_API_KEY" => Some("google-key".to_string()),
			"GEMINI_API_KEY" => Some("gemini-key".to_string()),
			_ => None,
		});
		assert_eq!(config.api_key.as_deref(), Some("google-key"));

		let mut config = Config::default();
		config.apply_env_overrides(|name| match name {
			"GOOGLE_API_KEY" => Some("  ".to_string()),
			"GEMINI_API_KEY" => Some(" gemini-key ".to_string()),
			_ => None,
		});
		assert_eq!(config.api_key.as_deref(), Some("gemini-key"));

		let mut config = Config::default();
		config.apply_env_overrides(|_| None);
		assert!(config.api_key.is_none());
	}
}
