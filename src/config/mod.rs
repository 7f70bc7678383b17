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

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::PathBuf;

pub mod loading;
pub mod validation;

/// Environment variables checked for the model credential, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub enum LogLevel {
	#[default]
	#[serde(rename = "none")]
	None,
	#[serde(rename = "info")]
	Info,
	#[serde(rename = "debug")]
	Debug,
}

impl LogLevel {
	/// Check if info logging is enabled
	pub fn is_info_enabled(&self) -> bool {
		matches!(self, LogLevel::Info | LogLevel::Debug)
	}

	/// Check if debug logging is enabled
	pub fn is_debug_enabled(&self) -> bool {
		matches!(self, LogLevel::Debug)
	}
}

impl std::str::FromStr for LogLevel {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"none" => Ok(LogLevel::None),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			_ => Err(anyhow::anyhow!(
				"Invalid log level '{}'. Use none, info or debug",
				s
			)),
		}
	}
}

// Default functions
fn default_model() -> String {
	"google:gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
	0.7
}

fn default_max_output_tokens() -> u32 {
	2048
}

fn default_request_timeout_seconds() -> u64 {
	120
}

fn default_api_base_url() -> String {
	"https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_enable_markdown_rendering() -> bool {
	true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
	#[serde(default)]
	pub log_level: LogLevel,

	// Model in provider:model format
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_output_tokens")]
	pub max_output_tokens: u32,
	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,
	#[serde(default = "default_api_base_url")]
	pub api_base_url: String,

	#[serde(default = "default_enable_markdown_rendering")]
	pub enable_markdown_rendering: bool,

	// Replaces the built-in chef instruction when set
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub system_prompt: Option<String>,

	// Credential picked up from the environment; never written to disk
	#[serde(skip)]
	pub api_key: Option<String>,

	#[serde(skip)]
	config_path: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_level: LogLevel::default(),
			model: default_model(),
			temperature: default_temperature(),
			max_output_tokens: default_max_output_tokens(),
			request_timeout_seconds: default_request_timeout_seconds(),
			api_base_url: default_api_base_url(),
			enable_markdown_rendering: default_enable_markdown_rendering(),
			system_prompt: None,
			api_key: None,
			config_path: None,
		}
	}
}

impl Config {
	/// Get the global log level
	pub fn get_log_level(&self) -> LogLevel {
		self.log_level.clone()
	}

	/// System instruction placed at the head of every transcript
	pub fn get_system_prompt(&self) -> String {
		match &self.system_prompt {
			Some(prompt) if !prompt.trim().is_empty() => prompt.clone(),
			_ => crate::session::DEFAULT_SYSTEM_PROMPT.to_string(),
		}
	}

	/// Path the config was loaded from or will be saved to
	pub fn config_path(&self) -> Option<&PathBuf> {
		self.config_path.as_ref()
	}
}

// Logging macros for different log levels
// These macros automatically check the current log level and only print if appropriate

thread_local! {
	static CURRENT_CONFIG: RefCell<Option<Config>> = const { RefCell::new(None) };
}

/// Set the current config for the thread (to be used by logging macros)
pub fn set_thread_config(config: &Config) {
	CURRENT_CONFIG.with(|c| {
		*c.borrow_mut() = Some(config.clone());
	});
}

/// Get the current config for the thread
pub fn with_thread_config<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Config) -> R,
{
	CURRENT_CONFIG.with(|c| (*c.borrow()).as_ref().map(f))
}

/// Info logging macro with automatic cyan coloring
/// Shows info messages when log level is Info OR Debug
#[macro_export]
macro_rules! log_info {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.cyan());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).cyan());
			}
		}
	};
}

/// Debug logging macro with automatic bright blue coloring
#[macro_export]
macro_rules! log_debug {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.bright_blue());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).bright_blue());
			}
		}
	};
}

/// Error logging macro with automatic bright red coloring
/// Always visible regardless of log level
#[macro_export]
macro_rules! log_error {
	($fmt:expr) => {{
		use colored::Colorize;
		eprintln!("{}", $fmt.bright_red());
	}};
	($fmt:expr, $($arg:expr),*) => {{
		use colored::Colorize;
		eprintln!("{}", format!($fmt, $($arg),*).bright_red());
	}};
}
