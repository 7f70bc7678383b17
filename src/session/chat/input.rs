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

// User input handling

use crate::session::chat_helper::CommandHelper;
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor};

/// What the user typed, or why nothing was typed
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
	Line(String),
	/// Ctrl+C: drop the current line and ask again
	Cancelled,
	/// Ctrl+D: end the session
	Eof,
}

/// Line editor kept for the whole run so history survives between turns
pub struct InputReader {
	editor: Editor<CommandHelper, DefaultHistory>,
}

impl InputReader {
	pub fn new() -> Result<Self> {
		let config = RustylineConfig::builder()
			.completion_type(CompletionType::List)
			.edit_mode(EditMode::Emacs)
			.auto_add_history(true)
			.bell_style(rustyline::config::BellStyle::None)
			.build();

		let mut editor = Editor::with_config(config)?;
		editor.set_helper(Some(CommandHelper::new()));

		Ok(Self { editor })
	}

	pub fn read(&mut self, prompt: &str) -> Result<UserInput> {
		match self.editor.readline(&prompt.bright_blue().to_string()) {
			Ok(line) => Ok(UserInput::Line(line)),
			Err(ReadlineError::Interrupted) => {
				println!("\nCancelled");
				Ok(UserInput::Cancelled)
			}
			Err(ReadlineError::Eof) => Ok(UserInput::Eof),
			Err(err) => Err(err.into()),
		}
	}
}

/// Hidden prompt for the API key; nothing is echoed or stored in history
pub fn read_api_key() -> Result<String> {
	let key = rpassword::prompt_password("Google AI Studio API key: ".bright_yellow().to_string())?;
	Ok(key.trim().to_string())
}
