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

// Chat commands

pub const HELP_COMMAND: &str = "/help";
pub const IMAGE_COMMAND: &str = "/image";
pub const INFO_COMMAND: &str = "/info";
pub const NEW_COMMAND: &str = "/new";
pub const CLEAR_COMMAND: &str = "/clear";
pub const EXIT_COMMAND: &str = "/exit";
pub const QUIT_COMMAND: &str = "/quit";

// List of all available commands for autocomplete
pub const COMMANDS: [&str; 7] = [
	HELP_COMMAND,
	IMAGE_COMMAND,
	INFO_COMMAND,
	NEW_COMMAND,
	CLEAR_COMMAND,
	EXIT_COMMAND,
	QUIT_COMMAND,
];

#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
	Help,
	/// Attach a photo; `None` when the path is missing
	Image(Option<String>),
	Info,
	New,
	Clear,
	Exit,
	Unknown(String),
}

impl ChatCommand {
	/// Parse a line starting with `/`; anything else is chat text
	pub fn parse(input: &str) -> Option<Self> {
		let input = input.trim();
		if !input.starts_with('/') {
			return None;
		}

		let (name, rest) = match input.split_once(char::is_whitespace) {
			Some((name, rest)) => (name, rest.trim()),
			None => (input, ""),
		};

		let command = match name {
			HELP_COMMAND => ChatCommand::Help,
			IMAGE_COMMAND => {
				let path = strip_quotes(rest);
				ChatCommand::Image((!path.is_empty()).then(|| path.to_string()))
			}
			INFO_COMMAND => ChatCommand::Info,
			NEW_COMMAND => ChatCommand::New,
			CLEAR_COMMAND => ChatCommand::Clear,
			EXIT_COMMAND | QUIT_COMMAND => ChatCommand::Exit,
			other => ChatCommand::Unknown(other.to_string()),
		};
		Some(command)
	}
}

/// Paths dragged into a terminal often arrive quoted
pub fn strip_quotes(path: &str) -> &str {
	let path = path.trim();
	for quote in ['"', '\''] {
		if let Some(inner) = path
			.strip_prefix(quote)
			.and_then(|rest| rest.strip_suffix(quote))
		{
			return inner;
		}
	}
	path
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_text_is_not_a_command() {
		assert_eq!(ChatCommand::parse("what can I cook?"), None);
		assert_eq!(ChatCommand::parse("  "), None);
	}

	#[test]
	fn test_parse_known_commands() {
		assert_eq!(ChatCommand::parse("/help"), Some(ChatCommand::Help));
		assert_eq!(ChatCommand::parse(" /info "), Some(ChatCommand::Info));
		assert_eq!(ChatCommand::parse("/new"), Some(ChatCommand::New));
		assert_eq!(ChatCommand::parse("/clear"), Some(ChatCommand::Clear));
		assert_eq!(ChatCommand::parse("/exit"), Some(ChatCommand::Exit));
		assert_eq!(ChatCommand::parse("/quit"), Some(ChatCommand::Exit));
	}

	#[test]
	fn test_parse_image_path() {
		assert_eq!(
			ChatCommand::parse("/image ~/Pictures/fridge shelf.jpg"),
			Some(ChatCommand::Image(Some("~/Pictures/fridge shelf.jpg".to_string())))
		);
		assert_eq!(
			ChatCommand::parse("/image '/tmp/eggs.png'"),
			Some(ChatCommand::Image(Some("/tmp/eggs.png".to_string())))
		);
		assert_eq!(ChatCommand::parse("/image"), Some(ChatCommand::Image(None)));
	}

	#[test]
	fn test_unknown_command() {
		assert_eq!(
			ChatCommand::parse("/save now"),
			Some(ChatCommand::Unknown("/save".to_string()))
		);
	}

	#[test]
	fn test_strip_quotes() {
		assert_eq!(strip_quotes("\"a b.jpg\""), "a b.jpg");
		assert_eq!(strip_quotes("plain.png"), "plain.png");
		assert_eq!(strip_quotes("'unbalanced.png"), "'unbalanced.png");
	}
}
