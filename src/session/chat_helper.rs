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

// Slash-command completion, hints and highlighting for rustyline

use colored::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow::{self, Borrowed, Owned};

struct CommandCompleter {
	commands: Vec<String>,
}

impl CommandCompleter {
	fn new() -> Self {
		let commands = crate::session::chat::COMMANDS
			.iter()
			.map(|&s| s.to_string())
			.collect();
		Self { commands }
	}

	fn candidates<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a String> + 'a {
		self.commands.iter().filter(move |cmd| cmd.starts_with(line))
	}
}

impl Completer for CommandCompleter {
	type Candidate = Pair;

	fn complete(
		&self,
		line: &str,
		_pos: usize,
		_ctx: &rustyline::Context<'_>,
	) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
		if !line.starts_with('/') {
			return Ok((0, vec![]));
		}

		let candidates = self
			.candidates(line)
			.map(|cmd| Pair {
				display: cmd.clone(),
				replacement: cmd.clone(),
			})
			.collect();

		Ok((0, candidates))
	}
}

impl Hinter for CommandCompleter {
	type Hint = String;

	fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
		if !line.starts_with('/') {
			return None;
		}

		self.candidates(line)
			.next()
			.map(|cmd| cmd[line.len()..].to_string())
	}
}

impl Highlighter for CommandCompleter {
	fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
		let command = line.split_whitespace().next().unwrap_or_default();
		if line.starts_with('/') && self.commands.iter().any(|cmd| cmd.starts_with(command)) {
			Owned(line.green().to_string())
		} else {
			Borrowed(line)
		}
	}

	fn highlight_char(&self, _line: &str, _pos: usize) -> bool {
		false
	}

	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		Owned(hint.bright_black().to_string())
	}
}

pub struct CommandHelper {
	completer: CommandCompleter,
	hinter: HistoryHinter,
}

impl CommandHelper {
	pub fn new() -> Self {
		Self {
			completer: CommandCompleter::new(),
			hinter: HistoryHinter {},
		}
	}
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
	type Candidate = Pair;

	fn complete(
		&self,
		line: &str,
		pos: usize,
		ctx: &rustyline::Context<'_>,
	) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
		self.completer.complete(line, pos, ctx)
	}
}

impl Hinter for CommandHelper {
	type Hint = String;

	fn hint(&self, line: &str, pos: usize, ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
		if line.starts_with('/') {
			self.completer.hint(line, pos, ctx)
		} else {
			self.hinter.hint(line, pos, ctx)
		}
	}
}

impl Highlighter for CommandHelper {
	fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
		self.completer.highlight(line, pos)
	}

	fn highlight_char(&self, line: &str, pos: usize) -> bool {
		self.completer.highlight_char(line, pos)
	}

	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		self.completer.highlight_hint(hint)
	}
}

impl Validator for CommandHelper {}
