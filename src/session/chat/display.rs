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

// Terminal output for the chat

use super::commands::*;
use super::markdown::{is_markdown_content, MarkdownRenderer};
use crate::session::transcript::{render, role_label, DisplayEntry};
use crate::session::{ImageAttachment, Role, Session};
use colored::*;

/// The photo is shown once, above the conversation
pub fn print_image_header(image: &ImageAttachment) {
	println!("{} {}", "📷 Ingredients photo:".bright_cyan(), image.summary().bright_white());
}

pub fn print_entry(entry: &DisplayEntry<'_>, renderer: Option<&MarkdownRenderer>) {
	let label = role_label(entry.role);
	match entry.role {
		Role::User => {
			println!("{} {}", format!("{}:", label).bright_blue().bold(), entry.texts.join("\n"));
		}
		Role::Assistant => {
			println!("{}", format!("{}:", label).bright_green().bold());
			let text = entry.texts.join("\n\n");
			match renderer {
				Some(renderer) if is_markdown_content(&text) => renderer.render_and_print(&text),
				_ => println!("{}", text.bright_green()),
			}
		}
		Role::System => {}
	}
	println!();
}

/// Redraw the whole conversation, e.g. after `/clear`
pub fn print_transcript(session: &Session, renderer: Option<&MarkdownRenderer>) {
	if let Some(image) = session.image() {
		print_image_header(image);
		println!();
	}
	for entry in render(session.transcript()) {
		print_entry(&entry, renderer);
	}
}

pub fn print_session_info(session: &Session) {
	let info = session.info();

	println!("{}", "───────────── Session Information ─────────────".bright_cyan());
	println!("{} {}", "Session name:".yellow(), info.name.bright_white());
	println!(
		"{} {}",
		"Started:".yellow(),
		info.started_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_white()
	);
	println!("{} {}", "Model:".yellow(), info.model.bright_white());

	match session.image() {
		Some(image) => println!("{} {}", "Photo:".yellow(), image.summary().bright_white()),
		None => println!("{} {}", "Photo:".yellow(), "none yet".bright_black()),
	}

	let turns = render(session.transcript())
		.filter(|entry| entry.role == Role::User)
		.count();
	println!("{} {}", "Questions asked:".yellow(), turns);
	println!("{} {}", "Requests:".yellow(), info.requests);
	println!(
		"{} {} input, {} output",
		"Tokens:".yellow(),
		info.input_tokens.to_string().bright_blue(),
		info.output_tokens.to_string().bright_green()
	);
	println!("{} ${:.5}", "Estimated cost:".yellow(), info.total_cost);
	println!(
		"{} {:.1}s",
		"Time in API:".yellow(),
		info.total_api_time_ms as f64 / 1000.0
	);
	if let Some(last_reply_at) = info.last_reply_at {
		println!(
			"{} {}",
			"Last reply:".yellow(),
			last_reply_at.format("%H:%M:%S").to_string().bright_white()
		);
	}
	println!();
}

pub fn print_help() {
	println!("{}", "\nAvailable commands:\n".bright_cyan());
	println!("{} - Show this help message", HELP_COMMAND.cyan());
	println!(
		"{} <path> - Attach the photo of your ingredients (JPEG or PNG, once per session)",
		IMAGE_COMMAND.cyan()
	);
	println!("{} - Show session details, token usage and cost", INFO_COMMAND.cyan());
	println!(
		"{} - Start over with a new photo (keeps your API key)",
		NEW_COMMAND.cyan()
	);
	println!("{} - Clear the screen and redraw the conversation", CLEAR_COMMAND.cyan());
	println!("{} or {} - End the session", EXIT_COMMAND.cyan(), QUIT_COMMAND.cyan());
	println!();
}
