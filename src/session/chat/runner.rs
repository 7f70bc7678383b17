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

// Interactive session runner

use super::animation::show_loading_animation;
use super::commands::{strip_quotes, ChatCommand};
use super::display::{print_entry, print_help, print_image_header, print_session_info, print_transcript};
use super::input::{read_api_key, InputReader, UserInput};
use super::markdown::MarkdownRenderer;
use crate::config::{Config, API_KEY_ENV_VARS};
use crate::session::transcript::render;
use crate::session::{transition, ChatError, Event, ImageProcessor, ModelClient, Phase, Session};
use crate::{log_debug, log_error, log_info};
use anyhow::Result;
use colored::*;
use crossterm::{cursor, execute, terminal};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

enum Flow {
	Continue,
	Exit,
}

/// Everything one run of the chat needs besides the session itself
struct ChatUi {
	client: ModelClient,
	renderer: Option<MarkdownRenderer>,
	input: InputReader,
}

/// Run the chat until the user leaves.
///
/// `image` is attached as soon as a credential is available.
pub async fn run_interactive_session(config: &Config, image: Option<PathBuf>) -> Result<()> {
	let mut ui = ChatUi {
		client: ModelClient::from_config(config)?,
		renderer: config
			.enable_markdown_rendering
			.then(MarkdownRenderer::new),
		input: InputReader::new()?,
	};
	log_info!("Using {}:{}", ui.client.provider_name(), ui.client.model());

	let mut session = Session::new(config.get_system_prompt(), config.model.clone());
	let mut pending_image = image;

	println!("{}", "🍳 Recipe chat: show me your ingredients and I'll suggest what to cook.".bright_green());
	println!("Type /help for available commands.");
	println!();

	if let Some(key) = config.api_key.as_deref() {
		log_debug!("Using API key from the environment");
		if let Err(e) = transition(&mut session, &ui.client, Event::CredentialSupplied(key.to_string())).await {
			print_turn_error(&e);
		}
	}

	loop {
		let flow = match session.phase() {
			Phase::AwaitingCredential => ask_for_credential(&mut session, &ui).await?,
			Phase::AwaitingImage => match pending_image.take() {
				Some(path) => {
					attach_image(&mut session, &ui, &path).await;
					Flow::Continue
				}
				None => ask_for_image(&mut session, &mut ui).await?,
			},
			Phase::Conversing => converse(&mut session, &mut ui).await?,
		};

		if let Flow::Exit = flow {
			break;
		}
	}

	println!("Ending session. Enjoy your meal!");
	Ok(())
}

async fn ask_for_credential(session: &mut Session, ui: &ChatUi) -> Result<Flow> {
	println!(
		"{}",
		format!(
			"An API key is needed. Set {} or paste one below (input is hidden).",
			API_KEY_ENV_VARS.join(" or ")
		)
		.bright_yellow()
	);

	let key = read_api_key()?;
	if key.is_empty() {
		println!("No API key given.");
		return Ok(Flow::Exit);
	}

	match transition(session, &ui.client, Event::CredentialSupplied(key)).await {
		Ok(_) => println!("{}", "API key set.".bright_green()),
		Err(e) => print_turn_error(&e),
	}
	Ok(Flow::Continue)
}

async fn ask_for_image(session: &mut Session, ui: &mut ChatUi) -> Result<Flow> {
	println!(
		"{}",
		format!(
			"Upload a photo of your ingredients: type its path ({}).",
			ImageProcessor::supported_extensions().join(", ")
		)
		.bright_yellow()
	);

	let line = match ui.input.read("photo> ")? {
		UserInput::Line(line) => line,
		UserInput::Cancelled => return Ok(Flow::Continue),
		UserInput::Eof => return Ok(Flow::Exit),
	};

	if let Some(command) = ChatCommand::parse(&line) {
		return handle_command(command, session, ui).await;
	}

	let path = strip_quotes(&line);
	if !path.is_empty() {
		attach_image(session, ui, &expand_home(path)).await;
	}
	Ok(Flow::Continue)
}

async fn converse(session: &mut Session, ui: &mut ChatUi) -> Result<Flow> {
	let line = match ui.input.read("> ")? {
		UserInput::Line(line) => line,
		UserInput::Cancelled => return Ok(Flow::Continue),
		UserInput::Eof => return Ok(Flow::Exit),
	};

	if let Some(command) = ChatCommand::parse(&line) {
		return handle_command(command, session, ui).await;
	}

	if line.trim().is_empty() {
		return Ok(Flow::Continue);
	}

	let cancel = Arc::new(AtomicBool::new(false));
	let animation = tokio::spawn(show_loading_animation(cancel.clone(), "Chef is thinking..."));

	let result = transition(session, &ui.client, Event::TextSubmitted(line)).await;

	cancel.store(true, Ordering::SeqCst);
	if let Ok(Err(e)) = animation.await {
		log_debug!("Loading animation failed: {}", e);
	}
	println!();

	match result {
		Ok(_) => {
			if let Some(reply) = render(session.transcript()).last() {
				print_entry(&reply, ui.renderer.as_ref());
			}
		}
		Err(e) => print_turn_error(&e),
	}
	Ok(Flow::Continue)
}

async fn handle_command(command: ChatCommand, session: &mut Session, ui: &mut ChatUi) -> Result<Flow> {
	match command {
		ChatCommand::Help => print_help(),
		ChatCommand::Image(None) => println!("Usage: /image <path>"),
		ChatCommand::Image(Some(path)) => {
			if session.has_image() {
				println!(
					"{}",
					"A photo is already attached to this session. Use /new to start over with another one."
						.bright_yellow()
				);
			} else {
				attach_image(session, ui, &expand_home(&path)).await;
			}
		}
		ChatCommand::Info => print_session_info(session),
		ChatCommand::New => {
			*session = session.restart();
			println!("{}", "Started a new session. Upload another photo.".bright_green());
		}
		ChatCommand::Clear => {
			execute!(
				std::io::stdout(),
				terminal::Clear(terminal::ClearType::All),
				cursor::MoveTo(0, 0)
			)?;
			print_transcript(session, ui.renderer.as_ref());
		}
		ChatCommand::Exit => return Ok(Flow::Exit),
		ChatCommand::Unknown(name) => {
			println!("Unknown command: {}. Type /help for available commands.", name);
		}
	}
	Ok(Flow::Continue)
}

async fn attach_image(session: &mut Session, ui: &ChatUi, path: &Path) {
	let image = match ImageProcessor::load_from_path(path) {
		Ok(image) => image,
		Err(e) => {
			log_error!("Could not load image: {}", e);
			return;
		}
	};

	match transition(session, &ui.client, Event::ImageUploaded(image)).await {
		Ok(Phase::Conversing) => {
			if let Some(image) = session.image() {
				print_image_header(image);
			}
			println!("{}", "Ask me what you can cook with these!".bright_green());
			println!();
		}
		Ok(_) => {}
		Err(e) => print_turn_error(&e),
	}
}

fn print_turn_error(err: &ChatError) {
	match err {
		ChatError::Auth(_) => {
			println!("{} {}", "🔑".bright_red(), err.to_string().bright_red());
		}
		ChatError::Validation(_) => println!("{}", err.to_string().yellow()),
		ChatError::Transient(_) => {
			println!("{} {}", err.to_string().bright_red(), "Please try again.".yellow());
		}
		ChatError::Model(_) => println!("{}", err.to_string().bright_red()),
	}
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
	match path.strip_prefix("~/") {
		Some(rest) => match dirs::home_dir() {
			Some(home) => home.join(rest),
			None => PathBuf::from(path),
		},
		None => PathBuf::from(path),
	}
}
