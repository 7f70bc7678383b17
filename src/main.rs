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

use clap::{Parser, Subcommand};

use recipe_chat::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "recipe-chat")]
#[command(version)]
#[command(about = "Snap a photo of your ingredients and chat about what to cook")]
struct CliArgs {
	#[command(subcommand)]
	command: Option<Commands>,

	#[command(flatten)]
	chat: commands::ChatArgs,
}

#[derive(Subcommand)]
enum Commands {
	/// Start an interactive recipe chat (default)
	Chat(commands::ChatArgs),

	/// Generate or edit the configuration file
	Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let args = CliArgs::parse();

	// Load configuration
	let config = Config::load()?;

	// Set the thread-local config for logging macros
	recipe_chat::config::set_thread_config(&config);

	match &args.command {
		Some(Commands::Config(config_args)) => commands::config::execute(config_args, config),
		Some(Commands::Chat(chat_args)) => commands::chat::execute(chat_args, config).await,
		None => commands::chat::execute(&args.chat, config).await,
	}
}
