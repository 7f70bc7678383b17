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

// Projection of the transcript into what the user gets to see

use super::message::{Message, Role};

/// One displayable message: its author and the text fragments to show
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry<'a> {
	pub role: Role,
	pub texts: Vec<&'a str>,
}

/// Lazily walk the transcript, skipping the system instruction.
///
/// Image parts are not replayed; the photo is shown once above the chat.
/// The iterator is `Clone`, so a view can be rendered again from the start.
pub fn render(transcript: &[Message]) -> impl Iterator<Item = DisplayEntry<'_>> + Clone {
	transcript
		.iter()
		.filter(|message| !message.is_system())
		.map(|message| DisplayEntry {
			role: message.role(),
			texts: message.content().texts(),
		})
}

/// Label used in front of each entry
pub fn role_label(role: Role) -> &'static str {
	match role {
		Role::User => "You",
		Role::Assistant => "Chef",
		Role::System => "System",
	}
}
