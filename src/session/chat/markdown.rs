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

// Markdown rendering for model replies

use termimad::crossterm::style::{Attribute, Color};
use termimad::MadSkin;

pub struct MarkdownRenderer {
	skin: MadSkin,
}

impl MarkdownRenderer {
	pub fn new() -> Self {
		let mut skin = MadSkin::default();

		skin.headers[0].set_fg(Color::Yellow);
		skin.headers[0].add_attr(Attribute::Bold);
		skin.headers[1].set_fg(Color::Green);
		skin.headers[1].add_attr(Attribute::Bold);
		skin.headers[2].set_fg(Color::Cyan);
		skin.headers[2].add_attr(Attribute::Bold);

		skin.inline_code.set_bg(Color::Rgb { r: 60, g: 60, b: 60 });
		skin.inline_code.set_fg(Color::Yellow);
		skin.code_block.set_bg(Color::Rgb { r: 40, g: 40, b: 40 });
		skin.code_block.set_fg(Color::White);

		skin.italic.set_fg(Color::Cyan);
		skin.bold.set_fg(Color::White);
		skin.bold.add_attr(Attribute::Bold);

		// Ingredient lists and numbered steps
		skin.bullet.set_fg(Color::Green);
		skin.quote_mark.set_fg(Color::Blue);

		Self { skin }
	}

	pub fn render_and_print(&self, markdown: &str) {
		self.skin.print_text(markdown);
	}
}

impl Default for MarkdownRenderer {
	fn default() -> Self {
		Self::new()
	}
}

/// Cheap check whether a reply uses any markdown worth rendering
pub fn is_markdown_content(content: &str) -> bool {
	content.contains("**")
		|| content.contains("# ")
		|| content.contains("```")
		|| content.contains('`')
		|| content.contains("[")
		|| content.contains("> ")
		|| content.lines().any(|line| {
			let line = line.trim_start();
			line.starts_with("- ")
				|| line.starts_with("* ")
				|| line
					.split_once(". ")
					.is_some_and(|(number, _)| !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_markdown_detection() {
		assert!(is_markdown_content("# Omelette"));
		assert!(is_markdown_content("Use **fresh** eggs"));
		assert!(is_markdown_content("- 2 eggs\n- 1 tomato"));
		assert!(is_markdown_content("1. Whisk the eggs\n2. Heat the pan"));
		assert!(!is_markdown_content("Make a simple omelette. It takes 5 minutes."));
	}
}
