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

// Session module: one photo, one conversation about what to cook with it

pub mod chat; // Interactive terminal front-end
mod chat_helper; // Chat command completion
mod client; // Model client
mod error;
pub mod flow; // Lifecycle transitions
pub mod image; // Ingredient photo loading
mod message;
pub mod providers; // Provider abstraction layer
mod request; // Multimodal turn assembly
mod state;
pub mod transcript; // Display projection

pub use client::ModelClient;
pub use error::ChatError;
pub use flow::{transition, Event};
pub use image::{ImageAttachment, ImageProcessor};
pub use message::{ContentPart, Message, MessageContent, Role};
pub use providers::{AiProvider, ProviderExchange, ProviderFactory, ProviderResponse, TokenUsage};
pub use request::build_user_turn;
pub use state::{Phase, Session, SessionInfo};

/// Built-in system instruction
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are 'Chef Cerdas', a cheerful recipe recommendation assistant. \
Your job: 1) identify the food ingredients visible in the photo, 2) recommend recipes \
that can be made from those ingredients. Be friendly and brief: 5-7 sentences. \
Answer in the language the user writes in.";
