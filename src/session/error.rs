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

use thiserror::Error;

/// Failure of a single turn. None of these end the session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
	/// Missing or rejected credential; the front-end asks for a new one
	#[error("Authentication failed: {0}")]
	Auth(String),

	/// Input that the current session state cannot accept
	#[error("Invalid input: {0}")]
	Validation(String),

	/// Network trouble, timeouts, rate limits, server-side failures
	#[error("Temporary failure: {0}")]
	Transient(String),

	/// The model refused or returned nothing usable
	#[error("Model error: {0}")]
	Model(String),
}

impl ChatError {
	pub fn is_auth(&self) -> bool {
		matches!(self, ChatError::Auth(_))
	}
}

impl From<reqwest::Error> for ChatError {
	fn from(err: reqwest::Error) -> Self {
		// Anything that never produced a usable HTTP response is worth retrying by hand
		ChatError::Transient(err.to_string())
	}
}
