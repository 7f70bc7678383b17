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

// Ingredient photo loading

use anyhow::Result;
use std::path::Path;

/// The photo attached to a session
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
	pub data: Vec<u8>,
	pub media_type: String,
	pub file_name: String,
}

impl ImageAttachment {
	pub fn size_bytes(&self) -> u64 {
		self.data.len() as u64
	}

	/// One-line description used at the top of the chat view
	pub fn summary(&self) -> String {
		format!(
			"{} ({}, {:.1}KB)",
			self.file_name,
			self.media_type,
			self.size_bytes() as f64 / 1024.0
		)
	}
}

/// Image loading utilities
pub struct ImageProcessor;

impl ImageProcessor {
	/// Inline image data limit of the generateContent endpoint
	pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

	/// Load a JPEG or PNG from disk
	pub fn load_from_path(path: &Path) -> Result<ImageAttachment> {
		if !Self::is_supported_image(path) {
			return Err(anyhow::anyhow!(
				"Unsupported image file: {}. Supported formats: {}",
				path.display(),
				Self::supported_extensions().join(", ")
			));
		}

		let metadata = std::fs::metadata(path)
			.map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
		if !metadata.is_file() {
			return Err(anyhow::anyhow!("Not a file: {}", path.display()));
		}
		if metadata.len() > Self::MAX_FILE_SIZE {
			return Err(anyhow::anyhow!(
				"Image file too large: {}MB (max 20MB)",
				metadata.len() / 1024 / 1024
			));
		}

		let data = std::fs::read(path)?;
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().to_string())
			.unwrap_or_else(|| path.display().to_string());

		Self::from_bytes(data, &file_name)
	}

	/// Build an attachment from raw bytes, trusting the content over the file name
	pub fn from_bytes(data: Vec<u8>, file_name: &str) -> Result<ImageAttachment> {
		if data.is_empty() {
			return Err(anyhow::anyhow!("Image file is empty: {}", file_name));
		}
		if data.len() as u64 > Self::MAX_FILE_SIZE {
			return Err(anyhow::anyhow!(
				"Image too large: {}MB (max 20MB)",
				data.len() / 1024 / 1024
			));
		}

		let media_type = Self::sniff_media_type(&data).ok_or_else(|| {
			anyhow::anyhow!("{} does not look like a JPEG or PNG image", file_name)
		})?;

		if let Some(declared) = Self::guess_media_type_from_name(file_name) {
			if declared != media_type {
				crate::log_debug!(
					"{} is named as {} but contains {}",
					file_name,
					declared,
					media_type
				);
			}
		}

		Ok(ImageAttachment {
			data,
			media_type: media_type.to_string(),
			file_name: file_name.to_string(),
		})
	}

	/// Detect the format from magic bytes
	pub fn sniff_media_type(data: &[u8]) -> Option<&'static str> {
		const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
		const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

		if data.starts_with(&PNG_SIGNATURE) {
			Some("image/png")
		} else if data.starts_with(&JPEG_SIGNATURE) {
			Some("image/jpeg")
		} else {
			None
		}
	}

	/// Check if file is a supported image format
	pub fn is_supported_image(path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.map(Self::is_supported_extension)
			.unwrap_or(false)
	}

	fn is_supported_extension(ext: &str) -> bool {
		matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg")
	}

	/// Guess media type from a file name
	pub fn guess_media_type_from_name(name: &str) -> Option<&'static str> {
		let (_, ext) = name.rsplit_once('.')?;
		match ext.to_lowercase().as_str() {
			"png" => Some("image/png"),
			"jpg" | "jpeg" => Some("image/jpeg"),
			_ => None,
		}
	}

	/// Get supported image extensions for autocomplete
	pub fn supported_extensions() -> &'static [&'static str] {
		&["jpg", "jpeg", "png"]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TINY_PNG: [u8; 12] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
	const TINY_JPEG: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

	#[test]
	fn test_is_supported_image() {
		assert!(ImageProcessor::is_supported_image(Path::new("cheese.jpg")));
		assert!(ImageProcessor::is_supported_image(Path::new("fridge.PNG")));
		assert!(ImageProcessor::is_supported_image(Path::new("pantry.jpeg")));
		assert!(!ImageProcessor::is_supported_image(Path::new("notes.txt")));
		assert!(!ImageProcessor::is_supported_image(Path::new("anim.gif")));
		assert!(!ImageProcessor::is_supported_image(Path::new("noext")));
	}

	#[test]
	fn test_sniffing() {
		assert_eq!(ImageProcessor::sniff_media_type(&TINY_PNG), Some("image/png"));
		assert_eq!(ImageProcessor::sniff_media_type(&TINY_JPEG), Some("image/jpeg"));
		assert_eq!(ImageProcessor::sniff_media_type(b"GIF89a"), None);
	}

	#[test]
	fn test_from_bytes_trusts_content() {
		let attachment = ImageProcessor::from_bytes(TINY_PNG.to_vec(), "cheese.jpg").unwrap();
		assert_eq!(attachment.media_type, "image/png");
		assert_eq!(attachment.file_name, "cheese.jpg");

		assert!(ImageProcessor::from_bytes(Vec::new(), "empty.png").is_err());
		assert!(ImageProcessor::from_bytes(b"hello".to_vec(), "fake.png").is_err());
	}

	#[test]
	fn test_load_from_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cheese.jpg");
		std::fs::write(&path, TINY_JPEG).unwrap();

		let attachment = ImageProcessor::load_from_path(&path).unwrap();
		assert_eq!(attachment.media_type, "image/jpeg");
		assert_eq!(attachment.data, TINY_JPEG.to_vec());
		assert_eq!(attachment.size_bytes(), 6);
		assert!(attachment.summary().starts_with("cheese.jpg (image/jpeg"));

		let missing = dir.path().join("missing.png");
		assert!(ImageProcessor::load_from_path(&missing).is_err());

		let text = dir.path().join("list.txt");
		std::fs::write(&text, "eggs").unwrap();
		assert!(ImageProcessor::load_from_path(&text).is_err());
	}

	fn jpeg_of_len(len: u64) -> Vec<u8> {
		let mut data = vec![0xFF, 0xD8, 0xFF];
		data.resize(len as usize, 0);
		data
	}

	#[test]
	fn test_from_bytes_accepts_exactly_the_limit() {
		let attachment =
			ImageProcessor::from_bytes(jpeg_of_len(ImageProcessor::MAX_FILE_SIZE), "big.jpg")
				.unwrap();
		assert_eq!(attachment.size_bytes(), ImageProcessor::MAX_FILE_SIZE);
	}

	#[test]
	fn test_from_bytes_rejects_over_the_limit() {
		let result =
			ImageProcessor::from_bytes(jpeg_of_len(ImageProcessor::MAX_FILE_SIZE + 1), "huge.jpg");
		assert!(result.is_err());
	}

	#[test]
	fn test_load_from_path_rejects_oversized_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("huge.jpg");
		std::fs::write(&path, jpeg_of_len(ImageProcessor::MAX_FILE_SIZE + 1)).unwrap();
		assert!(ImageProcessor::load_from_path(&path).is_err());
	}
}
