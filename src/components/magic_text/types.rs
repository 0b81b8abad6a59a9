//! Configuration surface of the reveal widget.

use serde::Deserialize;

/// Animation frames between two processed ticks. 2 halves the host frame rate.
pub const FRAME_INTERVAL: u32 = 2;

/// Options accepted by [`MagicTextReveal`](super::MagicTextReveal).
///
/// Deserializes from the camelCase keys used in the page data, with every
/// field optional.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
	/// String to render.
	pub text: String,
	/// CSS color of the literal text overlay and of the sampled glyphs.
	pub color: String,
	/// Font size in CSS pixels.
	pub font_size: f64,
	/// CSS font family list.
	pub font_family: String,
	/// CSS font weight.
	pub font_weight: u16,
	/// Idle wander radius in raster pixels.
	pub spread: f64,
	/// Idle motion rate.
	pub speed: f64,
	/// Sampling density; higher means a finer grid and more particles.
	pub density: u32,
	/// When false, the literal text stays up after the pointer leaves.
	pub reset_on_mouse_leave: bool,
	/// Horizontal offset of the glyph anchor from the canvas centre, CSS pixels.
	pub text_offset_x: f64,
	/// Process every Nth animation frame.
	pub frame_interval: u32,
}

impl Default for RevealConfig {
	fn default() -> Self {
		Self {
			text: "Magic Text".to_string(),
			color: "rgba(255, 255, 255, 1)".to_string(),
			font_size: 70.0,
			font_family: "Jakarta Sans, sans-serif".to_string(),
			font_weight: 600,
			spread: 40.0,
			speed: 0.5,
			density: 4,
			reset_on_mouse_leave: true,
			text_offset_x: 35.0,
			frame_interval: FRAME_INTERVAL,
		}
	}
}

impl RevealConfig {
	/// Font description at CSS pixel size.
	pub fn font(&self) -> FontSpec {
		FontSpec {
			family: self.font_family.clone(),
			weight: self.font_weight,
			size_px: self.font_size,
		}
	}

	/// Grid spacing used when sampling the raster.
	pub fn sample_stride(&self) -> usize {
		let transformed = 6u32.saturating_sub(self.density).max(2);
		(transformed as usize * 2).max(3)
	}
}

/// Everything the rasterizer needs to pick a face.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
	/// CSS font family list.
	pub family: String,
	/// CSS font weight.
	pub weight: u16,
	/// Size in pixels of whatever space the raster lives in.
	pub size_px: f64,
}

impl FontSpec {
	/// Same face at `factor` times the size (used for device pixel scaling).
	pub fn scaled(&self, factor: f64) -> Self {
		Self {
			size_px: self.size_px * factor,
			..self.clone()
		}
	}

	/// CSS `font` shorthand, e.g. `600 70px Jakarta Sans, sans-serif`.
	pub fn to_css(&self) -> String {
		format!("{} {}px {}", self.weight, self.size_px, self.family)
	}
}
