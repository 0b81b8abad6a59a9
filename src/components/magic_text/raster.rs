//! Text rasterization and measurement.
//!
//! A [`Rasterizer`] draws a string into an RGBA buffer the size of the canvas
//! backing store and reports where the text sits. The browser path goes
//! through a 2d canvas context; [`BitmapRasterizer`] is a pure-Rust stand-in
//! for hosts without one.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};
use super::theme::parse_color;
use super::types::FontSpec;
use crate::error::RevealError;

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Size {
	/// The empty size.
	pub const ZERO: Size = Size {
		width: 0.0,
		height: 0.0,
	};

	/// Size of `width` x `height`.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Both sides finite and strictly positive.
	pub fn is_drawable(&self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	/// Both sides multiplied by `factor`.
	pub fn scaled(&self, factor: f64) -> Self {
		Self::new(self.width * factor, self.height * factor)
	}
}

/// Padded measurement of a run of text: the advance plus half the font size
/// horizontally, 1.4 times the font size vertically.
pub fn padded_text_size(advance: f64, font_size: f64) -> Size {
	if advance <= 0.0 || font_size <= 0.0 {
		return Size::ZERO;
	}
	Size::new(
		(advance + font_size * 0.5).ceil(),
		(font_size * 1.4).ceil(),
	)
}

/// Axis-aligned box in raster space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBounds {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
}

impl TextBounds {
	/// A box of `size` centred on `anchor`.
	pub fn centered(anchor: (f64, f64), size: Size) -> Self {
		Self {
			x: anchor.0 - size.width / 2.0,
			y: anchor.1 - size.height / 2.0,
			width: size.width,
			height: size.height,
		}
	}

	/// Inclusive point test.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
	}

	/// No area.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}
}

/// RGBA8 pixel buffer, row-major, plus the measured text box.
#[derive(Clone, Debug, Default)]
pub struct Raster {
	/// Pixel columns.
	pub width: usize,
	/// Pixel rows.
	pub height: usize,
	pixels: Vec<u8>,
	/// Where the measured text box sits in the buffer.
	pub bounds: TextBounds,
}

impl Raster {
	/// Zero-size raster with no text; samples to zero particles.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Wraps an RGBA buffer. A buffer of the wrong length yields an empty raster.
	pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>, bounds: TextBounds) -> Self {
		if pixels.len() != width * height * 4 {
			return Self::empty();
		}
		Self {
			width,
			height,
			pixels,
			bounds,
		}
	}

	/// RGBA at (`x`, `y`); out of range reads as transparent.
	pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
		if x >= self.width || y >= self.height {
			return [0; 4];
		}
		let i = (y * self.width + x) * 4;
		[
			self.pixels[i],
			self.pixels[i + 1],
			self.pixels[i + 2],
			self.pixels[i + 3],
		]
	}

	/// Alpha channel at (`x`, `y`).
	pub fn alpha(&self, x: usize, y: usize) -> u8 {
		self.rgba(x, y)[3]
	}
}

/// Draws text into a raster the size of the target surface.
pub trait Rasterizer {
	/// Padded box the text occupies at `font`.
	fn measure(&self, text: &str, font: &FontSpec) -> Result<Size, RevealError>;

	/// Draws `text` centred (middle baseline) on `anchor` in a buffer of
	/// `surface` pixels.
	fn rasterize(
		&self,
		text: &str,
		font: &FontSpec,
		color: &str,
		surface: Size,
		anchor: (f64, f64),
	) -> Result<Raster, RevealError>;
}

/// Rasterizes through a browser 2d canvas.
pub struct CanvasRasterizer {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
	/// Uses `canvas` as the drawing surface. It is left cleared afterwards.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RevealError> {
		let ctx = context_2d(&canvas)?;
		Ok(Self { canvas, ctx })
	}

	/// A detached canvas, enough for measuring.
	pub fn offscreen() -> Result<Self, RevealError> {
		let document = web_sys::window()
			.ok_or(RevealError::NoWindow)?
			.document()
			.ok_or(RevealError::NoDocument)?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|e| RevealError::js("createElement", e))?
			.dyn_into()
			.map_err(|_| RevealError::CanvasCreation)?;
		Self::new(canvas)
	}

	/// The context it draws with; the renderer reuses it.
	pub fn context(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}
}

/// Fetches the 2d context of `canvas`.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, RevealError> {
	canvas
		.get_context("2d")
		.map_err(|e| RevealError::js("getContext", e))?
		.ok_or(RevealError::ContextUnavailable)?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| RevealError::ContextUnavailable)
}

impl Rasterizer for CanvasRasterizer {
	fn measure(&self, text: &str, font: &FontSpec) -> Result<Size, RevealError> {
		self.ctx.set_font(&font.to_css());
		let metrics = self
			.ctx
			.measure_text(text)
			.map_err(|e| RevealError::js("measureText", e))?;
		Ok(padded_text_size(metrics.width(), font.size_px))
	}

	fn rasterize(
		&self,
		text: &str,
		font: &FontSpec,
		color: &str,
		surface: Size,
		anchor: (f64, f64),
	) -> Result<Raster, RevealError> {
		if !surface.is_drawable() {
			return Ok(Raster::empty());
		}
		let (w, h) = (surface.width as u32, surface.height as u32);
		if self.canvas.width() != w {
			self.canvas.set_width(w);
		}
		if self.canvas.height() != h {
			self.canvas.set_height(h);
		}

		let (wf, hf) = (w as f64, h as f64);
		let ctx = &self.ctx;
		ctx.clear_rect(0.0, 0.0, wf, hf);
		ctx.set_fill_style_str(color);
		ctx.set_font(&font.to_css());
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_image_smoothing_enabled(false);
		ctx.fill_text(text, anchor.0, anchor.1)
			.map_err(|e| RevealError::js("fillText", e))?;

		let image = ctx
			.get_image_data(0.0, 0.0, wf, hf)
			.map_err(|e| RevealError::js("getImageData", e))?;
		ctx.clear_rect(0.0, 0.0, wf, hf);

		let size = self.measure(text, font)?;
		Ok(Raster::from_rgba(
			w as usize,
			h as usize,
			image.data().0,
			TextBounds::centered(anchor, size),
		))
	}
}

/// Pure-Rust rasterizer drawing the built-in 5x7 face, scaled by whole
/// pixels to roughly the requested font size. Family and weight are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapRasterizer;

impl BitmapRasterizer {
	/// Pixels per font unit at `size_px`.
	fn unit(size_px: f64) -> usize {
		((size_px / GLYPH_HEIGHT as f64).round() as usize).max(1)
	}

	/// Unpadded advance of `text` in pixels.
	fn advance(text: &str, unit: usize) -> usize {
		let n = text.chars().count();
		if n == 0 {
			0
		} else {
			n * GLYPH_ADVANCE * unit - unit
		}
	}
}

impl Rasterizer for BitmapRasterizer {
	fn measure(&self, text: &str, font: &FontSpec) -> Result<Size, RevealError> {
		let unit = Self::unit(font.size_px);
		// tiny sizes still draw a whole unit per font pixel
		let em = font.size_px.max((GLYPH_HEIGHT * unit) as f64);
		Ok(padded_text_size(Self::advance(text, unit) as f64, em))
	}

	fn rasterize(
		&self,
		text: &str,
		font: &FontSpec,
		color: &str,
		surface: Size,
		anchor: (f64, f64),
	) -> Result<Raster, RevealError> {
		if !surface.is_drawable() || font.size_px <= 0.0 {
			return Ok(Raster::empty());
		}
		let (w, h) = (surface.width as usize, surface.height as usize);
		let mut pixels = vec![0u8; w * h * 4];

		let ink = parse_color(color);
		let ink_alpha = (ink.a.clamp(0.0, 1.0) * 255.0).round() as u8;
		let unit = Self::unit(font.size_px);
		let left = (anchor.0 - Self::advance(text, unit) as f64 / 2.0).round() as i64;
		let top = (anchor.1 - (GLYPH_HEIGHT * unit) as f64 / 2.0).round() as i64;

		for (n, ch) in text.chars().enumerate() {
			let rows = glyphs::glyph(ch);
			let cell_x = left + (n * GLYPH_ADVANCE * unit) as i64;
			for row in 0..GLYPH_HEIGHT {
				for col in 0..glyphs::GLYPH_WIDTH {
					if !glyphs::lit(&rows, col, row) {
						continue;
					}
					let (x0, y0) = (
						cell_x + (col * unit) as i64,
						top + (row * unit) as i64,
					);
					for y in y0..y0 + unit as i64 {
						for x in x0..x0 + unit as i64 {
							if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
								continue;
							}
							let i = (y as usize * w + x as usize) * 4;
							pixels[i..i + 4].copy_from_slice(&[ink.r, ink.g, ink.b, ink_alpha]);
						}
					}
				}
			}
		}

		let size = self.measure(text, font)?;
		Ok(Raster::from_rgba(w, h, pixels, TextBounds::centered(anchor, size)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn font(size_px: f64) -> FontSpec {
		FontSpec {
			family: "sans-serif".into(),
			weight: 400,
			size_px,
		}
	}

	#[test]
	fn padding_covers_half_the_font_size() {
		assert_eq!(padded_text_size(100.2, 20.0), Size::new(111.0, 28.0));
		assert_eq!(padded_text_size(0.0, 20.0), Size::ZERO);
		assert_eq!(padded_text_size(10.0, 0.0), Size::ZERO);
	}

	#[test]
	fn bitmap_ink_lands_inside_bounds() {
		let raster = BitmapRasterizer
			.rasterize("Hi", &font(14.0), "#ffffff", Size::new(200.0, 100.0), (100.0, 50.0))
			.unwrap();
		assert_eq!((raster.width, raster.height), (200, 100));

		let mut inked = 0;
		for y in 0..raster.height {
			for x in 0..raster.width {
				if raster.alpha(x, y) > 0 {
					inked += 1;
					assert!(raster.bounds.contains(x as f64, y as f64), "({x}, {y})");
				}
			}
		}
		assert!(inked > 0);
		// top-left stem of the H
		assert_eq!(raster.rgba(89, 43), [255, 255, 255, 255]);
		assert_eq!(raster.rgba(100, 50), [0; 4]);
	}

	#[test]
	fn empty_text_has_no_ink_and_no_bounds() {
		let raster = BitmapRasterizer
			.rasterize("", &font(14.0), "#ffffff", Size::new(50.0, 50.0), (25.0, 25.0))
			.unwrap();
		assert!(raster.bounds.is_empty());
		assert!((0..50).all(|y| (0..50).all(|x| raster.alpha(x, y) == 0)));
	}

	#[test]
	fn undrawable_surface_yields_empty_raster() {
		let raster = BitmapRasterizer
			.rasterize("Hi", &font(14.0), "#ffffff", Size::new(0.0, 40.0), (0.0, 20.0))
			.unwrap();
		assert_eq!((raster.width, raster.height), (0, 0));
		assert!(!Size::new(-3.0, 4.0).is_drawable());
		assert!(!Size::new(f64::NAN, 4.0).is_drawable());
	}

	#[test]
	fn glyphs_clip_at_the_surface_edge() {
		let raster = BitmapRasterizer
			.rasterize("WWWWWWWW", &font(28.0), "#ffffff", Size::new(40.0, 40.0), (20.0, 20.0))
			.unwrap();
		assert_eq!(raster.rgba(500, 500), [0; 4]);
		assert!((0..40).any(|x| raster.alpha(x, 20) > 0));
	}

	#[test]
	fn mismatched_buffer_is_rejected() {
		let raster = Raster::from_rgba(2, 2, vec![0; 3], TextBounds::default());
		assert_eq!((raster.width, raster.height), (0, 0));
	}
}
