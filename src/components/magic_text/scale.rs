//! Device pixel scaling and wrapper sizing.
//!
//! # Coordinate Spaces
//!
//! - **CSS pixels**: layout units. Font size, spread, and the wrapper box are
//!   given in CSS pixels.
//! - **Device pixels**: the canvas backing store, `css * dpr`. Rasterization,
//!   sampling, and simulation all happen here; the renderer divides by `dpr`
//!   and scales the context back up.

use super::raster::Size;

/// Upper bound on the device pixel ratio used for the backing store.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Viewports narrower than this get the compact layout.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Caps the host ratio at [`MAX_DEVICE_PIXEL_RATIO`]; nonsense reads as 1.
pub fn effective_dpr(raw: f64) -> f64 {
	if raw.is_finite() && raw > 0.0 {
		raw.min(MAX_DEVICE_PIXEL_RATIO)
	} else {
		1.0
	}
}

/// Layout limits that differ between compact and wide viewports.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutProfile {
	/// Padding as a fraction of font size.
	pub padding_ratio: f64,
	/// Padding floor in CSS pixels.
	pub min_padding: f64,
	/// Smallest wrapper box.
	pub min_size: Size,
	/// Share of the parent box the wrapper may use.
	pub parent_margin: f64,
}

impl LayoutProfile {
	/// Limits for viewports under [`MOBILE_BREAKPOINT`].
	pub fn mobile() -> Self {
		Self {
			padding_ratio: 0.3,
			min_padding: 20.0,
			min_size: Size::new(120.0, 60.0),
			parent_margin: 0.95,
		}
	}

	/// Limits for wide viewports.
	pub fn desktop() -> Self {
		Self {
			padding_ratio: 0.5,
			min_padding: 40.0,
			min_size: Size::new(200.0, 100.0),
			parent_margin: 0.9,
		}
	}

	/// Picks the profile for a viewport width.
	pub fn for_viewport(viewport: Size) -> Self {
		if viewport.width < MOBILE_BREAKPOINT {
			Self::mobile()
		} else {
			Self::desktop()
		}
	}
}

/// CSS size of the widget box: the padded text, at least the profile
/// minimum, at most a share of the parent (or the viewport without one).
///
/// Returns `None` when the text has no extent yet.
pub fn wrapper_size(text: Size, font_size: f64, viewport: Size, parent: Option<Size>) -> Option<Size> {
	if !text.is_drawable() {
		return None;
	}
	let profile = LayoutProfile::for_viewport(viewport);
	let padding = (font_size * profile.padding_ratio).max(profile.min_padding);

	let wanted = Size::new(
		(text.width + padding * 2.0).max(profile.min_size.width),
		(text.height + padding * 2.0).max(profile.min_size.height),
	);
	let limit = parent.unwrap_or(viewport).scaled(profile.parent_margin);

	Some(Size::new(
		wanted.width.min(limit.width),
		wanted.height.min(limit.height),
	))
}

/// Glyph anchor in device pixels: centre of the backing store, nudged right
/// by `offset_x` CSS pixels.
pub fn text_anchor(backing: Size, offset_x: f64, dpr: f64) -> (f64, f64) {
	(backing.width / 2.0 + offset_x * dpr, backing.height / 2.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dpr_is_capped_and_sanitized() {
		assert_eq!(effective_dpr(1.0), 1.0);
		assert_eq!(effective_dpr(1.5), 1.5);
		assert_eq!(effective_dpr(3.0), 2.0);
		assert_eq!(effective_dpr(0.0), 1.0);
		assert_eq!(effective_dpr(f64::NAN), 1.0);
	}

	#[test]
	fn desktop_box_pads_text_and_respects_minimum() {
		let size = wrapper_size(
			Size::new(300.0, 98.0),
			70.0,
			Size::new(1280.0, 800.0),
			Some(Size::new(1000.0, 600.0)),
		)
		.unwrap();
		assert_eq!(size, Size::new(380.0, 178.0));

		let small = wrapper_size(Size::new(30.0, 20.0), 14.0, Size::new(1280.0, 800.0), None).unwrap();
		assert_eq!(small, Size::new(200.0, 100.0));
	}

	#[test]
	fn mobile_box_is_limited_by_parent() {
		let size = wrapper_size(
			Size::new(500.0, 40.0),
			20.0,
			Size::new(375.0, 700.0),
			Some(Size::new(300.0, 400.0)),
		)
		.unwrap();
		assert_eq!(size, Size::new(285.0, 80.0));
	}

	#[test]
	fn unmeasured_text_has_no_box() {
		assert_eq!(wrapper_size(Size::ZERO, 14.0, Size::new(1280.0, 800.0), None), None);
	}

	#[test]
	fn anchor_is_offset_in_device_pixels() {
		assert_eq!(text_anchor(Size::new(400.0, 200.0), 35.0, 2.0), (270.0, 100.0));
	}
}
