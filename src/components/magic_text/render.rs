//! Canvas rendering for the particle field.
//!
//! Drawing is split in two: [`build_batches`] resolves every visible particle
//! to a square sprite and groups sprites by their CSS fill string, then
//! [`draw`] issues one fill-style/shadow change per group. Particle
//! coordinates are in device pixels; they are divided by the device pixel
//! ratio here and the context is scaled back up, so each sprite lands on the
//! pixel it was sampled from.

use std::collections::HashMap;

use web_sys::CanvasRenderingContext2d;

use super::particles::Particle;
use super::raster::Size;
use super::theme::ParticleStyle;

/// A square sprite in CSS pixels, centred on (`x`, `y`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
	/// Centre x, CSS pixels.
	pub x: f64,
	/// Centre y, CSS pixels.
	pub y: f64,
	/// Side length, CSS pixels.
	pub size: f64,
}

/// Sprites sharing one fill color.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBatch {
	/// CSS `rgba()` fill string.
	pub color: String,
	/// Sprites drawn with that fill.
	pub sprites: Vec<Sprite>,
}

/// Groups visible particles by resolved color, in first-seen order.
pub fn build_batches(
	particles: &[Particle],
	dpr: f64,
	time: f64,
	style: &ParticleStyle,
) -> Vec<ColorBatch> {
	let mut batches: Vec<ColorBatch> = Vec::new();
	let mut by_color: HashMap<String, usize> = HashMap::new();

	for p in particles {
		if p.render_opacity() <= style.cull_opacity {
			continue;
		}
		let sprite = Sprite {
			x: p.x / dpr,
			y: p.y / dpr,
			size: style.base_size
				+ (time * style.wobble_rate + p.floating_angle).sin() * style.size_wobble,
		};
		let color = p.color().to_css();
		match by_color.get(&color) {
			Some(&i) => batches[i].sprites.push(sprite),
			None => {
				by_color.insert(color.clone(), batches.len());
				batches.push(ColorBatch {
					color,
					sprites: vec![sprite],
				});
			}
		}
	}

	batches
}

/// Clears the canvas and draws `batches` with a per-batch glow.
pub fn draw(
	ctx: &CanvasRenderingContext2d,
	surface: Size,
	dpr: f64,
	batches: &[ColorBatch],
	style: &ParticleStyle,
) {
	ctx.clear_rect(0.0, 0.0, surface.width, surface.height);
	if batches.is_empty() {
		return;
	}

	ctx.save();
	let _ = ctx.scale(dpr, dpr);

	for batch in batches {
		ctx.set_fill_style_str(&batch.color);
		ctx.set_shadow_color(&batch.color);
		ctx.set_shadow_blur(style.glow_blur);
		for s in &batch.sprites {
			ctx.fill_rect(s.x - s.size / 2.0, s.y - s.size / 2.0, s.size, s.size);
		}
	}

	ctx.set_shadow_color("transparent");
	ctx.set_shadow_blur(0.0);
	ctx.restore();
}
