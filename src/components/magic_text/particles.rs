//! Glyph particles and the sampler that extracts them from a raster.

use std::f64::consts::TAU;

use rand::Rng;

use super::raster::{Raster, TextBounds};
use super::theme::{Color, rainbow};

/// Pre-scatter radius as a fraction of the larger glyph extent.
pub const SPREAD_FRACTION: f64 = 0.16;

/// One sampled foreground pixel of the rasterized text.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Current position in raster pixels.
	pub x: f64,
	/// Current vertical position.
	pub y: f64,
	/// Sampled pixel this particle belongs to. Fixed after creation.
	pub origin_x: f64,
	/// Vertical origin.
	pub origin_y: f64,
	/// Raster color at the origin pixel.
	pub base_color: Color,
	/// Internal opacity; read through [`Particle::render_opacity`].
	pub opacity: f64,
	/// May exceed 1; the renderer clamps.
	pub target_opacity: f64,
	/// Coverage at the origin pixel, in [0, 1].
	pub original_alpha: f64,
	/// Phase rate of the idle float.
	pub floating_speed: f64,
	/// Idle float phase; also drives the sprite size wobble.
	pub floating_angle: f64,
	/// Rate at which opacity chases its target.
	pub sparkle_speed: f64,
	/// Starting point of this particle's walk around the color wheel.
	pub base_hue: f64,
	/// Current hue in degrees.
	pub hue: f64,
	/// Current saturation in percent.
	pub saturation: f64,
	/// Lightness in percent.
	pub lightness: f64,
}

impl Particle {
	/// Euclidean distance to the origin pixel.
	pub fn distance_from_origin(&self) -> f64 {
		(self.x - self.origin_x).hypot(self.y - self.origin_y)
	}

	/// Exactly on the origin pixel.
	pub fn is_home(&self) -> bool {
		self.x == self.origin_x && self.y == self.origin_y
	}

	/// Opacity as the renderer must see it.
	pub fn render_opacity(&self) -> f64 {
		self.opacity.clamp(0.0, 1.0)
	}

	/// Current rainbow color at the current opacity.
	pub fn color(&self) -> Color {
		Color::from_hsl(self.hue, self.saturation, self.lightness).with_alpha(self.render_opacity())
	}
}

/// The full particle set for one (text, font, size) combination.
///
/// Built in one go by [`ParticleField::sample`] and swapped in whole; the
/// simulator only re-parameterizes particles, never adds or removes them.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
	particles: Vec<Particle>,
	bounds: TextBounds,
	scatter_radius: f64,
}

impl ParticleField {
	/// A field with no particles.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Emits one particle per pixel with non-zero alpha on a `stride` grid,
	/// each pre-scattered around its origin by up to the scatter radius
	/// (16% of the larger glyph extent, never more than `spread`).
	pub fn sample<R: Rng + ?Sized>(raster: &Raster, stride: usize, spread: f64, rng: &mut R) -> Self {
		let stride = stride.max(1);
		let grid = move || {
			(0..raster.height)
				.step_by(stride)
				.flat_map(move |y| (0..raster.width).step_by(stride).map(move |x| (x, y)))
				.filter(move |&(x, y)| raster.alpha(x, y) > 0)
		};

		let Some((min_x, max_x, min_y, max_y)) = grid().fold(None::<(usize, usize, usize, usize)>, |acc, (x, y)| {
			Some(match acc {
				None => (x, x, y, y),
				Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
			})
		}) else {
			return Self {
				bounds: raster.bounds,
				..Self::default()
			};
		};

		let extent = (max_x - min_x).max(max_y - min_y) as f64;
		let scatter_radius = (extent * SPREAD_FRACTION).min(spread.max(0.0));

		let particles = grid()
			.enumerate()
			.map(|(index, (x, y))| {
				let [r, g, b, a] = raster.rgba(x, y);
				let original_alpha = a as f64 / 255.0;
				let (ox, oy) = (x as f64, y as f64);

				let angle = rng.r#gen::<f64>() * TAU;
				let distance = rng.r#gen::<f64>() * scatter_radius;
				let base_hue = rng.r#gen::<f64>() * 360.0;
				let hsl = rainbow(base_hue, 0.0, index);

				Particle {
					x: ox + angle.cos() * distance,
					y: oy + angle.sin() * distance,
					origin_x: ox,
					origin_y: oy,
					base_color: Color::rgba(r, g, b, original_alpha),
					opacity: original_alpha * 0.3,
					target_opacity: rng.r#gen::<f64>() * original_alpha * 0.6,
					original_alpha,
					floating_speed: rng.r#gen::<f64>() * 1.5 + 0.5,
					floating_angle: rng.r#gen::<f64>() * TAU,
					sparkle_speed: rng.r#gen::<f64>() * 1.5 + 0.5,
					base_hue,
					hue: hsl.hue,
					saturation: hsl.saturation,
					lightness: hsl.lightness,
				}
			})
			.collect();

		Self {
			particles,
			bounds: raster.bounds,
			scatter_radius,
		}
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// No particles were sampled.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Read-only view for the renderer.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Mutable view for the simulator; the length never changes.
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	/// Measured text box in raster space.
	pub fn bounds(&self) -> TextBounds {
		self.bounds
	}

	/// Radius used for the initial pre-scatter.
	pub fn scatter_radius(&self) -> f64 {
		self.scatter_radius
	}
}
