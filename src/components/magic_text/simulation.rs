//! Per-tick particle update.
//!
//! Two global modes, picked by the hover flag:
//! - hover: every particle walks straight home at a fixed speed and fades out,
//!   leaving the literal text overlay as the only visible text;
//! - idle: every particle floats around its origin inside a soft boundary,
//!   twinkles, and cycles through the rainbow.

use rand::Rng;
use rand::rngs::SmallRng;

use super::particles::Particle;
use super::theme::rainbow;
use super::types::RevealConfig;

/// Home-bound speed in pixels per normalized frame.
pub const RETURN_SPEED: f64 = 4.0;
/// Frames per second the speed constants are tuned for.
pub const FRAME_NORMALIZATION: f64 = 60.0;
/// Closer than this, a homing particle snaps onto its origin.
pub const SNAP_EPSILON: f64 = 0.1;
/// Opacity lost per second while hovered.
pub const FADE_SPEED: f64 = 20.0;
/// Particles whose index falls in the same residue class share a color update tick.
pub const COLOR_UPDATE_GROUPS: usize = 3;

const TRANSITION_RATE: f64 = 4.0;
const NOISE_SCALE: f64 = 0.6;
const CHAOS_FACTOR: f64 = 1.2;
const PULL_BACK: f64 = 0.08;
const JITTER_SCALE: f64 = 0.5;
const SPARKLE_RATE: f64 = 3.0;
const RETARGET_TOLERANCE: f64 = 0.01;
const DIM_CHANCE: f64 = 0.4;

/// Idle motion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
	/// Soft boundary radius around each origin.
	pub float_radius: f64,
	/// Idle motion rate; scales easing and jitter.
	pub float_speed: f64,
}

impl From<&RevealConfig> for Motion {
	fn from(config: &RevealConfig) -> Self {
		Self {
			float_radius: config.spread.max(0.0),
			float_speed: config.speed,
		}
	}
}

/// Whether the literal text overlay must be shown or hidden after a tick.
/// `None` leaves it as it is.
pub fn visibility_flip(hovered: bool, text_visible: bool) -> Option<bool> {
	match (hovered, text_visible) {
		(true, false) => Some(true),
		(false, true) => Some(false),
		_ => None,
	}
}

/// Advances particles in place. Owns the simulation clock and the noise source.
pub struct Simulator<R = SmallRng> {
	rng: R,
	time: f64,
}

impl<R: Rng> Simulator<R> {
	/// A simulator at time zero.
	pub fn new(rng: R) -> Self {
		Self { rng, time: 0.0 }
	}

	/// Simulated seconds since creation.
	pub fn time(&self) -> f64 {
		self.time
	}

	/// The noise source, shared with the sampler on resample.
	pub fn rng_mut(&mut self) -> &mut R {
		&mut self.rng
	}

	/// Advances every particle by `dt` seconds and reports a text visibility flip.
	pub fn step(
		&mut self,
		particles: &mut [Particle],
		dt: f64,
		hovered: bool,
		text_visible: bool,
		motion: &Motion,
	) -> Option<bool> {
		let dt = dt.max(0.0);
		self.time += dt;

		if hovered {
			for p in particles.iter_mut() {
				Self::home(p, dt);
			}
		} else {
			let color_group = (self.time * 2.0).floor() as usize % COLOR_UPDATE_GROUPS;
			for (index, p) in particles.iter_mut().enumerate() {
				self.float(p, dt, motion);
				self.sparkle(p, dt);
				if index % COLOR_UPDATE_GROUPS == color_group {
					let hsl = rainbow(p.base_hue, self.time, index);
					p.hue = hsl.hue;
					p.saturation = hsl.saturation;
					p.lightness = hsl.lightness;
				}
			}
		}

		visibility_flip(hovered, text_visible)
	}

	fn home(p: &mut Particle, dt: f64) {
		let (dx, dy) = (p.origin_x - p.x, p.origin_y - p.y);
		let distance = dx.hypot(dy);
		let stride = RETURN_SPEED * dt * FRAME_NORMALIZATION;

		if distance <= SNAP_EPSILON || stride >= distance {
			p.x = p.origin_x;
			p.y = p.origin_y;
		} else {
			p.x += dx / distance * stride;
			p.y += dy / distance * stride;
		}

		p.opacity = (p.opacity - FADE_SPEED * dt).max(0.0);
	}

	fn float(&mut self, p: &mut Particle, dt: f64, motion: &Motion) {
		let radius = motion.float_radius;
		let t = self.time;

		p.floating_angle += dt * p.floating_speed * (1.0 + self.rng.r#gen::<f64>() * CHAOS_FACTOR);

		let unique = p.floating_speed * 1000.0;
		let mut nx = ((t * p.floating_speed + p.floating_angle).sin() * 1.2
			+ ((t + unique) * 0.3).sin() * 0.6
			+ (self.rng.r#gen::<f64>() - 0.5) * CHAOS_FACTOR)
			* NOISE_SCALE;
		let mut ny = ((t * p.floating_speed + p.floating_angle * 1.2).cos() * 0.6
			+ ((t + unique) * 0.3).cos() * 0.4
			+ (self.rng.r#gen::<f64>() - 0.5) * CHAOS_FACTOR)
			* NOISE_SCALE;
		// keep the float target inside the boundary
		let len = nx.hypot(ny);
		if len > 1.0 {
			nx /= len;
			ny /= len;
		}

		let (tx, ty) = (p.origin_x + radius * nx, p.origin_y + radius * ny);
		let ease = (TRANSITION_RATE * motion.float_speed * dt).clamp(0.0, 1.0);
		p.x += (tx - p.x) * ease;
		p.y += (ty - p.y) * ease;

		let room = if radius > 0.0 {
			((radius - p.distance_from_origin()) / radius).clamp(0.0, 1.0)
		} else {
			0.0
		};
		// never more than the radius, so the kick cannot cross the boundary
		let jitter = (motion.float_speed.abs() * JITTER_SCALE).min(radius) * room;
		p.x += (self.rng.r#gen::<f64>() - 0.5) * jitter;
		p.y += (self.rng.r#gen::<f64>() - 0.5) * jitter;

		let distance = p.distance_from_origin();
		if distance > radius && distance > 0.0 {
			let pull = (distance - radius) * PULL_BACK;
			p.x -= (p.x - p.origin_x) / distance * pull;
			p.y -= (p.y - p.origin_y) / distance * pull;
		}
	}

	fn sparkle(&mut self, p: &mut Particle, dt: f64) {
		let diff = p.target_opacity - p.opacity;
		p.opacity += diff * (p.sparkle_speed * dt * SPARKLE_RATE).min(1.0);

		if diff.abs() < RETARGET_TOLERANCE {
			p.target_opacity = if self.rng.r#gen::<f64>() < DIM_CHANCE {
				self.rng.r#gen::<f64>() * 0.15 * p.original_alpha
			} else {
				p.original_alpha * (1.5 + self.rng.r#gen::<f64>())
			};
			p.sparkle_speed = self.rng.r#gen::<f64>() * 2.0 + 0.5;
		}
	}
}
