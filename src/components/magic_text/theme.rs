//! Colors and visual style for the particle field.
//!
//! Particles keep an HSL triple that drifts around the color wheel; the
//! renderer converts it to RGB once per particle per frame.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha in [0, 1].
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same channels, new alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Converts hue in degrees, saturation and lightness in percent.
	pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
		let h = hue.rem_euclid(360.0) / 360.0;
		let s = (saturation / 100.0).clamp(0.0, 1.0);
		let l = (lightness / 100.0).clamp(0.0, 1.0);

		let a = s * l.min(1.0 - l);
		let channel = |n: f64| {
			let k = (n + h * 12.0) % 12.0;
			let v = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
			(v * 255.0).round().clamp(0.0, 255.0) as u8
		};

		Self::rgb(channel(0.0), channel(8.0), channel(4.0))
	}

	/// `rgba(r, g, b, a)` with alpha clamped to [0, 1] and rounded to two
	/// decimals, so near-identical particles share a fill batch.
	pub fn to_css(self) -> String {
		let a = (self.a.clamp(0.0, 1.0) * 100.0).round() / 100.0;
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
	}
}

/// Parses a CSS color string into a [`Color`].
/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
pub fn parse_color(color_str: &str) -> Color {
	let color_str = color_str.trim();
	if color_str.starts_with('#') && color_str.len() == 7 && color_str.is_ascii() {
		let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(255);
		let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(255);
		let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(255);
		Color::rgb(r, g, b)
	} else if color_str.starts_with("rgb") {
		let nums: Vec<&str> = color_str
			.trim_start_matches("rgba(")
			.trim_start_matches("rgb(")
			.trim_end_matches(')')
			.split(',')
			.collect();
		let channel = |i: usize| {
			nums.get(i)
				.and_then(|s| s.trim().parse::<f64>().ok())
				.map_or(255, |v| v.clamp(0.0, 255.0) as u8)
		};
		let a = nums
			.get(3)
			.and_then(|s| s.trim().parse().ok())
			.unwrap_or(1.0);
		Color::rgba(channel(0), channel(1), channel(2), a)
	} else {
		Color::rgb(255, 255, 255)
	}
}

/// HSL triple of a particle at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
	/// Degrees in [0, 360).
	pub hue: f64,
	/// Percent.
	pub saturation: f64,
	/// Percent.
	pub lightness: f64,
}

/// Rainbow position of particle `index` at time `t` seconds.
///
/// Hue advances 30 degrees per second and is staggered 8 degrees per index;
/// saturation and lightness wobble by 15 points around 70% and 55%.
pub fn rainbow(base_hue: f64, t: f64, index: usize) -> Hsl {
	let i = index as f64;
	Hsl {
		hue: (base_hue + t * 30.0 + i * 8.0).rem_euclid(360.0),
		saturation: 70.0 + (t + i).sin() * 15.0,
		lightness: 55.0 + (t * 2.0 + i * 0.3).sin() * 15.0,
	}
}

/// Particle sprite configuration.
#[derive(Clone, Debug)]
pub struct ParticleStyle {
	/// Side of the square sprite in CSS pixels before oscillation.
	pub base_size: f64,
	/// Amplitude of the size oscillation.
	pub size_wobble: f64,
	/// Angular rate of the size oscillation, radians per second.
	pub wobble_rate: f64,
	/// Shadow blur applied per color batch.
	pub glow_blur: f64,
	/// Particles at or below this opacity are not drawn.
	pub cull_opacity: f64,
}

impl Default for ParticleStyle {
	fn default() -> Self {
		Self {
			base_size: 4.5,
			size_wobble: 2.0,
			wobble_rate: 3.0,
			glow_blur: 8.0,
			cull_opacity: 0.01,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn primary_hues() {
		assert_eq!(Color::from_hsl(0.0, 100.0, 50.0), Color::rgb(255, 0, 0));
		assert_eq!(Color::from_hsl(120.0, 100.0, 50.0), Color::rgb(0, 255, 0));
		assert_eq!(Color::from_hsl(240.0, 100.0, 50.0), Color::rgb(0, 0, 255));
		assert_eq!(Color::from_hsl(360.0, 100.0, 50.0), Color::rgb(255, 0, 0));
	}

	#[test]
	fn greys_ignore_hue() {
		assert_eq!(Color::from_hsl(200.0, 0.0, 100.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::from_hsl(17.0, 0.0, 0.0), Color::rgb(0, 0, 0));
	}

	#[test]
	fn css_alpha_is_clamped_and_rounded() {
		assert_eq!(Color::rgba(1, 2, 3, 2.4).to_css(), "rgba(1, 2, 3, 1)");
		assert_eq!(Color::rgba(1, 2, 3, 0.456).to_css(), "rgba(1, 2, 3, 0.46)");
		assert_eq!(Color::rgba(1, 2, 3, -0.2).to_css(), "rgba(1, 2, 3, 0)");
	}

	#[test]
	fn parses_css_colors() {
		assert_eq!(parse_color("#ff004f"), Color::rgb(255, 0, 79));
		assert_eq!(
			parse_color("rgba(255, 255, 255, 0.5)"),
			Color::rgba(255, 255, 255, 0.5)
		);
		assert_eq!(parse_color("rgb(10, 20, 30)"), Color::rgb(10, 20, 30));
	}

	#[test]
	fn rainbow_stays_in_range() {
		for index in 0..50 {
			let hsl = rainbow(350.0, index as f64 * 0.37, index);
			assert!((0.0..360.0).contains(&hsl.hue));
			assert!((55.0..=85.0).contains(&hsl.saturation));
			assert!((40.0..=70.0).contains(&hsl.lightness));
		}
	}
}
