//! Widget state: hover tracking, frame throttling, resize debouncing, and the
//! engine that owns the particle field between ticks.

use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::SmallRng;

use super::particles::ParticleField;
use super::raster::{Rasterizer, Size};
use super::render::{ColorBatch, build_batches};
use super::scale::{effective_dpr, text_anchor};
use super::simulation::{Motion, Simulator};
use super::theme::ParticleStyle;
use super::types::RevealConfig;

/// Longest step the simulation accepts; longer gaps (backgrounded tab) are cut.
pub const MAX_TICK: f64 = 0.1;

/// Pointer hover and literal-text visibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	/// Pointer is over the widget (or the text is latched on).
	pub hovered: bool,
	/// Lags `hovered` by one tick; drives the overlay fade.
	pub text_visible: bool,
	/// Set on first pointer enter.
	pub has_been_shown: bool,
}

impl HoverState {
	/// Marks the widget hovered.
	pub fn pointer_enter(&mut self) {
		self.hovered = true;
		self.has_been_shown = true;
	}

	/// Clears hover unless the text is meant to stay once revealed.
	pub fn pointer_leave(&mut self, reset_on_leave: bool) {
		if reset_on_leave || !self.has_been_shown {
			self.hovered = false;
		}
	}
}

/// Lets through every `interval`-th animation frame and measures the time
/// since the previous one let through.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
	interval: u32,
	frames: u64,
	last_ms: Option<f64>,
}

impl FrameThrottle {
	/// An interval of 0 is treated as 1.
	pub fn new(interval: u32) -> Self {
		Self {
			interval: interval.max(1),
			frames: 0,
			last_ms: None,
		}
	}

	/// `Some(dt)` in seconds when this frame should be processed.
	pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
		self.frames += 1;
		if self.frames % self.interval as u64 != 0 {
			return None;
		}
		let dt = self
			.last_ms
			.map_or(0.0, |last| ((now_ms - last) / 1000.0).clamp(0.0, MAX_TICK));
		self.last_ms = Some(now_ms);
		Some(dt)
	}
}

/// Quiet period after the last resize notification before resampling.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Collapses a burst of resize notifications into one recompute, due once no
/// notification has arrived for the quiet period.
#[derive(Clone, Debug)]
pub struct ResizeDebounce {
	quiet_ms: f64,
	last_ms: Option<f64>,
}

impl Default for ResizeDebounce {
	fn default() -> Self {
		Self::new(RESIZE_DEBOUNCE)
	}
}

impl ResizeDebounce {
	/// A debounce with nothing pending.
	pub fn new(quiet: Duration) -> Self {
		Self {
			quiet_ms: quiet.as_secs_f64() * 1000.0,
			last_ms: None,
		}
	}

	/// Records a notification; restarts the quiet period.
	pub fn notify(&mut self, now_ms: f64) {
		self.last_ms = Some(now_ms);
	}

	/// True once per burst, when the quiet period has elapsed since the last
	/// notification. Clears the pending recompute when it fires.
	pub fn due(&mut self, now_ms: f64) -> bool {
		match self.last_ms {
			Some(last) if now_ms - last >= self.quiet_ms => {
				self.last_ms = None;
				true
			}
			_ => false,
		}
	}

	/// Drops any pending recompute.
	pub fn cancel(&mut self) {
		self.last_ms = None;
	}

	/// A recompute is waiting for quiet.
	pub fn is_pending(&self) -> bool {
		self.last_ms.is_some()
	}
}

/// Everything one mounted widget owns: configuration, the current particle
/// field, the simulator, and hover state.
///
/// Host-agnostic; the Leptos component feeds it sizes, pointer events, and
/// frame times, and draws what [`RevealWidget::batches`] returns.
pub struct RevealWidget<R = SmallRng> {
	config: RevealConfig,
	motion: Motion,
	style: ParticleStyle,
	field: ParticleField,
	simulator: Simulator<R>,
	hover: HoverState,
	backing: Size,
	dpr: f64,
	degraded: bool,
}

impl<R: Rng> RevealWidget<R> {
	/// An unsampled widget; call [`RevealWidget::resample`] once sized.
	pub fn new(config: RevealConfig, rng: R) -> Self {
		Self {
			motion: Motion::from(&config),
			config,
			style: ParticleStyle::default(),
			field: ParticleField::empty(),
			simulator: Simulator::new(rng),
			hover: HoverState::default(),
			backing: Size::ZERO,
			dpr: 1.0,
			degraded: false,
		}
	}

	/// Padded CSS size of the text, or zero when it cannot be measured.
	///
	/// Non-empty text that measures to nothing degrades the widget to the
	/// literal text overlay.
	pub fn measure_text(&mut self, rasterizer: &dyn Rasterizer) -> Size {
		let size = match rasterizer.measure(&self.config.text, &self.config.font()) {
			Ok(size) => size,
			Err(e) => {
				warn!("estportfolio: text measurement failed: {}", e);
				Size::ZERO
			}
		};
		if !size.is_drawable() && !self.config.text.is_empty() {
			self.degrade();
		}
		size
	}

	/// Gives up on particles and shows the literal text instead.
	pub fn degrade(&mut self) {
		self.degraded = true;
	}

	/// Rebuilds the particle field for a `container` of CSS pixels.
	///
	/// Non-positive sizes are ignored and the previous field is kept. A
	/// rasterizer failure leaves an empty field and marks the widget degraded.
	/// Returns whether a new field was installed.
	pub fn resample(&mut self, rasterizer: &dyn Rasterizer, container: Size, raw_dpr: f64) -> bool {
		if !container.is_drawable() {
			debug!(
				"estportfolio: skipping resample for {}x{}",
				container.width, container.height
			);
			return false;
		}

		let dpr = effective_dpr(raw_dpr);
		let backing = container.scaled(dpr);
		let backing = Size::new(backing.width.floor(), backing.height.floor());
		let font = self.config.font().scaled(dpr);
		let anchor = text_anchor(backing, self.config.text_offset_x, dpr);

		let field = match rasterizer.rasterize(&self.config.text, &font, &self.config.color, backing, anchor) {
			Ok(raster) => {
				self.degraded = false;
				ParticleField::sample(
					&raster,
					self.config.sample_stride(),
					self.motion.float_radius,
					self.simulator.rng_mut(),
				)
			}
			Err(e) => {
				warn!("estportfolio: rasterization failed, showing plain text: {}", e);
				self.degraded = true;
				ParticleField::empty()
			}
		};

		info!(
			"estportfolio: sampled {} particles from {}x{} raster (stride {})",
			field.len(),
			backing.width,
			backing.height,
			self.config.sample_stride()
		);
		self.field = field;
		self.backing = backing;
		self.dpr = dpr;
		true
	}

	/// Advances the simulation by `dt` seconds; returns a visibility flip of
	/// the literal text, if any.
	pub fn tick(&mut self, dt: f64) -> Option<bool> {
		let flip = self.simulator.step(
			self.field.particles_mut(),
			dt,
			self.hover.hovered,
			self.hover.text_visible,
			&self.motion,
		);
		if let Some(visible) = flip {
			self.hover.text_visible = visible;
		}
		flip
	}

	/// Pointer entered the wrapper.
	pub fn pointer_enter(&mut self) {
		self.hover.pointer_enter();
	}

	/// Pointer left the wrapper; honours `reset_on_mouse_leave`.
	pub fn pointer_leave(&mut self) {
		self.hover.pointer_leave(self.config.reset_on_mouse_leave);
	}

	/// Fill batches for the current frame.
	pub fn batches(&self) -> Vec<ColorBatch> {
		build_batches(self.field.particles(), self.dpr, self.simulator.time(), &self.style)
	}

	/// Configuration the widget was built with.
	pub fn config(&self) -> &RevealConfig {
		&self.config
	}

	/// The current particle field.
	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	/// Hover latch state.
	pub fn hover(&self) -> &HoverState {
		&self.hover
	}

	/// Sprite style handed to the renderer.
	pub fn style(&self) -> &ParticleStyle {
		&self.style
	}

	/// Whether the literal text should be on screen: revealed by hover, or
	/// because there are no particles to show instead.
	pub fn overlay_visible(&self) -> bool {
		self.hover.text_visible || self.degraded
	}

	/// The last rasterization or measurement failed.
	pub fn is_degraded(&self) -> bool {
		self.degraded
	}

	/// Canvas backing store size in device pixels.
	pub fn backing_size(&self) -> Size {
		self.backing
	}

	/// Device pixel ratio of the current field, already capped.
	pub fn dpr(&self) -> f64 {
		self.dpr
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;
	use crate::components::magic_text::raster::{BitmapRasterizer, Raster};
	use crate::components::magic_text::types::FontSpec;
	use crate::error::RevealError;

	struct Broken;

	impl Rasterizer for Broken {
		fn measure(&self, _: &str, _: &FontSpec) -> Result<Size, RevealError> {
			Err(RevealError::ContextUnavailable)
		}

		fn rasterize(&self, _: &str, _: &FontSpec, _: &str, _: Size, _: (f64, f64)) -> Result<Raster, RevealError> {
			Err(RevealError::ContextUnavailable)
		}
	}

	fn widget(text: &str) -> RevealWidget {
		let config = RevealConfig {
			text: text.to_string(),
			font_size: 14.0,
			density: 2,
			spread: 15.0,
			..RevealConfig::default()
		};
		RevealWidget::new(config, SmallRng::seed_from_u64(11))
	}

	#[test]
	fn leave_resets_hover_by_default() {
		let mut hover = HoverState::default();
		hover.pointer_enter();
		assert!(hover.hovered && hover.has_been_shown);
		hover.pointer_leave(true);
		assert!(!hover.hovered);
	}

	#[test]
	fn sticky_hover_survives_leave() {
		let mut hover = HoverState::default();
		hover.pointer_leave(false);
		assert!(!hover.hovered);
		hover.pointer_enter();
		hover.pointer_leave(false);
		assert!(hover.hovered);
	}

	#[test]
	fn throttle_processes_every_other_frame() {
		let mut throttle = FrameThrottle::new(2);
		assert_eq!(throttle.poll(0.0), None);
		assert_eq!(throttle.poll(16.0), Some(0.0));
		assert_eq!(throttle.poll(33.0), None);
		let dt = throttle.poll(50.0).unwrap();
		assert!((dt - 0.034).abs() < 1e-12);
	}

	#[test]
	fn throttle_caps_long_gaps() {
		let mut throttle = FrameThrottle::new(1);
		throttle.poll(0.0);
		assert_eq!(throttle.poll(5000.0), Some(MAX_TICK));
		assert_eq!(throttle.poll(4000.0), Some(0.0));
		assert_eq!(FrameThrottle::new(0).poll(1.0), Some(0.0));
	}

	#[test]
	fn text_visibility_follows_hover_on_next_tick() {
		let mut w = widget("Hi");
		assert!(w.resample(&BitmapRasterizer, Size::new(200.0, 100.0), 1.0));
		w.pointer_enter();
		assert!(!w.hover().text_visible);
		assert_eq!(w.tick(0.033), Some(true));
		assert!(w.overlay_visible());
		assert_eq!(w.tick(0.033), None);
		w.pointer_leave();
		assert_eq!(w.tick(0.033), Some(false));
		assert!(!w.overlay_visible());
	}

	#[test]
	fn unmeasurable_text_shows_the_overlay_before_any_resample() {
		let mut w = widget("Hi");
		assert!(!w.overlay_visible());
		assert_eq!(w.measure_text(&Broken), Size::ZERO);
		assert!(w.is_degraded());
		assert!(w.overlay_visible());
	}

	#[test]
	fn measurable_or_empty_text_does_not_degrade() {
		let mut w = widget("Hi");
		assert!(w.measure_text(&BitmapRasterizer).is_drawable());
		assert!(!w.is_degraded());

		let mut empty = widget("");
		assert_eq!(empty.measure_text(&BitmapRasterizer), Size::ZERO);
		assert!(!empty.is_degraded());
	}

	#[test]
	fn resize_burst_recomputes_once_after_quiet() {
		let mut debounce = ResizeDebounce::default();
		assert!(!debounce.due(0.0));

		let mut recomputes = 0;
		for now in (0..10).map(|i| i as f64 * 30.0) {
			debounce.notify(now);
			if debounce.due(now + 50.0) {
				recomputes += 1;
			}
		}
		assert_eq!(recomputes, 0);
		assert!(debounce.is_pending());

		assert!(!debounce.due(270.0 + 99.0));
		for now in [370.0, 400.0, 1000.0] {
			if debounce.due(now) {
				recomputes += 1;
			}
		}
		assert_eq!(recomputes, 1);
		assert!(!debounce.is_pending());
	}

	#[test]
	fn cancelled_resize_never_fires() {
		let mut debounce = ResizeDebounce::new(RESIZE_DEBOUNCE);
		debounce.notify(10.0);
		debounce.notify(60.0);
		debounce.cancel();
		assert!(!debounce.is_pending());
		assert!(!debounce.due(160.0));
		assert!(!debounce.due(10_000.0));
	}

	#[test]
	fn invalid_sizes_keep_the_last_field() {
		let mut w = widget("Hi");
		assert!(w.resample(&BitmapRasterizer, Size::new(200.0, 100.0), 2.0));
		let before = w.field().len();
		assert!(before > 0);
		assert!(!w.resample(&BitmapRasterizer, Size::new(0.0, 100.0), 2.0));
		assert!(!w.resample(&BitmapRasterizer, Size::new(200.0, -5.0), 2.0));
		assert_eq!(w.field().len(), before);
		assert_eq!(w.backing_size(), Size::new(400.0, 200.0));
	}

	#[test]
	fn rasterizer_failure_degrades_to_plain_text() {
		let mut w = widget("Hi");
		assert_eq!(w.measure_text(&Broken), Size::ZERO);
		assert!(w.resample(&Broken, Size::new(200.0, 100.0), 1.0));
		assert!(w.field().is_empty());
		assert!(w.is_degraded());
		assert!(w.overlay_visible());
		assert_eq!(w.tick(0.033), None);
		assert!(w.batches().is_empty());
	}

	#[test]
	fn resampling_replaces_the_whole_field() {
		let (a, b) = (Size::new(240.0, 100.0), Size::new(320.0, 120.0));

		let mut w = widget("Hello");
		w.resample(&BitmapRasterizer, a, 2.0);
		let count_a = w.field().len();
		w.resample(&BitmapRasterizer, b, 2.0);
		let count_b = w.field().len();
		assert_eq!(w.backing_size(), Size::new(640.0, 240.0));

		let mut fresh = RevealWidget::new(w.config().clone(), SmallRng::seed_from_u64(99));
		fresh.resample(&BitmapRasterizer, b, 2.0);
		assert_eq!(fresh.field().len(), count_b);

		w.resample(&BitmapRasterizer, a, 2.0);
		assert_eq!(w.field().len(), count_a);
	}

	#[test]
	fn dpr_is_capped_when_sampling() {
		let mut w = widget("Hi");
		w.resample(&BitmapRasterizer, Size::new(100.0, 50.0), 3.0);
		assert_eq!(w.dpr(), 2.0);
		assert_eq!(w.backing_size(), Size::new(200.0, 100.0));
	}
}
