//! End-to-end runs of the reveal engine with the headless glyph rasterizer.

#![allow(unused_crate_dependencies)]

use estportfolio::components::magic_text::scale::wrapper_size;
use estportfolio::components::magic_text::{BitmapRasterizer, RevealConfig, RevealWidget, Size};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const TICK: f64 = 1.0 / 30.0;
const SPREAD: f64 = 15.0;

fn hi_widget(seed: u64) -> RevealWidget {
	let config = RevealConfig {
		text: "Hi".to_string(),
		font_size: 14.0,
		density: 2,
		spread: SPREAD,
		..RevealConfig::default()
	};
	let mut widget = RevealWidget::new(config, SmallRng::seed_from_u64(seed));

	let text = widget.measure_text(&BitmapRasterizer);
	let container = wrapper_size(text, 14.0, Size::new(1280.0, 800.0), None).unwrap();
	assert_eq!(container, Size::new(200.0, 100.0));
	assert!(widget.resample(&BitmapRasterizer, container, 2.0));
	widget
}

fn idle_for(widget: &mut RevealWidget, seconds: f64) {
	let count = widget.field().len();
	for _ in 0..(seconds / TICK).round() as usize {
		assert_eq!(widget.tick(TICK), None);
		assert_eq!(widget.field().len(), count);
		for p in widget.field().particles() {
			assert!(
				p.distance_from_origin() < SPREAD * 1.05,
				"particle drifted {} from ({}, {})",
				p.distance_from_origin(),
				p.origin_x,
				p.origin_y
			);
		}
	}
}

#[test]
fn sampled_origins_fall_inside_the_text_box() {
	let widget = hi_widget(1);
	let field = widget.field();
	assert!(!field.is_empty());
	let bounds = field.bounds();
	assert!(!bounds.is_empty());
	assert!(field.particles().iter().any(|p| bounds.contains(p.origin_x, p.origin_y)));
}

#[test]
fn idle_particles_stay_within_the_spread() {
	for seed in [3, 17, 2024] {
		let mut widget = hi_widget(seed);
		idle_for(&mut widget, 5.0);
		assert!(!widget.overlay_visible());
	}
}

#[test]
fn hover_coalesces_and_fades_within_two_seconds() {
	let mut widget = hi_widget(5);
	idle_for(&mut widget, 5.0);

	widget.pointer_enter();
	assert_eq!(widget.tick(TICK), Some(true));
	for _ in 1..60 {
		widget.tick(TICK);
	}

	assert!(widget.overlay_visible());
	for p in widget.field().particles() {
		assert!(p.opacity <= 0.01);
		assert!((p.x - p.origin_x).abs() < 1e-9 && (p.y - p.origin_y).abs() < 1e-9);
	}
	assert!(widget.batches().is_empty());
}

#[test]
fn leaving_hides_the_text_again() {
	let mut widget = hi_widget(8);
	widget.pointer_enter();
	widget.tick(TICK);
	widget.pointer_leave();
	assert_eq!(widget.tick(TICK), Some(false));
	assert!(!widget.overlay_visible());
}

#[test]
fn empty_text_runs_as_a_no_op() {
	let mut widget = RevealWidget::new(
		RevealConfig {
			text: String::new(),
			..RevealConfig::default()
		},
		SmallRng::seed_from_u64(0),
	);
	assert!(widget.resample(&BitmapRasterizer, Size::new(200.0, 100.0), 1.0));
	assert!(widget.field().is_empty());
	for _ in 0..30 {
		widget.tick(TICK);
	}
	assert!(widget.batches().is_empty());
	assert!(!widget.is_degraded());
}
