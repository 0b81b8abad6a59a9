//! Leptos component wrapping the particle reveal canvas.
//!
//! The component measures the text, sizes its wrapper, and samples particles
//! from the canvas. An animation loop runs via `requestAnimationFrame`,
//! processing every `frame_interval`-th frame: one simulation step, then one
//! render. Window resizes are debounced before the field is rebuilt.
//!
//! The loop closure and the widget engine live in local stored values owned by
//! the component, so unmounting drops both.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::ev;
use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle, window_event_listener};
use leptos::prelude::*;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::HtmlDivElement;

use super::raster::{CanvasRasterizer, Size};
use super::render;
use super::scale::wrapper_size;
use super::state::{FrameThrottle, RESIZE_DEBOUNCE, ResizeDebounce, RevealWidget};
use super::types::RevealConfig;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// The widget engine plus the canvas it samples from and draws on.
struct RevealContext {
	widget: RevealWidget,
	surface: CanvasRasterizer,
}

impl RevealContext {
	/// Resamples for `container` CSS pixels and redraws the first frame.
	fn resample(&mut self, container: Size) {
		if self.widget.resample(&self.surface, container, device_pixel_ratio()) {
			self.draw();
		}
	}

	/// One simulation step and one render; returns a visibility flip, if any.
	fn frame(&mut self, dt: f64) -> Option<bool> {
		let flip = self.widget.tick(dt).map(|_| self.widget.overlay_visible());
		self.draw();
		flip
	}

	fn draw(&self) {
		let batches = self.widget.batches();
		render::draw(
			self.surface.context(),
			self.widget.backing_size(),
			self.widget.dpr(),
			&batches,
			self.widget.style(),
		);
	}
}

fn device_pixel_ratio() -> f64 {
	web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

fn viewport() -> Option<Size> {
	let window = web_sys::window()?;
	Some(Size::new(
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// CSS box for the wrapper given the measured text and the parent's box.
fn layout(text: Size, font_size: f64, wrapper: Option<&HtmlDivElement>) -> Option<Size> {
	let parent = wrapper
		.and_then(|w| w.parent_element())
		.map(|p| {
			let rect = p.get_bounding_client_rect();
			Size::new(rect.width(), rect.height())
		})
		.filter(Size::is_drawable);
	wrapper_size(text, font_size, viewport()?, parent)
}

fn fresh_rng() -> SmallRng {
	SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64)
}

fn request_frame(callback: &Option<FrameCallback>, frame_id: &AtomicI32) {
	if let (Some(cb), Some(window)) = (callback.as_ref(), web_sys::window()) {
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			frame_id.store(id, Ordering::Relaxed);
		}
	}
}

/// Text that dissolves into a cloud of twinkling, color-cycling particles and
/// reassembles into the literal text under the pointer.
///
/// The wrapper sizes itself to the padded text, bounded by its parent.
/// `class` and `style` are appended to the wrapper's own.
#[component]
pub fn MagicTextReveal(
	#[prop(default = RevealConfig::default())] config: RevealConfig,
	#[prop(optional, into)] class: String,
	#[prop(optional, into)] style: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let wrapper_ref = NodeRef::<leptos::html::Div>::new();
	let (hovered, set_hovered) = signal(false);
	let (overlay_visible, set_overlay_visible) = signal(false);
	let (box_size, set_box_size) = signal(Size::ZERO);
	let pending_resize = StoredValue::new(None::<TimeoutHandle>);
	let debounce = StoredValue::new(ResizeDebounce::new(RESIZE_DEBOUNCE));

	let context = StoredValue::new_local(None::<RevealContext>);
	let animate = StoredValue::new_local(None::<FrameCallback>);
	let config_init = config.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let mut widget = RevealWidget::new(config_init.clone(), fresh_rng());
		let font_size = config_init.font_size;

		let text_size = match CanvasRasterizer::offscreen() {
			Ok(measurer) => widget.measure_text(&measurer),
			Err(e) => {
				warn!("estportfolio: cannot measure text: {}", e);
				widget.degrade();
				Size::ZERO
			}
		};
		let surface = match CanvasRasterizer::new(canvas) {
			Ok(surface) => surface,
			Err(e) => {
				warn!("estportfolio: particle canvas unavailable: {}", e);
				set_overlay_visible.set(true);
				return;
			}
		};

		let mut reveal = RevealContext { widget, surface };
		match layout(text_size, font_size, wrapper_ref.get_untracked().as_ref()) {
			Some(size) => {
				set_box_size.set(size);
				reveal.resample(size);
			}
			None => debug!("estportfolio: no layout yet for {:?}", reveal.widget.config().text),
		}
		set_overlay_visible.set(reveal.widget.overlay_visible());
		context.set_value(Some(reveal));

		let resize_handle = window_event_listener(ev::resize, move |_| {
			debounce.update_value(|d| d.notify(js_sys::Date::now()));
			pending_resize.update_value(|pending| {
				if let Some(handle) = pending.take() {
					handle.clear();
				}
			});
			let scheduled = set_timeout_with_handle(
				move || {
					let due = debounce.try_update_value(|d| d.due(js_sys::Date::now()));
					if due != Some(true) {
						return;
					}
					let Some(size) = layout(text_size, font_size, wrapper_ref.get_untracked().as_ref()) else {
						return;
					};
					debug!("estportfolio: resized to {}x{}", size.width, size.height);
					set_box_size.set(size);
					let visible = context
						.try_update_value(|slot| {
							slot.as_mut().map(|c| {
								c.resample(size);
								c.widget.overlay_visible()
							})
						})
						.flatten();
					if let Some(visible) = visible {
						set_overlay_visible.set(visible);
					}
				},
				RESIZE_DEBOUNCE,
			);
			match scheduled {
				Ok(handle) => pending_resize.set_value(Some(handle)),
				Err(e) => warn!("estportfolio: could not schedule resize: {:?}", e),
			}
		});

		let alive = Arc::new(AtomicBool::new(true));
		let frame_id = Arc::new(AtomicI32::new(0));
		let (alive_anim, frame_id_anim) = (alive.clone(), frame_id.clone());
		let mut throttle = FrameThrottle::new(config_init.frame_interval);

		animate.set_value(Some(Closure::new(move |now: f64| {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(dt) = throttle.poll(now) {
				let flip = context
					.try_update_value(|slot| slot.as_mut().and_then(|c| c.frame(dt)))
					.flatten();
				if let Some(visible) = flip {
					set_overlay_visible.set(visible);
				}
			}
			animate.try_with_value(|cb| request_frame(cb, &frame_id_anim));
		})));
		animate.with_value(|cb| request_frame(cb, &frame_id));

		on_cleanup(move || {
			alive.store(false, Ordering::Relaxed);
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(frame_id.load(Ordering::Relaxed));
			}
			debounce.try_update_value(|d| d.cancel());
			pending_resize.try_update_value(|pending| {
				if let Some(handle) = pending.take() {
					handle.clear();
				}
			});
			resize_handle.remove();
			animate.try_update_value(|cb| *cb = None);
			context.try_update_value(|slot| *slot = None);
		});
	});

	let on_mouseenter = move |_: ev::MouseEvent| {
		let hovered = context
			.try_update_value(|slot| {
				slot.as_mut().map(|c| {
					c.widget.pointer_enter();
					c.widget.hover().hovered
				})
			})
			.flatten();
		set_hovered.set(hovered.unwrap_or(true));
	};

	let reset_on_leave = config.reset_on_mouse_leave;
	let on_mouseleave = move |_: ev::MouseEvent| {
		let hovered = context
			.try_update_value(|slot| {
				slot.as_mut().map(|c| {
					c.widget.pointer_leave();
					c.widget.hover().hovered
				})
			})
			.flatten();
		match hovered {
			Some(hovered) => set_hovered.set(hovered),
			None if reset_on_leave => set_hovered.set(false),
			None => {}
		}
	};

	let wrapper_style = move || {
		let size = box_size.get();
		let dims = if size.is_drawable() {
			format!("width: {}px; height: {}px;", size.width, size.height)
		} else {
			"width: auto; height: auto;".to_string()
		};
		let (border, glow) = if hovered.get() {
			(
				"1px solid #ff004f",
				"0 0 10px #4285f4, 0 0 20px #d93025, 0 0 30px #f9ab00, 0 0 40px #34a853",
			)
		} else {
			("1px solid rgba(255, 255, 255, 0.2)", "none")
		};
		format!(
			"{dims} min-width: 150px; min-height: 80px; max-width: 100%; \
			 background-color: rgba(15, 15, 15, 0.8); border: {border}; box-shadow: {glow}; \
			 backdrop-filter: blur(10px); cursor: default; {style}"
		)
	};

	let overlay_class = move || {
		if overlay_visible.get() {
			"magic-text-overlay absolute z-20 transition-opacity duration-300 opacity-100"
		} else {
			"magic-text-overlay absolute z-20 transition-opacity duration-300 opacity-0"
		}
	};
	let overlay_style = format!(
		"color: {}; font-family: {}; font-weight: {}; font-size: {}px; user-select: text; \
		 cursor: text; white-space: nowrap; left: 60%; top: 50%; transform: translate(-50%, -50%); \
		 text-align: center; background-color: transparent; padding: 4px 8px; border-radius: 4px;",
		config.color, config.font_family, config.font_weight, config.font_size
	);

	view! {
		<div
			node_ref=wrapper_ref
			class=format!(
				"magic-text-reveal relative flex items-center justify-center overflow-hidden rounded-lg transition-all duration-300 {class}",
			)
			style=wrapper_style
			on:mouseenter=on_mouseenter
			on:mouseleave=on_mouseleave
		>
			<div class=overlay_class style=overlay_style>
				{config.text.clone()}
			</div>
			<canvas
				node_ref=canvas_ref
				class="magic-text-canvas absolute top-0 left-0 w-full h-full"
				style="z-index: 10;"
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use super::*;

	struct Tracked(Arc<AtomicUsize>);

	impl Drop for Tracked {
		fn drop(&mut self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn self_scheduling_callback_is_dropped_with_its_owner() {
		let drops = Arc::new(AtomicUsize::new(0));
		let owner = Owner::new();
		owner.with(|| {
			let engine = StoredValue::new_local(Some(Tracked(drops.clone())));
			let callback = StoredValue::new_local(None::<Box<dyn FnMut()>>);
			let held = Tracked(drops.clone());
			callback.set_value(Some(Box::new(move || {
				let _held = &held;
				engine.try_with_value(|e| e.is_some());
				callback.try_with_value(|cb| cb.is_some());
			})));
			assert!(callback.with_value(Option::is_some));
		});
		assert_eq!(drops.load(Ordering::SeqCst), 0);

		owner.cleanup();
		assert_eq!(drops.load(Ordering::SeqCst), 2);
	}
}
