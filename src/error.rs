//! Error type shared by the browser-facing parts of the crate.
//!
//! Nothing here is fatal: callers log the error and fall back to a degraded
//! visual (no particles, literal text only).

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by rasterization, canvas setup, and form submission.
#[derive(Debug, Error)]
pub enum RevealError {
	/// No global `window` (headless or worker context).
	#[error("no window available")]
	NoWindow,
	/// The window has no document.
	#[error("no document available")]
	NoDocument,
	/// Creating an offscreen canvas element failed.
	#[error("could not create canvas element")]
	CanvasCreation,
	/// The canvas refused to hand out a 2d context.
	#[error("2d drawing context unavailable")]
	ContextUnavailable,
	/// A JavaScript call threw.
	#[error("javascript call `{call}` failed: {detail}")]
	Js {
		/// Name of the failing call.
		call: &'static str,
		/// Debug rendering of the thrown value.
		detail: String,
	},
	/// The contact form could not be delivered.
	#[error("form submission failed: {0}")]
	Submit(String),
}

impl RevealError {
	/// Wraps a thrown `JsValue` with the name of the call that threw it.
	pub fn js(call: &'static str, value: JsValue) -> Self {
		Self::Js {
			call,
			detail: format!("{value:?}"),
		}
	}
}
