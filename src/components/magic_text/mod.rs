//! Glyph-particle text reveal widget.
//!
//! Renders a string as a cloud of particles sampled from its own glyph pixels:
//! - Idle: particles drift inside a soft boundary around their origin,
//!   twinkling and cycling through a rainbow palette
//! - Hovered: particles home in on their origin and fade out while the literal,
//!   selectable text fades in on top
//! - Resized: the wrapper re-fits the text and the field is resampled after a
//!   short debounce
//!
//! The engine ([`RevealWidget`]) is host-agnostic and runs natively under
//! tests with [`BitmapRasterizer`]; [`MagicTextReveal`] binds it to a canvas.
//!
//! # Example
//!
//! ```ignore
//! use estportfolio::components::magic_text::{MagicTextReveal, RevealConfig};
//!
//! let config = RevealConfig {
//!     text: "hello@example.com".into(),
//!     font_size: 32.0,
//!     ..RevealConfig::default()
//! };
//!
//! view! { <MagicTextReveal config=config /> }
//! ```

mod component;
mod glyphs;
mod particles;
mod raster;
mod render;
pub mod scale;
mod simulation;
mod state;
pub mod theme;
mod types;

pub use component::MagicTextReveal;
pub use particles::{Particle, ParticleField};
pub use raster::{BitmapRasterizer, CanvasRasterizer, Raster, Rasterizer, Size, TextBounds};
pub use render::{ColorBatch, Sprite};
pub use state::{HoverState, RESIZE_DEBOUNCE, ResizeDebounce, RevealWidget};
pub use types::{FRAME_INTERVAL, FontSpec, RevealConfig};
