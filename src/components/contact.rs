//! Contact form posting to an external form-processing endpoint.
//!
//! Delivery is fire-and-forget: the request goes out with `mode: no-cors`, so
//! the response is opaque and the form reports success either way.

use std::time::Duration;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, HtmlFormElement, Request, RequestInit, RequestMode};

use crate::error::RevealError;

/// How long the success label stays before the form resets.
pub const RESET_DELAY: Duration = Duration::from_secs(2);

/// Submit button state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
	/// Idle and ready to send.
	#[default]
	Normal,
	/// Request in flight.
	Submitting,
	/// Sent; waiting out [`RESET_DELAY`].
	Success,
}

impl SubmitStatus {
	/// Button text for this state.
	pub fn button_label(self) -> &'static str {
		match self {
			Self::Normal => "Initiate Data Transfer",
			Self::Submitting => "Transmitting...",
			Self::Success => "Data Transmitted",
		}
	}

	/// Whether another submission should be refused.
	pub fn is_busy(self) -> bool {
		self != Self::Normal
	}
}

/// Posts the form's fields to `endpoint`.
async fn send(endpoint: &str, form: &HtmlFormElement) -> Result<(), RevealError> {
	let window = web_sys::window().ok_or(RevealError::NoWindow)?;
	let data = FormData::new_with_form(form).map_err(|e| RevealError::js("FormData", e))?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_mode(RequestMode::NoCors);
	init.set_body(&data);
	let request = Request::new_with_str_and_init(endpoint, &init).map_err(|e| RevealError::js("Request", e))?;

	JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| RevealError::Submit(format!("{e:?}")))?;
	Ok(())
}

/// Name, email, and message form with a three-state submit button.
#[component]
pub fn ContactForm(#[prop(into)] endpoint: String) -> impl IntoView {
	let form_ref = NodeRef::<leptos::html::Form>::new();
	let (status, set_status) = signal(SubmitStatus::Normal);

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if status.get_untracked().is_busy() {
			return;
		}
		let Some(form) = form_ref.get_untracked() else {
			return;
		};
		set_status.set(SubmitStatus::Submitting);

		let endpoint = endpoint.clone();
		spawn_local(async move {
			match send(&endpoint, &form).await {
				Ok(()) => info!("estportfolio: contact form sent"),
				Err(e) => warn!("estportfolio: {}", e),
			}
			set_status.set(SubmitStatus::Success);
			set_timeout(
				move || {
					form.reset();
					set_status.set(SubmitStatus::Normal);
				},
				RESET_DELAY,
			);
		});
	};

	view! {
		<form node_ref=form_ref class="contact-form" on:submit=on_submit>
			<input type="text" name="name" placeholder="Name" required />
			<input type="email" name="email" placeholder="Email" required />
			<textarea name="message" rows="5" placeholder="Message" required></textarea>
			<button type="submit" class="btn" disabled=move || status.get().is_busy()>
				{move || status.get().button_label()}
			</button>
		</form>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_follow_the_submit_cycle() {
		assert_eq!(SubmitStatus::default().button_label(), "Initiate Data Transfer");
		assert_eq!(SubmitStatus::Submitting.button_label(), "Transmitting...");
		assert_eq!(SubmitStatus::Success.button_label(), "Data Transmitted");
	}

	#[test]
	fn only_idle_form_accepts_submissions() {
		assert!(!SubmitStatus::Normal.is_busy());
		assert!(SubmitStatus::Submitting.is_busy());
		assert!(SubmitStatus::Success.is_busy());
	}
}
