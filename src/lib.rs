//! estportfolio: single-page portfolio with a glyph-particle text reveal.
//!
//! This crate builds a client-side rendered WASM page whose hero shows a
//! string as a cloud of particles that coalesce into the legible text on hover.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod content;
pub mod error;

pub use components::contact::ContactForm;
pub use components::magic_text::{MagicTextReveal, RevealConfig, RevealWidget};
pub use content::PortfolioData;
pub use error::RevealError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("estportfolio: logging initialized");
}

/// Load page content from a script element with id="portfolio-data".
fn load_portfolio_data() -> Option<PortfolioData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("portfolio-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match PortfolioData::from_json(&json_text) {
		Ok(data) => {
			info!(
				"estportfolio: loaded {} projects, {} certifications",
				data.projects.len(),
				data.certifications.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("estportfolio: failed to parse portfolio data: {}", e);
			None
		}
	}
}

fn link_or_text(title: String, link: Option<String>) -> AnyView {
	match link {
		Some(href) => view! { <a href=href target="_blank" rel="noopener">{title}</a> }.into_any(),
		None => view! { <span>{title}</span> }.into_any(),
	}
}

/// Main application component.
/// Loads page content from the DOM and renders every section.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = load_portfolio_data().unwrap_or_default();
	let PortfolioData {
		name,
		tagline,
		about,
		reveal,
		skills,
		projects,
		certifications,
		education,
		contact,
	} = data;

	let skills = skills
		.into_iter()
		.map(|group| {
			view! {
				<div class="skill-group">
					<h3>{group.title}</h3>
					<ul>{group.items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
				</div>
			}
		})
		.collect_view();

	let projects = projects
		.into_iter()
		.map(|project| {
			view! {
				<article class="project-card">
					<h3>{link_or_text(project.title, project.link)}</h3>
					<p>{project.description}</p>
					<div class="tags">
						{project.tags.into_iter().map(|tag| view! { <span class="tag">{tag}</span> }).collect_view()}
					</div>
				</article>
			}
		})
		.collect_view();

	let certifications = certifications
		.into_iter()
		.map(|cert| {
			view! {
				<li class="certification">
					{link_or_text(cert.title, cert.link)}
					<span class="issuer">{cert.issuer}</span>
					<span class="date">{cert.date}</span>
				</li>
			}
		})
		.collect_view();

	let education = education
		.into_iter()
		.map(|entry| {
			view! {
				<div class="education-entry">
					<h3>{entry.school}</h3>
					<p>{entry.degree}</p>
					<span class="period">{entry.period}</span>
				</div>
			}
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text=name.clone() />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<nav class="navbar">
			<a class="brand" href="#home">{name.clone()}</a>
			<a href="#skills">"Skills"</a>
			<a href="#projects">"Projects"</a>
			<a href="#certifications">"Certifications"</a>
			<a href="#education">"Education"</a>
			<a href="#contact">"Contact"</a>
		</nav>

		<main>
			<section id="home" class="hero">
				<h1>{name.clone()}</h1>
				<p class="subtitle">{tagline}</p>
				<p class="about">{about}</p>
				<MagicTextReveal config=reveal />
			</section>
			<section id="skills">
				<h2>"Skills"</h2>
				<div class="skills-grid">{skills}</div>
			</section>
			<section id="projects">
				<h2>"Projects"</h2>
				<div class="projects-grid">{projects}</div>
			</section>
			<section id="certifications">
				<h2>"Certifications"</h2>
				<ul class="certifications">{certifications}</ul>
			</section>
			<section id="education">
				<h2>"Education"</h2>
				{education}
			</section>
			<section id="contact">
				<h2>"Contact"</h2>
				<p>{contact.blurb}</p>
				<ContactForm endpoint=contact.endpoint />
			</section>
		</main>

		<footer class="footer">
			<p>{name}</p>
		</footer>
	}
}
