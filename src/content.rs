//! Page content, read from a JSON block embedded in the host document.
//!
//! Every field is defaulted, so a partial document still renders.

use serde::Deserialize;

use crate::components::magic_text::RevealConfig;

/// Everything the page shows.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortfolioData {
	/// Owner's name, used in the nav bar and hero.
	pub name: String,
	/// One-line hero subtitle.
	pub tagline: String,
	/// Short bio paragraph.
	pub about: String,
	/// The particle reveal shown in the hero; usually an email address.
	pub reveal: RevealConfig,
	/// Skill groups.
	pub skills: Vec<SkillGroup>,
	/// Project cards.
	pub projects: Vec<Project>,
	/// Certification list.
	pub certifications: Vec<Certification>,
	/// Education entries.
	pub education: Vec<Education>,
	/// Contact form settings.
	pub contact: ContactSettings,
}

impl Default for PortfolioData {
	fn default() -> Self {
		Self {
			name: "Portfolio".to_string(),
			tagline: String::new(),
			about: String::new(),
			reveal: RevealConfig::default(),
			skills: Vec::new(),
			projects: Vec::new(),
			certifications: Vec::new(),
			education: Vec::new(),
			contact: ContactSettings::default(),
		}
	}
}

/// A titled list of skills.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillGroup {
	/// Group heading.
	pub title: String,
	/// Skill names.
	pub items: Vec<String>,
}

/// A project card.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Project {
	/// Card title.
	pub title: String,
	/// Card body.
	pub description: String,
	/// Technology tags.
	pub tags: Vec<String>,
	/// Optional link to the source or a demo.
	pub link: Option<String>,
}

/// A certification entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Certification {
	/// Certification name.
	pub title: String,
	/// Issuing body.
	pub issuer: String,
	/// Free-form date, e.g. "2024".
	pub date: String,
	/// Optional credential URL.
	pub link: Option<String>,
}

/// An education entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Education {
	/// Institution name.
	pub school: String,
	/// Degree or programme.
	pub degree: String,
	/// Free-form period, e.g. "2019 - 2023".
	pub period: String,
}

/// Where the contact form posts.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactSettings {
	/// Form-processing endpoint URL.
	pub endpoint: String,
	/// Text above the form.
	pub blurb: String,
}

impl PortfolioData {
	/// Parses the embedded JSON block.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_document_is_filled_with_defaults() {
		let data = PortfolioData::from_json(
			r#"{
				"name": "Ada",
				"reveal": { "text": "ada@example.com", "fontSize": 32, "resetOnMouseLeave": false },
				"projects": [{ "title": "Loom", "tags": ["rust"] }]
			}"#,
		)
		.unwrap();

		assert_eq!(data.name, "Ada");
		assert_eq!(data.reveal.text, "ada@example.com");
		assert_eq!(data.reveal.font_size, 32.0);
		assert!(!data.reveal.reset_on_mouse_leave);
		assert_eq!(data.reveal.density, RevealConfig::default().density);
		assert_eq!(data.projects[0].tags, vec!["rust".to_string()]);
		assert_eq!(data.projects[0].link, None);
		assert!(data.skills.is_empty());
		assert_eq!(data.contact, ContactSettings::default());
	}

	#[test]
	fn empty_object_is_the_default_page() {
		let data = PortfolioData::from_json("{}").unwrap();
		assert_eq!(data.name, PortfolioData::default().name);
		assert_eq!(data.reveal, RevealConfig::default());
	}

	#[test]
	fn malformed_document_is_an_error() {
		assert!(PortfolioData::from_json("{ name: ").is_err());
		assert!(PortfolioData::from_json(r#"{ "skills": 3 }"#).is_err());
	}
}
