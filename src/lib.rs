//! skill-graph: interactive force-directed graph of skills for the portfolio site.
//!
//! This crate provides a WASM-based canvas component that lays skills out with a
//! small physics simulation, sizes them by usage, and shows a tooltip on hover.
//! The layout engine itself is plain Rust and runs anywhere.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::skill_graph::{
	GraphConfig, GraphError, LayoutManager, SimulationState, SkillData, SkillGraphCanvas,
	SkillGraphState, SkillRecord,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("skill-graph: logging initialized");
}

/// Parses a skill payload: either a list of records or the `{ about, tags }`
/// section shape. Records without a name are dropped.
pub fn parse_skill_data(json: &str) -> Result<Vec<SkillRecord>, GraphError> {
	let data: SkillData = serde_json::from_str(json)?;
	Ok(data.into_records())
}

/// Parses graph settings; missing fields keep their defaults.
pub fn parse_config(json: &str) -> Result<GraphConfig, GraphError> {
	serde_json::from_str(json).map_err(GraphError::InvalidConfig)
}

/// Text of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load skills from a script element with id="skill-data".
fn load_skill_data() -> Vec<SkillRecord> {
	let Some(json_text) = script_text("skill-data") else {
		return Vec::new();
	};

	match parse_skill_data(&json_text) {
		Ok(records) => {
			info!("skill-graph: loaded {} skills", records.len());
			records
		}
		Err(e) => {
			warn!("skill-graph: failed to parse skill data: {}", e);
			Vec::new()
		}
	}
}

/// Load optional overrides from a script element with id="skill-graph-config".
fn load_config() -> GraphConfig {
	let Some(json_text) = script_text("skill-graph-config") else {
		return GraphConfig::default();
	};

	parse_config(&json_text).unwrap_or_else(|e| {
		warn!("skill-graph: ignoring invalid config: {}", e);
		GraphConfig::default()
	})
}

/// Main application component.
/// Loads skills from the DOM and renders the graph section.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let skills = load_skill_data();
	let config = load_config();
	let skills_signal = Signal::derive(move || skills.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Skills" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section class="skills-section">
			<h2>"Skills"</h2>
			<p class="subtitle">"Sized by the number of projects using each. Drag to rearrange."</p>
			<SkillGraphCanvas data=skills_signal config=config />
		</section>
	}
}
