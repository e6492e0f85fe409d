//! Tunable parameters for the skill graph.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host page can
//! override a single value without restating the rest. Force constants are
//! visual defaults, not contracts.

use serde::Deserialize;

use super::types::Size;

/// Physics parameters of the force simulation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Repulsion strength is `-charge_scale * sqrt(container area)`.
	pub charge_scale: f64,
	/// Fraction of the centroid offset removed each tick, in `[0, 1]`.
	pub center_strength: f64,
	/// Extra spacing added to every node's collision radius.
	pub collision_padding: f64,
	/// How much of an overlap is corrected per tick, in `[0, 1]`.
	pub collision_strength: f64,
	/// Per-tick approach of alpha towards its target.
	pub alpha_decay: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Alpha target while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Barnes-Hut opening angle; larger is faster and coarser.
	pub barnes_hut_theta: f64,
	/// Speed cap in pixels per tick.
	pub max_speed: f64,
	/// Initial ring radius as a fraction of the smaller container side.
	pub seed_spread: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			charge_scale: 0.008,
			center_strength: 0.7,
			collision_padding: 4.0,
			collision_strength: 0.8,
			alpha_decay: 0.022,
			velocity_decay: 0.4,
			alpha_min: 0.01,
			drag_alpha_target: 0.3,
			barnes_hut_theta: 0.9,
			max_speed: 40.0,
			seed_spread: 0.15,
		}
	}
}

/// Size constants for one viewport bucket.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct BreakpointProfile {
	/// Viewport widths strictly below this use the profile.
	pub max_width: f64,
	pub min_radius: f64,
	pub max_radius: f64,
	/// The container is never laid out shorter than this.
	pub min_height: f64,
}

/// Mobile, tablet and desktop profiles.
///
/// Each profile field can be overridden on its own; omitted fields keep the
/// default for that breakpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "BreakpointOverrides")]
pub struct BreakpointConfig {
	pub mobile: BreakpointProfile,
	pub tablet: BreakpointProfile,
	pub desktop: BreakpointProfile,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ProfileOverride {
	max_width: Option<f64>,
	min_radius: Option<f64>,
	max_radius: Option<f64>,
	min_height: Option<f64>,
}

impl ProfileOverride {
	fn apply(self, base: BreakpointProfile) -> BreakpointProfile {
		BreakpointProfile {
			max_width: self.max_width.unwrap_or(base.max_width),
			min_radius: self.min_radius.unwrap_or(base.min_radius),
			max_radius: self.max_radius.unwrap_or(base.max_radius),
			min_height: self.min_height.unwrap_or(base.min_height),
		}
	}
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct BreakpointOverrides {
	mobile: ProfileOverride,
	tablet: ProfileOverride,
	desktop: ProfileOverride,
}

impl From<BreakpointOverrides> for BreakpointConfig {
	fn from(overrides: BreakpointOverrides) -> Self {
		let base = Self::default();
		Self {
			mobile: overrides.mobile.apply(base.mobile),
			tablet: overrides.tablet.apply(base.tablet),
			desktop: overrides.desktop.apply(base.desktop),
		}
	}
}

impl Default for BreakpointConfig {
	fn default() -> Self {
		Self {
			mobile: BreakpointProfile {
				max_width: 768.0,
				min_radius: 12.0,
				max_radius: 32.0,
				min_height: 400.0,
			},
			tablet: BreakpointProfile {
				max_width: 1024.0,
				min_radius: 12.0,
				max_radius: 32.0,
				min_height: 500.0,
			},
			desktop: BreakpointProfile {
				max_width: f64::INFINITY,
				min_radius: 12.0,
				max_radius: 32.0,
				min_height: 600.0,
			},
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DragConfig {
	/// How long a released node stays anchored before it is freed.
	pub release_grace_ms: f64,
}

impl Default for DragConfig {
	fn default() -> Self {
		Self {
			release_grace_ms: 100.0,
		}
	}
}

/// Tooltip geometry and follow behaviour.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
	/// Exponential smoothing factor per frame.
	pub smoothing: f64,
	/// Distance from the container edges the tooltip tries to keep.
	pub safe_margin: f64,
	/// Gap between the node's edge and the tooltip box.
	pub gap: f64,
	pub padding_x: f64,
	pub title_font_px: f64,
	pub count_font_px: f64,
	pub height_with_count: f64,
	pub height_title_only: f64,
	pub corner_radius: f64,
}

impl Default for TooltipConfig {
	fn default() -> Self {
		Self {
			smoothing: 0.2,
			safe_margin: 80.0,
			gap: 12.0,
			padding_x: 12.0,
			title_font_px: 14.0,
			count_font_px: 12.0,
			height_with_count: 44.0,
			height_title_only: 32.0,
			corner_radius: 8.0,
		}
	}
}

/// Complete configuration for one graph instance.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub forces: ForceConfig,
	pub breakpoints: BreakpointConfig,
	pub drag: DragConfig,
	pub tooltip: TooltipConfig,
	/// Quiet period before a burst of resize notifications is acted on.
	pub resize_debounce_ms: f64,
	/// Size changes at or below this many pixels are ignored.
	pub resize_threshold: f64,
	/// Reported size before the container has been measured.
	pub fallback_size: Size,
	/// The container is never laid out narrower than this.
	pub min_width: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			forces: ForceConfig::default(),
			breakpoints: BreakpointConfig::default(),
			drag: DragConfig::default(),
			tooltip: TooltipConfig::default(),
			resize_debounce_ms: 100.0,
			resize_threshold: 1.0,
			fallback_size: Size::new(500.0, 450.0),
			min_width: 300.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r#"{ "forces": { "charge_scale": 0.02 }, "resize_debounce_ms": 50 }"#)
				.unwrap();
		assert_eq!(config.forces.charge_scale, 0.02);
		assert_eq!(config.forces.collision_padding, 4.0);
		assert_eq!(config.resize_debounce_ms, 50.0);
		assert_eq!(config.breakpoints.desktop.max_radius, 32.0);
		assert_eq!(config.tooltip.smoothing, 0.2);
	}

	#[test]
	fn single_profile_field_override() {
		let config: GraphConfig =
			serde_json::from_str(r#"{ "breakpoints": { "mobile": { "max_radius": 24 } } }"#).unwrap();
		let defaults = BreakpointConfig::default();
		assert_eq!(config.breakpoints.mobile.max_radius, 24.0);
		assert_eq!(config.breakpoints.mobile.min_radius, defaults.mobile.min_radius);
		assert_eq!(config.breakpoints.mobile.max_width, defaults.mobile.max_width);
		assert_eq!(config.breakpoints.mobile.min_height, defaults.mobile.min_height);
		assert_eq!(config.breakpoints.tablet, defaults.tablet);
		assert_eq!(config.breakpoints.desktop, defaults.desktop);
	}
}
