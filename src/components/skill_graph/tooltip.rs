//! Hover tooltip that follows its node smoothly and stays inside the container.
//!
//! The tooltip has its own per-frame update, separate from the physics tick:
//! text measurement and placement never force a simulation step, and the
//! simulation never waits on the tooltip.

use super::config::TooltipConfig;
use super::nodes::{Node, NodeId};
use super::simulation::SimulationState;
use super::theme::{ThemeColors, ThemeProvider};
use super::types::{Point, Rect, Size};

/// Measures rendered text width in pixels.
pub trait TextMeasure {
	fn text_width(&self, text: &str, font_px: f64, bold: bool) -> f64;
}

/// Character-count estimate for hosts without a text renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
	fn text_width(&self, text: &str, font_px: f64, bold: bool) -> f64 {
		let per_char = if bold { 0.6 } else { 0.55 };
		text.chars().count() as f64 * font_px * per_char
	}
}

/// Text shown for the hovered node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	pub node: NodeId,
	pub title: String,
	/// Only present when the skill is used by at least one project.
	pub count_line: Option<String>,
}

impl TooltipContent {
	pub fn for_node(node: &Node) -> Self {
		let count_line = match node.usage_count {
			0 => None,
			1 => Some("1 project".to_string()),
			n => Some(format!("{n} projects")),
		};
		Self {
			node: node.id.clone(),
			title: node.label.clone(),
			count_line,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
	Above,
	Below,
}

/// Everything the renderer needs to draw the tooltip for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipLayout {
	pub content: TooltipContent,
	/// Smoothed anchor the box is placed around.
	pub anchor: Point,
	/// Box in container coordinates, always fully inside the container.
	pub rect: Rect,
	pub placement: Placement,
	/// Baseline of the title, centred horizontally in `rect`.
	pub title_at: Point,
	pub count_at: Option<Point>,
	pub colors: ThemeColors,
}

/// Places a `box_size` tooltip around `anchor` for a node of `radius`.
///
/// Default placement is centred above the node. A box that would cross the
/// safe margin is shifted sideways or flipped below, and is finally clamped so
/// no part of it leaves the container.
pub fn place_tooltip(
	anchor: Point,
	radius: f64,
	box_size: Size,
	container: Size,
	config: &TooltipConfig,
) -> (Rect, Placement) {
	let (w, h) = (box_size.width, box_size.height);
	let margin = config.safe_margin;

	let mut x = anchor.x - w / 2.0;
	if x < margin {
		x = margin;
	} else if x + w > container.width - margin {
		x = container.width - margin - w;
	}

	let above = anchor.y - radius - config.gap - h;
	let below = anchor.y + radius + config.gap;
	let (mut y, placement) = if above >= margin {
		(above, Placement::Above)
	} else if below + h <= container.height - margin {
		(below, Placement::Below)
	} else if anchor.y > container.height / 2.0 {
		(above, Placement::Above)
	} else {
		(below, Placement::Below)
	};

	x = x.clamp(0.0, (container.width - w).max(0.0));
	y = y.clamp(0.0, (container.height - h).max(0.0));
	(
		Rect {
			x,
			y,
			width: w,
			height: h,
		},
		placement,
	)
}

/// Hover state plus the smoothed tooltip position.
///
/// Persists for the lifetime of the graph; only the hovered id comes and goes.
#[derive(Clone, Debug, Default)]
pub struct TooltipState {
	hovered: Option<NodeId>,
	smoothed: Point,
	content: Option<TooltipContent>,
}

impl TooltipState {
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn smoothed_position(&self) -> Point {
		self.smoothed
	}

	/// Text for the hovered node; replaced at hover time, not on the next frame.
	pub fn content(&self) -> Option<&TooltipContent> {
		self.content.as_ref()
	}

	/// Re-targets the tooltip on `node`, starting from its current position.
	pub fn hover_enter(&mut self, node: &Node) {
		self.hovered = Some(node.id.clone());
		self.content = Some(TooltipContent::for_node(node));
		self.smoothed = node.position;
	}

	/// Clears the hover if `node_id` is the hovered node. Returns whether it was.
	pub fn hover_leave(&mut self, node_id: &str) -> bool {
		if self.hovered.as_deref() != Some(node_id) {
			return false;
		}
		self.clear();
		true
	}

	pub fn clear(&mut self) {
		self.hovered = None;
		self.content = None;
	}

	/// One follow step. Returns `None` (and clears the hover) when nothing is
	/// hovered or the hovered node no longer exists.
	pub fn update(
		&mut self,
		sim: &SimulationState,
		theme: &dyn ThemeProvider,
		measure: &dyn TextMeasure,
		config: &TooltipConfig,
	) -> Option<TooltipLayout> {
		let id = self.hovered.as_deref()?;
		let Some(node) = sim.node(id) else {
			self.clear();
			return None;
		};

		let target = node.position;
		if self.smoothed.is_finite() {
			self.smoothed += (target - self.smoothed) * config.smoothing;
		} else {
			self.smoothed = target;
		}

		let content = self
			.content
			.get_or_insert_with(|| TooltipContent::for_node(node))
			.clone();
		let title_width = measure.text_width(&content.title, config.title_font_px, true);
		let count_width = content
			.count_line
			.as_deref()
			.map_or(0.0, |line| measure.text_width(line, config.count_font_px, false));
		let height = if content.count_line.is_some() {
			config.height_with_count
		} else {
			config.height_title_only
		};
		let box_size = Size::new(title_width.max(count_width) + 2.0 * config.padding_x, height);

		let (rect, placement) = place_tooltip(self.smoothed, node.radius, box_size, sim.size(), config);
		let (title_at, count_at) = if content.count_line.is_some() {
			(
				Point::new(rect.center_x(), rect.y + 18.0),
				Some(Point::new(rect.center_x(), rect.y + 32.0)),
			)
		} else {
			(Point::new(rect.center_x(), rect.y + rect.height / 2.0 + 6.0), None)
		};

		Some(TooltipLayout {
			content,
			anchor: self.smoothed,
			rect,
			placement,
			title_at,
			count_at,
			colors: theme.current_colors(),
		})
	}
}
