//! Canvas rendering for the skill graph.
//!
//! Draws in two passes for correct z-ordering:
//! 1. Nodes back to front (the hovered node last, so it sits on top)
//! 2. The tooltip, above every node
//!
//! Nothing here mutates graph state; the simulation has already clamped the
//! positions by the time a frame is drawn.

use std::collections::HashMap;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::nodes::Node;
use super::state::{NodeTone, SkillGraphState};
use super::theme::ThemeColors;
use super::tooltip::{ApproxTextMeasure, TextMeasure, TooltipLayout};
use super::types::IconResolver;

/// Icon edge length relative to the node radius.
const ICON_SCALE: f64 = 1.6;
const ICON_CORNER: f64 = 6.0;
const MUTED_ALPHA: f64 = 0.5;

fn font(font_px: f64, bold: bool) -> String {
	let weight = if bold { 600 } else { 400 };
	format!("{weight} {font_px}px system-ui, sans-serif")
}

/// Loaded icon images keyed by URL.
///
/// Images load asynchronously; until one has decoded (or when it failed) the
/// node is drawn as a placeholder tile.
pub struct IconCache {
	images: HashMap<String, HtmlImageElement>,
	on_settle: Option<js_sys::Function>,
}

impl IconCache {
	/// `on_settle` is invoked by the browser whenever an image finishes loading
	/// or fails, so the host can redraw a graph that is no longer animating.
	pub fn new(on_settle: Option<js_sys::Function>) -> Self {
		Self {
			images: HashMap::new(),
			on_settle,
		}
	}

	fn image(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			let img = match HtmlImageElement::new() {
				Ok(img) => img,
				Err(err) => {
					log::warn!("skill-graph: cannot create image for {url}: {err:?}");
					return None;
				}
			};
			img.set_onload(self.on_settle.as_ref());
			img.set_onerror(self.on_settle.as_ref());
			img.set_src(url);
			self.images.insert(url.to_string(), img);
		}
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}

	/// Unhooks the load callbacks so late image events do nothing.
	pub fn detach(&mut self) {
		for img in self.images.values() {
			img.set_onload(None);
			img.set_onerror(None);
		}
		self.on_settle = None;
	}
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &SkillGraphState,
	ctx: &CanvasRenderingContext2d,
	icons: &mut IconCache,
	resolver: &dyn IconResolver,
	colors: &ThemeColors,
) {
	let size = state.size();
	ctx.clear_rect(0.0, 0.0, size.width, size.height);

	for node in state.nodes_in_draw_order() {
		draw_node(ctx, node, state.tone(&node.id), icons, resolver, colors);
	}

	if let Some(layout) = state.tooltip_layout() {
		draw_tooltip(ctx, layout, state);
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	tone: NodeTone,
	icons: &mut IconCache,
	resolver: &dyn IconResolver,
	colors: &ThemeColors,
) {
	let (x, y) = (node.position.x, node.position.y);
	let side = node.radius * ICON_SCALE;
	let (left, top) = (x - side / 2.0, y - side / 2.0);

	ctx.save();
	match tone {
		NodeTone::Focused => ctx.set_global_alpha(1.0),
		NodeTone::Muted => {
			ctx.set_global_alpha(MUTED_ALPHA);
			ctx.set_filter("grayscale(100%)");
		}
	}

	let image = node
		.icon_ref
		.as_deref()
		.and_then(|icon| resolver.resolve(icon))
		.and_then(|url| icons.image(&url).cloned());

	rounded_rect(ctx, left, top, side, side, ICON_CORNER);
	match image {
		Some(img) => {
			ctx.clip();
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(&img, left, top, side, side);
		}
		None => draw_placeholder(ctx, node, tone, side, colors),
	}
	ctx.restore();
}

/// Tile with the skill's initial, used for missing or broken icons.
fn draw_placeholder(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	tone: NodeTone,
	side: f64,
	colors: &ThemeColors,
) {
	let fill = colors.background.lerp(colors.border, 0.5);
	let text = match tone {
		NodeTone::Focused => colors.foreground,
		NodeTone::Muted => colors.muted_foreground,
	};
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&colors.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke();

	let initial: String = node
		.label
		.chars()
		.next()
		.map(|c| c.to_uppercase().collect())
		.unwrap_or_default();
	ctx.set_fill_style_str(&text.to_css());
	ctx.set_font(&font((side * 0.5).round(), true));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&initial, node.position.x, node.position.y);
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, layout: &TooltipLayout, state: &SkillGraphState) {
	let config = &state.config().tooltip;
	let colors = &layout.colors;
	let rect = layout.rect;

	ctx.save();
	rounded_rect(ctx, rect.x, rect.y, rect.width, rect.height, config.corner_radius);
	ctx.set_shadow_color(&colors.foreground.with_alpha(0.12).to_css());
	ctx.set_shadow_blur(8.0);
	ctx.set_fill_style_str(&colors.background.to_css());
	ctx.fill();
	ctx.set_shadow_color("rgba(0, 0, 0, 0)");
	ctx.set_stroke_style_str(&colors.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(&colors.foreground.to_css());
	ctx.set_font(&font(config.title_font_px, true));
	let _ = ctx.fill_text(&layout.content.title, layout.title_at.x, layout.title_at.y);

	if let (Some(line), Some(at)) = (&layout.content.count_line, layout.count_at) {
		ctx.set_fill_style_str(&colors.muted_foreground.to_css());
		ctx.set_font(&font(config.count_font_px, false));
		let _ = ctx.fill_text(line, at.x, at.y);
	}
	ctx.restore();
}

/// Measures text with the canvas' own font metrics.
pub struct CanvasTextMeasure {
	ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasure {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl TextMeasure for CanvasTextMeasure {
	fn text_width(&self, text: &str, font_px: f64, bold: bool) -> f64 {
		self.ctx.save();
		self.ctx.set_font(&font(font_px, bold));
		let width = self.ctx.measure_text(text).map(|metrics| metrics.width());
		self.ctx.restore();
		width.unwrap_or_else(|_| ApproxTextMeasure.text_width(text, font_px, bold))
	}
}
