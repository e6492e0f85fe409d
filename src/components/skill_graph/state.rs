//! Graph state: the single owned value behind a mounted skill graph.
//!
//! Holds the live simulation together with drag, hover and layout state, and
//! exposes the operations the host calls: data changes, resize notifications,
//! pointer events and the two per-frame callbacks. Created once per mount and
//! mutated by the frame loops and event handlers.

use super::config::GraphConfig;
use super::drag::DragController;
use super::error::GraphError;
use super::frames::{FrameLoop, FrameScheduler, LoopHandles};
use super::layout::{LayoutManager, LayoutSnapshot, ViewportObserver};
use super::nodes::{Node, NodeId, build_nodes};
use super::simulation::SimulationState;
use super::theme::ThemeProvider;
use super::tooltip::{TextMeasure, TooltipLayout, TooltipState};
use super::types::{Point, Size, SkillRecord};

/// How a node is drawn relative to the hover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeTone {
	/// Full colour, full opacity.
	Focused,
	/// Grayscale at reduced opacity.
	Muted,
}

pub struct SkillGraphState {
	config: GraphConfig,
	records: Vec<SkillRecord>,
	layout: LayoutManager,
	simulation: Option<SimulationState>,
	drag: DragController,
	tooltip: TooltipState,
	tooltip_layout: Option<TooltipLayout>,
	draw_order: Vec<NodeId>,
	generation: u64,
	mounted: bool,
	loops: LoopHandles,
}

impl SkillGraphState {
	pub fn new(config: GraphConfig) -> Self {
		Self {
			layout: LayoutManager::new(config.clone()),
			drag: DragController::new(config.drag.clone()),
			config,
			records: Vec::new(),
			simulation: None,
			tooltip: TooltipState::default(),
			tooltip_layout: None,
			draw_order: Vec::new(),
			generation: 0,
			mounted: true,
			loops: LoopHandles::default(),
		}
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn simulation(&self) -> Option<&SimulationState> {
		self.simulation.as_ref()
	}

	pub fn layout(&self) -> &LayoutManager {
		&self.layout
	}

	pub fn drag(&self) -> &DragController {
		&self.drag
	}

	pub fn tooltip(&self) -> &TooltipState {
		&self.tooltip
	}

	/// Tooltip computed by the most recent tooltip frame.
	pub fn tooltip_layout(&self) -> Option<&TooltipLayout> {
		self.tooltip_layout.as_ref()
	}

	pub fn records(&self) -> &[SkillRecord] {
		&self.records
	}

	/// No records to show; the host renders its empty state instead.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn is_mounted(&self) -> bool {
		self.mounted
	}

	/// Size the graph is currently laid out for.
	pub fn size(&self) -> Size {
		self.simulation
			.as_ref()
			.map(SimulationState::size)
			.unwrap_or_else(|| self.layout.current_size())
	}

	/// Replaces the skill list. Reseeds immediately when the container has
	/// already been measured, otherwise on the first valid layout.
	pub fn set_records(&mut self, records: Vec<SkillRecord>) {
		if !self.mounted {
			return;
		}
		self.records = records;
		match self.layout.current() {
			Some(snapshot) => self.reseed(snapshot),
			None => {
				log::debug!("skill-graph: records set before layout, deferring seed");
				self.stop_simulation();
			}
		}
	}

	/// Records a resize notification at `now`; applied by the simulation frame
	/// once the debounce period has passed.
	pub fn notify_resize(&mut self, observer: &dyn ViewportObserver, now: f64) {
		if self.mounted {
			self.layout.observe(observer, now);
		}
	}

	/// Simulation frame: applies pending layout changes, releases finished
	/// drags and advances the physics by one tick.
	pub fn on_simulation_frame(&mut self, now: f64) {
		self.loops.frame_fired(FrameLoop::Simulation);
		if !self.mounted {
			return;
		}

		if let Some(snapshot) = self.layout.poll(now) {
			self.reseed(snapshot);
		}

		let Some(sim) = self.simulation.as_mut() else {
			return;
		};
		self.drag.update(sim, now);
		if !sim.is_settled() || self.drag.is_active() {
			sim.tick();
			if sim.is_settled() && !self.drag.is_active() {
				log::debug!("skill-graph: settled after {} ticks", sim.ticks());
			}
		}
	}

	/// Tooltip frame: follows the hovered node and stores the resulting layout.
	pub fn on_tooltip_frame(&mut self, theme: &dyn ThemeProvider, measure: &dyn TextMeasure) {
		self.loops.frame_fired(FrameLoop::Tooltip);
		if !self.mounted {
			return;
		}
		self.tooltip_layout = match self.simulation.as_ref() {
			Some(sim) => self.tooltip.update(sim, theme, measure, &self.config.tooltip),
			None => {
				self.tooltip.clear();
				None
			}
		};
	}

	/// Topmost node under `point`.
	pub fn node_at(&self, point: Point) -> Option<&Node> {
		let sim = self.simulation.as_ref()?;
		self.draw_order
			.iter()
			.rev()
			.filter_map(|id| sim.node(id))
			.find(|node| node.contains(point))
	}

	pub fn pointer_down(&mut self, point: Point) -> bool {
		if !self.mounted {
			return false;
		}
		let Some(id) = self.node_at(point).map(|node| node.id.clone()) else {
			return false;
		};
		let Some(sim) = self.simulation.as_mut() else {
			return false;
		};
		let started = self.drag.begin(sim, &id);
		if started {
			self.hover_enter(&id);
		}
		started
	}

	/// Moves the dragged node, or updates the hover from a hit test.
	pub fn pointer_move(&mut self, point: Point) {
		if !self.mounted {
			return;
		}
		if self.drag.is_dragging() {
			if let Some(sim) = self.simulation.as_mut() {
				self.drag.move_to(sim, point);
			}
			return;
		}

		let hit = self.node_at(point).map(|node| node.id.clone());
		let hovered = self.tooltip.hovered().map(str::to_string);
		if hit == hovered {
			return;
		}
		if let Some(previous) = hovered {
			self.hover_leave(&previous);
		}
		if let Some(id) = hit {
			self.hover_enter(&id);
		}
	}

	pub fn pointer_up(&mut self, now: f64) {
		if let Some(sim) = self.simulation.as_mut() {
			self.drag.end(sim, now);
		}
	}

	/// Pointer left the container: ends any drag and clears the hover.
	pub fn pointer_leave(&mut self, now: f64) {
		self.pointer_up(now);
		if let Some(id) = self.tooltip.hovered().map(str::to_string) {
			self.hover_leave(&id);
		}
	}

	pub fn hover_enter(&mut self, id: &str) {
		let Some(node) = self.simulation.as_ref().and_then(|sim| sim.node(id)) else {
			return;
		};
		if self.tooltip.hovered() != Some(id) {
			// The stored layout belongs to the previous node until the next tooltip frame.
			self.tooltip_layout = None;
		}
		self.tooltip.hover_enter(node);
		if let Some(index) = self.draw_order.iter().position(|entry| entry == id) {
			let entry = self.draw_order.remove(index);
			self.draw_order.push(entry);
		}
	}

	pub fn hover_leave(&mut self, id: &str) {
		if self.tooltip.hover_leave(id) {
			self.tooltip_layout = None;
		}
	}

	pub fn tone(&self, id: &str) -> NodeTone {
		if self.tooltip.hovered() == Some(id) {
			NodeTone::Focused
		} else {
			NodeTone::Muted
		}
	}

	/// Nodes back to front; the hovered node is drawn last.
	pub fn nodes_in_draw_order(&self) -> impl Iterator<Item = &Node> {
		let sim = self.simulation.as_ref();
		self.draw_order
			.iter()
			.filter_map(move |id| sim.and_then(|sim| sim.node(id)))
	}

	pub fn wants_simulation_frame(&self) -> bool {
		if !self.mounted {
			return false;
		}
		self.layout.has_pending()
			|| self.drag.is_active()
			|| self.simulation.as_ref().is_some_and(|sim| !sim.is_settled())
	}

	pub fn wants_tooltip_frame(&self) -> bool {
		self.mounted && self.tooltip.hovered().is_some()
	}

	/// Brings the pending frame requests in line with what the loops need.
	pub fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) {
		let (want_simulation, want_tooltip) =
			(self.wants_simulation_frame(), self.wants_tooltip_frame());
		self.loops.sync(scheduler, want_simulation, want_tooltip);
	}

	pub fn is_frame_pending(&self, which: FrameLoop) -> bool {
		self.loops.is_pending(which)
	}

	/// Tears the graph down: cancels both loops and drops the simulation. Later
	/// callbacks are no-ops.
	pub fn unmount(&mut self, scheduler: &mut dyn FrameScheduler) {
		self.loops.cancel_all(scheduler);
		self.stop_simulation();
		self.mounted = false;
		log::debug!("skill-graph: unmounted");
	}

	fn stop_simulation(&mut self) {
		self.simulation = None;
		self.drag.reset();
		self.tooltip.clear();
		self.tooltip_layout = None;
		self.draw_order.clear();
	}

	fn reseed(&mut self, snapshot: LayoutSnapshot) {
		self.stop_simulation();
		if self.records.is_empty() {
			return;
		}

		self.generation += 1;
		let nodes = build_nodes(
			&self.records,
			snapshot.size,
			&snapshot.profile,
			self.config.forces.seed_spread,
			self.generation,
		);
		match SimulationState::new(nodes, snapshot.size, self.config.forces.clone()) {
			Ok(sim) => {
				log::info!(
					"skill-graph: seeded {} nodes at {}x{} ({:?})",
					sim.nodes().len(),
					snapshot.size.width,
					snapshot.size.height,
					snapshot.breakpoint
				);
				self.draw_order = sim.nodes().iter().map(|node| node.id.clone()).collect();
				self.simulation = Some(sim);
			}
			Err(GraphError::DegenerateContainer { width, height }) => {
				log::debug!("skill-graph: container {width}x{height} too small, waiting");
			}
			Err(err) => log::warn!("skill-graph: not seeding: {err}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::theme::{StaticTheme, ThemeColors};
	use crate::components::skill_graph::tooltip::ApproxTextMeasure;

	struct FixedViewport(Size, f64);

	impl ViewportObserver for FixedViewport {
		fn viewport_width(&self) -> f64 {
			self.1
		}

		fn container_size(&self) -> Option<Size> {
			Some(self.0)
		}
	}

	fn seeded(counts: &[u32]) -> SkillGraphState {
		let mut state = SkillGraphState::new(GraphConfig::default());
		state.set_records(
			counts
				.iter()
				.enumerate()
				.map(|(i, &c)| SkillRecord::new(format!("skill {i}"), c))
				.collect(),
		);
		state.notify_resize(&FixedViewport(Size::new(600.0, 600.0), 1280.0), 0.0);
		state.on_simulation_frame(200.0);
		state
	}

	#[test]
	fn records_before_layout_wait_for_measurement() {
		let mut state = SkillGraphState::new(GraphConfig::default());
		state.set_records(vec![SkillRecord::new("Rust", 3)]);
		assert!(state.simulation().is_none());
		assert_eq!(state.size(), Size::new(500.0, 450.0));
		state.notify_resize(&FixedViewport(Size::new(600.0, 600.0), 1280.0), 0.0);
		state.on_simulation_frame(50.0);
		assert!(state.simulation().is_none());
		state.on_simulation_frame(120.0);
		assert_eq!(state.simulation().unwrap().nodes().len(), 1);
	}

	#[test]
	fn hovered_node_moves_to_top() {
		let mut state = seeded(&[1, 2, 3]);
		let first = state.nodes_in_draw_order().next().unwrap().id.clone();
		state.hover_enter(&first);
		assert_eq!(state.nodes_in_draw_order().last().unwrap().id, first);
		assert_eq!(state.tone(&first), NodeTone::Focused);
		let other = state.nodes_in_draw_order().next().unwrap().id.clone();
		assert_eq!(state.tone(&other), NodeTone::Muted);
	}

	#[test]
	fn pointer_hit_test_starts_drag() {
		let mut state = seeded(&[1, 2, 3]);
		let node = state.nodes_in_draw_order().last().unwrap().clone();
		assert!(state.pointer_down(node.position));
		assert!(state.drag().is_dragging());
		state.pointer_move(Point::new(100.0, 100.0));
		state.on_simulation_frame(16.0);
		assert_eq!(state.simulation().unwrap().node(&node.id).unwrap().position, Point::new(100.0, 100.0));
		state.pointer_leave(32.0);
		assert!(!state.drag().is_dragging());
		assert!(state.tooltip().hovered().is_none());
	}

	#[test]
	fn pressing_another_node_drops_the_old_tooltip() {
		let mut state = seeded(&[1, 2, 3]);
		let ids: Vec<NodeId> = state.nodes_in_draw_order().map(|node| node.id.clone()).collect();
		let theme = StaticTheme(ThemeColors::light());

		state.hover_enter(&ids[0]);
		state.on_tooltip_frame(&theme, &ApproxTextMeasure);
		assert!(state.tooltip_layout().is_some());

		let other = state.simulation().unwrap().node(&ids[2]).unwrap().clone();
		assert!(state.pointer_down(other.position));
		assert!(state.tooltip_layout().is_none());

		state.on_tooltip_frame(&theme, &ApproxTextMeasure);
		assert_eq!(state.tooltip_layout().unwrap().content.title, other.label);
	}

	#[test]
	fn empty_background_does_not_drag() {
		let mut state = seeded(&[1]);
		assert!(!state.pointer_down(Point::new(1.0, 1.0)));
	}

	#[test]
	fn reseed_drops_hover_of_vanished_node() {
		let mut state = seeded(&[1, 2]);
		let id = state.nodes_in_draw_order().next().unwrap().id.clone();
		state.hover_enter(&id);
		state.set_records(vec![SkillRecord::new("Go", 4)]);
		assert!(state.tooltip().hovered().is_none());
		assert!(state.simulation().unwrap().node(&id).is_none());
	}

	#[test]
	fn empty_records_show_nothing() {
		let mut state = seeded(&[1, 2]);
		state.set_records(Vec::new());
		assert!(state.is_empty());
		assert!(state.simulation().is_none());
		assert!(!state.wants_simulation_frame());
	}
}
