//! Pointer-driven dragging of a single node.

use super::config::DragConfig;
use super::nodes::NodeId;
use super::resolver::clamp_to_bounds;
use super::simulation::SimulationState;
use super::types::Point;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragPhase {
	#[default]
	Free,
	Dragging {
		node: NodeId,
	},
	/// Released, but still anchored until `release_at`.
	Releasing {
		node: NodeId,
		release_at: f64,
	},
}

/// Single-pointer drag state machine.
///
/// While dragging, the node's anchor follows the pointer and the simulation is
/// kept warm so neighbours react. On release the anchor is held for a short
/// grace period, then the node is freed where it stands.
#[derive(Clone, Debug, Default)]
pub struct DragController {
	phase: DragPhase,
	config: DragConfig,
}

impl DragController {
	pub fn new(config: DragConfig) -> Self {
		Self {
			phase: DragPhase::Free,
			config,
		}
	}

	pub fn phase(&self) -> &DragPhase {
		&self.phase
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.phase, DragPhase::Dragging { .. })
	}

	/// Dragging, or waiting out the release grace period.
	pub fn is_active(&self) -> bool {
		!matches!(self.phase, DragPhase::Free)
	}

	pub fn dragged_node(&self) -> Option<&str> {
		match &self.phase {
			DragPhase::Dragging { node } => Some(node),
			_ => None,
		}
	}

	/// Starts dragging `node_id`. Refused while another drag is in progress or
	/// when the node does not exist.
	pub fn begin(&mut self, sim: &mut SimulationState, node_id: &str) -> bool {
		if self.is_dragging() || sim.node(node_id).is_none() {
			return false;
		}
		self.release_pending(sim);

		let target = sim.config().drag_alpha_target;
		let Some(node) = sim.node_mut(node_id) else {
			return false;
		};
		node.fixed = Some(node.position);
		sim.set_alpha_target(target);
		self.phase = DragPhase::Dragging {
			node: node_id.to_string(),
		};
		log::debug!("skill-graph: drag start {node_id}");
		true
	}

	/// Moves the dragged node to `pointer` (container-local), clamped to the
	/// container. Returns the applied position.
	pub fn move_to(&mut self, sim: &mut SimulationState, pointer: Point) -> Option<Point> {
		let DragPhase::Dragging { node } = &self.phase else {
			return None;
		};
		if !pointer.is_finite() {
			return None;
		}
		let size = sim.size();
		let node = sim.node_mut(node)?;
		let target = clamp_to_bounds(pointer, node.radius, size);
		node.fixed = Some(target);
		node.position = target;
		Some(target)
	}

	/// Ends the drag at time `now` (milliseconds). The node stays anchored until
	/// the grace period has passed.
	pub fn end(&mut self, sim: &mut SimulationState, now: f64) {
		let DragPhase::Dragging { node } = std::mem::take(&mut self.phase) else {
			return;
		};
		sim.set_alpha_target(0.0);
		self.phase = DragPhase::Releasing {
			node,
			release_at: now + self.config.release_grace_ms,
		};
	}

	/// Frees a released node once its grace period is over.
	pub fn update(&mut self, sim: &mut SimulationState, now: f64) {
		if let DragPhase::Releasing { release_at, .. } = self.phase {
			if now >= release_at {
				self.release_pending(sim);
			}
		}
	}

	/// Forgets any drag without touching a simulation, used when it is replaced.
	pub fn reset(&mut self) {
		self.phase = DragPhase::Free;
	}

	fn release_pending(&mut self, sim: &mut SimulationState) {
		if let DragPhase::Releasing { node, .. } = std::mem::take(&mut self.phase) {
			if let Some(node) = sim.node_mut(&node) {
				node.fixed = None;
			}
		}
	}
}
