//! Force simulation: repulsion, centering and collision with a cooling alpha.
//!
//! Each tick cools `alpha` towards `alpha_target`, accumulates forces into
//! velocities, integrates, then hands the nodes to the resolver. Once alpha is
//! below `alpha_min` the layout is settled and the host may stop ticking.

use std::collections::HashMap;

use super::config::ForceConfig;
use super::error::GraphError;
use super::nodes::Node;
use super::quadtree::{QuadNode, jiggle};
use super::resolver;
use super::types::{Point, Size};

/// Live simulation for one node set and container size.
///
/// Dropping the value stops the simulation; the graph state keeps at most one.
#[derive(Debug)]
pub struct SimulationState {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	alpha: f64,
	alpha_target: f64,
	size: Size,
	config: ForceConfig,
	ticks: u64,
	positions: Vec<Point>,
}

impl SimulationState {
	pub fn new(nodes: Vec<Node>, size: Size, config: ForceConfig) -> Result<Self, GraphError> {
		if !size.is_valid() {
			return Err(GraphError::DegenerateContainer {
				width: size.width,
				height: size.height,
			});
		}
		if nodes.is_empty() {
			return Err(GraphError::EmptyNodeSet);
		}

		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();
		let mut state = Self {
			nodes,
			index,
			alpha: 1.0,
			alpha_target: 0.0,
			size,
			config,
			ticks: 0,
			positions: Vec::new(),
		};
		resolver::resolve(&mut state.nodes, state.size);
		Ok(state)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn size(&self) -> Size {
		self.size
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Alpha has cooled below the threshold and nothing keeps it warm.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Advances the simulation by one step.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_charge();
		self.apply_centering();
		self.apply_collision();
		self.integrate();
		resolver::resolve(&mut self.nodes, self.size);

		self.ticks += 1;
	}

	/// Ticks until settled or `max_ticks` elapse; returns the ticks taken.
	pub fn run_until_settled(&mut self, max_ticks: u64) -> u64 {
		let start = self.ticks;
		while !self.is_settled() && self.ticks - start < max_ticks {
			self.tick();
		}
		self.ticks - start
	}

	fn snapshot_positions(&mut self, predicted: bool) {
		self.positions.clear();
		self.positions.extend(self.nodes.iter().map(|node| {
			if predicted {
				node.position + node.velocity
			} else {
				node.position
			}
		}));
	}

	fn apply_charge(&mut self) {
		let strength = -self.config.charge_scale * self.size.area().sqrt() * self.alpha;
		if strength == 0.0 || self.nodes.len() < 2 {
			return;
		}

		self.snapshot_positions(false);
		let Some(tree) = QuadNode::build(&self.positions) else {
			return;
		};
		let theta = self.config.barnes_hut_theta;
		for (index, node) in self.nodes.iter_mut().enumerate() {
			if node.fixed.is_none() {
				node.velocity += tree.charge_on(index, &self.positions, strength, theta);
			}
		}
	}

	fn apply_centering(&mut self) {
		let mut count = 0.0;
		let mut centroid = Point::ZERO;
		for node in self.nodes.iter().filter(|node| node.position.is_finite()) {
			centroid += node.position;
			count += 1.0;
		}
		if count == 0.0 {
			return;
		}
		let shift = (self.size.center() - centroid * (1.0 / count)) * self.config.center_strength;
		for node in self.nodes.iter_mut().filter(|node| node.fixed.is_none()) {
			node.position += shift;
		}
	}

	fn apply_collision(&mut self) {
		if self.nodes.len() < 2 {
			return;
		}

		let padding = self.config.collision_padding;
		let strength = self.config.collision_strength;
		let max_radius = self
			.nodes
			.iter()
			.map(|node| node.radius)
			.fold(0.0_f64, f64::max);

		self.snapshot_positions(true);
		let Some(tree) = QuadNode::build(&self.positions) else {
			return;
		};

		let positions = &self.positions;
		let nodes = &mut self.nodes;
		tree.for_each_pair_within(2.0 * (max_radius + padding), &mut |i, j| {
			let (ri, rj) = (nodes[i].radius + padding, nodes[j].radius + padding);
			let reach = ri + rj;
			let mut delta = positions[i] - positions[j];
			let mut distance_sq = delta.length_sq();
			if distance_sq >= reach * reach {
				return;
			}
			if distance_sq < 1e-12 {
				delta = jiggle(i, j) * 1e-3;
				distance_sq = delta.length_sq();
			}

			let distance = distance_sq.sqrt();
			let push = delta * ((reach - distance) / distance * strength);
			let (fixed_i, fixed_j) = (nodes[i].fixed.is_some(), nodes[j].fixed.is_some());
			let weight = match (fixed_i, fixed_j) {
				(true, true) => return,
				(true, false) => 0.0,
				(false, true) => 1.0,
				(false, false) => (rj * rj) / (ri * ri + rj * rj),
			};
			nodes[i].velocity += push * weight;
			nodes[j].velocity -= push * (1.0 - weight);
		});
	}

	fn integrate(&mut self) {
		let retain = 1.0 - self.config.velocity_decay;
		let max_speed = self.config.max_speed;
		for node in &mut self.nodes {
			if let Some(anchor) = node.fixed {
				node.position = anchor;
				node.velocity = Point::ZERO;
				continue;
			}

			node.velocity = node.velocity * retain;
			let speed = node.velocity.length();
			if speed > max_speed {
				node.velocity = node.velocity * (max_speed / speed);
			}
			node.position += node.velocity;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::config::BreakpointConfig;
	use crate::components::skill_graph::nodes::build_nodes;
	use crate::components::skill_graph::types::SkillRecord;

	fn simulation(counts: &[u32], size: Size) -> SimulationState {
		let records: Vec<_> = counts
			.iter()
			.enumerate()
			.map(|(i, &c)| SkillRecord::new(format!("s{i}"), c))
			.collect();
		let nodes = build_nodes(&records, size, &BreakpointConfig::default().desktop, 0.15, 1);
		SimulationState::new(nodes, size, ForceConfig::default()).unwrap()
	}

	fn assert_contained(sim: &SimulationState) {
		let size = sim.size();
		for node in sim.nodes() {
			let (x, y, r) = (node.position.x, node.position.y, node.radius);
			assert!(x >= r - 1e-9 && x <= size.width - r + 1e-9, "x={x} r={r}");
			assert!(y >= r - 1e-9 && y <= size.height - r + 1e-9, "y={y} r={r}");
		}
	}

	#[test]
	fn rejects_degenerate_container() {
		let err = SimulationState::new(Vec::new(), Size::new(0.0, 300.0), ForceConfig::default())
			.unwrap_err();
		assert!(matches!(err, GraphError::DegenerateContainer { .. }));
	}

	#[test]
	fn rejects_empty_node_set() {
		let err = SimulationState::new(Vec::new(), Size::new(300.0, 300.0), ForceConfig::default())
			.unwrap_err();
		assert!(matches!(err, GraphError::EmptyNodeSet));
	}

	#[test]
	fn alpha_decays_geometrically() {
		let mut sim = simulation(&[1, 2, 3], Size::new(400.0, 400.0));
		sim.tick();
		assert!((sim.alpha() - 0.978).abs() < 1e-12);
		sim.tick();
		assert!((sim.alpha() - 0.978 * 0.978).abs() < 1e-12);
	}

	#[test]
	fn stays_inside_container_every_tick() {
		let mut sim = simulation(&[0, 3, 6, 9, 12, 15, 18, 21, 24, 27], Size::new(220.0, 180.0));
		for _ in 0..400 {
			sim.tick();
			assert_contained(&sim);
		}
	}

	#[test]
	fn settles_without_overlap() {
		let mut sim = simulation(&[0, 1, 1, 2, 3, 5, 8, 8, 10, 10, 15, 20], Size::new(600.0, 600.0));
		let ticks = sim.run_until_settled(1_000);
		assert!(sim.is_settled(), "not settled after {ticks} ticks");
		let nodes = sim.nodes();
		for i in 0..nodes.len() {
			for j in i + 1..nodes.len() {
				let d = nodes[i].position.distance(nodes[j].position);
				assert!(d >= nodes[i].radius + nodes[j].radius - 0.5, "{i}/{j} overlap: {d}");
			}
		}
	}

	#[test]
	fn cluster_centres_itself() {
		let size = Size::new(600.0, 400.0);
		let mut sim = simulation(&[1, 2, 3, 4, 5], size);
		sim.run_until_settled(1_000);
		let count = sim.nodes().len() as f64;
		let mut centroid = Point::ZERO;
		for node in sim.nodes() {
			centroid += node.position;
		}
		assert!((centroid * (1.0 / count)).distance(size.center()) < 1.0);
	}

	#[test]
	fn fixed_node_is_not_moved() {
		let mut sim = simulation(&[1, 2, 3, 4], Size::new(400.0, 400.0));
		let id = sim.nodes()[0].id.clone();
		let anchor = Point::new(120.0, 130.0);
		sim.node_mut(&id).unwrap().fixed = Some(anchor);
		for _ in 0..50 {
			sim.tick();
			assert_eq!(sim.node(&id).unwrap().position, anchor);
		}
	}

	#[test]
	fn one_broken_position_does_not_shift_the_rest() {
		let mut sim = simulation(&[1, 2, 3, 4], Size::new(400.0, 400.0));
		let broken = sim.nodes()[0].id.clone();
		sim.node_mut(&broken).unwrap().position = Point::new(f64::NAN, 10.0);
		let before: Vec<Point> = sim.nodes()[1..].iter().map(|node| node.position).collect();

		sim.apply_centering();
		for (node, old) in sim.nodes()[1..].iter().zip(before) {
			assert!(node.position.is_finite());
			assert!(node.position.distance(old) < 400.0);
		}

		sim.tick();
		assert!(sim.nodes().iter().all(|node| node.position.is_finite()));
		let spread = sim.nodes()[1..]
			.iter()
			.map(|node| node.position.distance(sim.size().center()))
			.fold(0.0_f64, f64::max);
		assert!(spread > 1.0, "layout collapsed to the centre");
	}

	#[test]
	fn stays_warm_while_target_is_raised() {
		let mut sim = simulation(&[1, 2], Size::new(400.0, 400.0));
		sim.set_alpha_target(0.3);
		for _ in 0..1_000 {
			sim.tick();
		}
		assert!(!sim.is_settled());
		assert!((sim.alpha() - 0.3).abs() < 1e-3);
	}

	#[test]
	fn many_nodes_remain_stable() {
		let counts: Vec<u32> = (0..150).map(|i| i % 17).collect();
		let mut sim = simulation(&counts, Size::new(1200.0, 900.0));
		sim.run_until_settled(1_000);
		assert_contained(&sim);
		assert!(sim.nodes().iter().all(|n| n.position.is_finite()));
	}
}
