//! Node factory: turns skill records into sized, seeded simulation nodes.

use std::f64::consts::TAU;

use super::config::BreakpointProfile;
use super::types::{Point, Size, SkillRecord};

pub type NodeId = String;

/// A skill's physical and visual representation in the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique within a mount: encodes the seed generation and the record index.
	pub id: NodeId,
	pub position: Point,
	pub(crate) velocity: Point,
	/// Anchor while dragged; the simulation leaves fixed nodes in place.
	pub fixed: Option<Point>,
	pub radius: f64,
	pub label: String,
	pub usage_count: u32,
	pub icon_ref: Option<String>,
}

impl Node {
	pub fn velocity(&self) -> Point {
		self.velocity
	}

	pub fn contains(&self, point: Point) -> bool {
		self.position.distance(point) <= self.radius
	}
}

/// Radius for `count` within a batch whose counts span `min_count..=max_count`.
///
/// An exponential curve makes heavily used skills stand out: the top of the range
/// grows much faster than the bottom.
pub fn radius_for_count(count: u32, min_count: u32, max_count: u32, profile: &BreakpointProfile) -> f64 {
	let range = max_count.saturating_sub(min_count).max(1) as f64;
	let normalized = (count.saturating_sub(min_count) as f64 / range).clamp(0.0, 1.0);
	let emphasis = ((2.0 * normalized).exp() - 1.0) / (2.0_f64.exp() - 1.0);
	let radius = profile.min_radius + emphasis * (profile.max_radius - profile.min_radius);
	radius.clamp(profile.min_radius, profile.min_radius.max(profile.max_radius))
}

/// Deterministic hash in `[0, 1)`.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Builds nodes for `records`, clustered around the container centre.
///
/// Nodes start on a loose ring (evenly spaced angles plus a small per-index
/// offset, radial jitter between 40% and 80% of `spread * min(w, h)`), which
/// keeps them off the corners and mostly apart. Jitter is derived from
/// `generation`, so identical inputs give identical radii and ids only differ
/// between seeds.
pub fn build_nodes(
	records: &[SkillRecord],
	size: Size,
	profile: &BreakpointProfile,
	spread: f64,
	generation: u64,
) -> Vec<Node> {
	if records.is_empty() {
		return Vec::new();
	}

	let min_count = records.iter().map(|r| r.usage_count).min().unwrap_or(0);
	let max_count = records.iter().map(|r| r.usage_count).max().unwrap_or(0);
	let center = size.center();
	let max_distance = size.width.min(size.height).max(0.0) * spread;
	let count = records.len() as f64;

	records
		.iter()
		.enumerate()
		.map(|(i, record)| {
			let seed = generation as f64 * 31.0 + i as f64 + 1.0;
			let angle = (i as f64 / count) * TAU + (pseudo_random(seed * 1.7) - 0.5) * 0.2;
			let distance = max_distance * (0.4 + pseudo_random(seed * 2.3) * 0.4);
			Node {
				id: format!("skill-{generation}-{i}"),
				position: Point::new(
					center.x + angle.cos() * distance,
					center.y + angle.sin() * distance,
				),
				velocity: Point::ZERO,
				fixed: None,
				radius: radius_for_count(record.usage_count, min_count, max_count, profile),
				label: record.name.clone(),
				usage_count: record.usage_count,
				icon_ref: record.icon_ref.clone(),
			}
		})
		.collect()
}
