//! Quadtree over node positions.
//!
//! Serves two queries per tick: approximate many-body repulsion (Barnes-Hut)
//! and discovery of node pairs close enough to collide.

use std::f64::consts::TAU;

use super::types::Point;

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;
/// Squared distances below this are treated as `MIN_DISTANCE_SQ`.
const MIN_DISTANCE_SQ: f64 = 1.0;

#[derive(Clone, Copy, Debug)]
struct Bounds {
	center: Point,
	half_extent: f64,
}

impl Bounds {
	fn from_points(points: &[Point]) -> Option<Self> {
		let mut min = Point::new(f64::INFINITY, f64::INFINITY);
		let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
		for point in points {
			min.x = min.x.min(point.x);
			min.y = min.y.min(point.y);
			max.x = max.x.max(point.x);
			max.y = max.y.max(point.y);
		}

		if !min.is_finite() || !max.is_finite() {
			return None;
		}

		let span = (max.x - min.x).max(max.y - min.y).max(1.0);
		Some(Self {
			center: Point::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5),
			half_extent: span * 0.5 + 1.0,
		})
	}

	fn contains(self, point: Point) -> bool {
		(point.x - self.center.x).abs() <= self.half_extent
			&& (point.y - self.center.y).abs() <= self.half_extent
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let offset = match quadrant {
			0 => Point::new(-quarter, -quarter),
			1 => Point::new(quarter, -quarter),
			2 => Point::new(-quarter, quarter),
			_ => Point::new(quarter, quarter),
		};
		Self {
			center: self.center + offset,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, point: Point) -> usize {
		match (point.x >= self.center.x, point.y >= self.center.y) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}

	fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	/// Squared gap between two boxes, zero when they overlap.
	fn distance_sq_to(self, other: Self) -> f64 {
		let reach = self.half_extent + other.half_extent;
		let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
		let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
		dx * dx + dy * dy
	}
}

pub(super) struct QuadNode {
	bounds: Bounds,
	center_of_mass: Point,
	mass: f64,
	indices: Vec<usize>,
	children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	/// Builds a tree over `positions`; `None` when empty or non-finite.
	pub(super) fn build(positions: &[Point]) -> Option<Self> {
		let bounds = Bounds::from_points(positions)?;
		let indices = (0..positions.len()).collect();
		Some(Self::build_node(bounds, indices, positions, 0))
	}

	fn build_node(bounds: Bounds, indices: Vec<usize>, positions: &[Point], depth: usize) -> Self {
		let mut center_of_mass = Point::ZERO;
		for &index in &indices {
			center_of_mass += positions[index];
		}
		let mass = indices.len() as f64;
		if mass > 0.0 {
			center_of_mass = center_of_mass * (1.0 / mass);
		}

		let mut node = Self {
			bounds,
			center_of_mass,
			mass,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &index in &node.indices {
			buckets[bounds.quadrant_for(positions[index])].push(index);
		}
		if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	/// Velocity change on `index` from every other point, each carrying `strength`
	/// (negative repels). Distant cells are collapsed to their centre of mass when
	/// `cell side / distance < theta`.
	pub(super) fn charge_on(&self, index: usize, positions: &[Point], strength: f64, theta: f64) -> Point {
		let mut force = Point::ZERO;
		self.accumulate_charge(index, positions, strength, theta, &mut force);
		force
	}

	fn accumulate_charge(&self, index: usize, positions: &[Point], strength: f64, theta: f64, force: &mut Point) {
		if self.mass <= 0.0 {
			return;
		}
		let point = positions[index];

		if self.is_leaf() {
			for &other in &self.indices {
				if other != index {
					*force += pair_charge(point, positions[other], strength, index, other);
				}
			}
			return;
		}

		let delta = self.center_of_mass - point;
		let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
		if !self.bounds.contains(point) && self.bounds.side_length() < theta * distance_sq.sqrt() {
			*force += delta * (strength * self.mass / distance_sq);
			return;
		}

		for child in self.children.iter().flatten() {
			child.accumulate_charge(index, positions, strength, theta, force);
		}
	}

	/// Calls `visit(i, j)` once for every unordered pair whose cells lie within
	/// `max_distance` of each other. Pairs further apart may be skipped.
	pub(super) fn for_each_pair_within(&self, max_distance: f64, visit: &mut impl FnMut(usize, usize)) {
		Self::pairs(self, self, true, max_distance * max_distance, visit);
	}

	fn pairs(a: &QuadNode, b: &QuadNode, same: bool, max_sq: f64, visit: &mut impl FnMut(usize, usize)) {
		if a.bounds.distance_sq_to(b.bounds) > max_sq {
			return;
		}

		if a.is_leaf() && b.is_leaf() {
			if same {
				for (k, &from) in a.indices.iter().enumerate() {
					for &to in &a.indices[k + 1..] {
						visit(from, to);
					}
				}
			} else {
				for &from in &a.indices {
					for &to in &b.indices {
						visit(from, to);
					}
				}
			}
			return;
		}

		if same {
			for first in 0..4 {
				let Some(child_a) = a.children[first].as_deref() else {
					continue;
				};
				Self::pairs(child_a, child_a, true, max_sq, visit);
				for second in first + 1..4 {
					if let Some(child_b) = a.children[second].as_deref() {
						Self::pairs(child_a, child_b, false, max_sq, visit);
					}
				}
			}
			return;
		}

		let split_a = if a.is_leaf() {
			false
		} else if b.is_leaf() {
			true
		} else {
			a.bounds.half_extent >= b.bounds.half_extent
		};

		if split_a {
			for child in a.children.iter().flatten() {
				Self::pairs(child, b, false, max_sq, visit);
			}
		} else {
			for child in b.children.iter().flatten() {
				Self::pairs(a, child, false, max_sq, visit);
			}
		}
	}
}

/// Direction used when two points coincide, stable for a given pair.
pub(super) fn jiggle(i: usize, j: usize) -> Point {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * TAU;
	Point::new(angle.cos(), angle.sin())
}

fn pair_charge(point: Point, other: Point, strength: f64, index: usize, other_index: usize) -> Point {
	let mut delta = other - point;
	if delta.length_sq() < 1e-12 {
		delta = jiggle(index, other_index) * 1e-3;
	}
	let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
	delta * (strength / distance_sq)
}
