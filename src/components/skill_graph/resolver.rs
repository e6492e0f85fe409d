//! Hard constraints applied after every integration step.

use super::nodes::Node;
use super::types::{Point, Size};

/// Clamps `value` into `[radius, extent - radius]`, centring when the node is
/// wider than the extent.
fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
	let (lo, hi) = (radius, extent - radius);
	if hi < lo {
		extent / 2.0
	} else {
		value.clamp(lo, hi)
	}
}

/// Clamps a point so a circle of `radius` around it lies inside `size`.
pub fn clamp_to_bounds(point: Point, radius: f64, size: Size) -> Point {
	Point::new(
		clamp_axis(point.x, radius, size.width),
		clamp_axis(point.y, radius, size.height),
	)
}

/// Keeps every node inside the container and repairs non-finite state.
///
/// Fixed anchors are clamped as well, so a dragged node can never leave the
/// canvas. Returns the number of nodes whose position or velocity had to be
/// reset because it was not finite.
pub fn resolve(nodes: &mut [Node], size: Size) -> usize {
	let mut repaired = 0;
	for node in nodes.iter_mut() {
		if !node.position.is_finite() || !node.velocity.is_finite() {
			node.position = node
				.fixed
				.filter(|anchor| anchor.is_finite())
				.unwrap_or_else(|| size.center());
			node.velocity = Point::ZERO;
			repaired += 1;
		}

		if let Some(anchor) = node.fixed {
			node.fixed = Some(if anchor.is_finite() {
				clamp_to_bounds(anchor, node.radius, size)
			} else {
				node.position
			});
		}

		let clamped = clamp_to_bounds(node.position, node.radius, size);
		if clamped.x != node.position.x {
			node.velocity.x = 0.0;
		}
		if clamped.y != node.position.y {
			node.velocity.y = 0.0;
		}
		node.position = clamped;
	}

	if repaired > 0 {
		log::warn!("skill-graph: reset {repaired} node(s) with non-finite state");
	}
	repaired
}
