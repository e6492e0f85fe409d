//! Responsive sizing: breakpoints, effective container size and debounced
//! resize handling.

use super::config::{BreakpointProfile, GraphConfig};
use super::types::Size;

/// Named viewport-width bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Breakpoint {
	Mobile,
	Tablet,
	Desktop,
}

/// Host-side size queries. Implemented over the DOM by the canvas component
/// and by fakes in tests.
pub trait ViewportObserver {
	/// Width of the browser viewport in CSS pixels.
	fn viewport_width(&self) -> f64;
	/// Laid-out size of the graph container, `None` before layout.
	fn container_size(&self) -> Option<Size>;
}

/// A layout the graph should be seeded for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSnapshot {
	pub size: Size,
	pub breakpoint: Breakpoint,
	pub profile: BreakpointProfile,
}

#[derive(Clone, Copy, Debug)]
struct PendingResize {
	size: Size,
	viewport_width: f64,
	deadline: f64,
}

/// Turns a stream of resize notifications into occasional layout changes.
#[derive(Clone, Debug)]
pub struct LayoutManager {
	config: GraphConfig,
	pending: Option<PendingResize>,
	current: Option<LayoutSnapshot>,
}

impl LayoutManager {
	pub fn new(config: GraphConfig) -> Self {
		Self {
			config,
			pending: None,
			current: None,
		}
	}

	pub fn breakpoint_for(&self, viewport_width: f64) -> Breakpoint {
		let breakpoints = &self.config.breakpoints;
		if viewport_width < breakpoints.mobile.max_width {
			Breakpoint::Mobile
		} else if viewport_width < breakpoints.tablet.max_width {
			Breakpoint::Tablet
		} else {
			Breakpoint::Desktop
		}
	}

	pub fn profile(&self, breakpoint: Breakpoint) -> BreakpointProfile {
		let breakpoints = &self.config.breakpoints;
		match breakpoint {
			Breakpoint::Mobile => breakpoints.mobile,
			Breakpoint::Tablet => breakpoints.tablet,
			Breakpoint::Desktop => breakpoints.desktop,
		}
	}

	/// Size the graph is laid out at: the measured container, widened to the
	/// minimum width and heightened to the breakpoint's minimum height.
	pub fn effective_size(&self, measured: Size, breakpoint: Breakpoint) -> Size {
		Size::new(
			measured.width.max(self.config.min_width),
			measured.height.max(self.profile(breakpoint).min_height),
		)
	}

	/// Last applied layout size, or the fallback before the first measurement.
	pub fn current_size(&self) -> Size {
		self.current
			.map(|snapshot| snapshot.size)
			.unwrap_or(self.config.fallback_size)
	}

	pub fn current(&self) -> Option<LayoutSnapshot> {
		self.current
	}

	pub fn has_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Records a resize notification at `now` (milliseconds). Unmeasured or
	/// degenerate containers are ignored; the next valid notification counts.
	pub fn notify(&mut self, container: Option<Size>, viewport_width: f64, now: f64) {
		let Some(size) = container.filter(|size| size.is_valid()) else {
			log::debug!("skill-graph: container not laid out yet, waiting");
			return;
		};
		self.pending = Some(PendingResize {
			size,
			viewport_width,
			deadline: now + self.config.resize_debounce_ms,
		});
	}

	/// Reads the host through `observer` and records the result.
	pub fn observe(&mut self, observer: &dyn ViewportObserver, now: f64) {
		self.notify(observer.container_size(), observer.viewport_width(), now);
	}

	/// Applies the pending notification once its quiet period is over. Returns a
	/// snapshot only when it differs meaningfully from the current layout.
	pub fn poll(&mut self, now: f64) -> Option<LayoutSnapshot> {
		let pending = self.pending?;
		if now < pending.deadline {
			return None;
		}
		self.pending = None;

		let breakpoint = self.breakpoint_for(pending.viewport_width);
		let snapshot = LayoutSnapshot {
			size: self.effective_size(pending.size, breakpoint),
			breakpoint,
			profile: self.profile(breakpoint),
		};
		if let Some(current) = self.current {
			let threshold = self.config.resize_threshold;
			let same_size = (current.size.width - snapshot.size.width).abs() <= threshold
				&& (current.size.height - snapshot.size.height).abs() <= threshold;
			if same_size && current.breakpoint == snapshot.breakpoint {
				return None;
			}
		}

		self.current = Some(snapshot);
		Some(snapshot)
	}
}
