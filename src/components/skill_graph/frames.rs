//! Bookkeeping for the two animation-frame loops.
//!
//! The simulation and the tooltip run on independent loops. Each loop has at
//! most one outstanding frame request; the handle is kept so teardown can
//! cancel it.

/// Which loop a frame request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameLoop {
	Simulation,
	Tooltip,
}

/// Host frame clock, `requestAnimationFrame` in the browser.
pub trait FrameScheduler {
	/// Requests one callback for `which`. Returns the request handle, or `None`
	/// when the host refused.
	fn request_frame(&mut self, which: FrameLoop) -> Option<i32>;
	fn cancel_frame(&mut self, handle: i32);
}

/// Outstanding frame request per loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopHandles {
	simulation: Option<i32>,
	tooltip: Option<i32>,
}

impl LoopHandles {
	fn slot(&mut self, which: FrameLoop) -> &mut Option<i32> {
		match which {
			FrameLoop::Simulation => &mut self.simulation,
			FrameLoop::Tooltip => &mut self.tooltip,
		}
	}

	pub fn is_pending(&self, which: FrameLoop) -> bool {
		match which {
			FrameLoop::Simulation => self.simulation.is_some(),
			FrameLoop::Tooltip => self.tooltip.is_some(),
		}
	}

	/// Called when a frame for `which` fired; the handle is spent.
	pub fn frame_fired(&mut self, which: FrameLoop) {
		*self.slot(which) = None;
	}

	/// Requests or cancels frames so each loop has a pending request exactly
	/// when it is wanted.
	pub fn sync(&mut self, scheduler: &mut dyn FrameScheduler, want_simulation: bool, want_tooltip: bool) {
		self.sync_one(scheduler, FrameLoop::Simulation, want_simulation);
		self.sync_one(scheduler, FrameLoop::Tooltip, want_tooltip);
	}

	fn sync_one(&mut self, scheduler: &mut dyn FrameScheduler, which: FrameLoop, wanted: bool) {
		let slot = self.slot(which);
		match (*slot, wanted) {
			(None, true) => {
				*slot = scheduler.request_frame(which);
				if slot.is_none() {
					log::warn!("skill-graph: frame request for {which:?} refused");
				}
			}
			(Some(handle), false) => {
				scheduler.cancel_frame(handle);
				*slot = None;
			}
			_ => {}
		}
	}

	/// Cancels every outstanding request.
	pub fn cancel_all(&mut self, scheduler: &mut dyn FrameScheduler) {
		for which in [FrameLoop::Simulation, FrameLoop::Tooltip] {
			if let Some(handle) = self.slot(which).take() {
				scheduler.cancel_frame(handle);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct CountingScheduler {
		next: i32,
		live: Vec<(i32, FrameLoop)>,
	}

	impl FrameScheduler for CountingScheduler {
		fn request_frame(&mut self, which: FrameLoop) -> Option<i32> {
			self.next += 1;
			self.live.push((self.next, which));
			Some(self.next)
		}

		fn cancel_frame(&mut self, handle: i32) {
			self.live.retain(|(h, _)| *h != handle);
		}
	}

	#[test]
	fn one_request_per_loop() {
		let mut scheduler = CountingScheduler::default();
		let mut handles = LoopHandles::default();
		handles.sync(&mut scheduler, true, true);
		handles.sync(&mut scheduler, true, true);
		assert_eq!(scheduler.live.len(), 2);
		assert!(handles.is_pending(FrameLoop::Simulation));
		assert!(handles.is_pending(FrameLoop::Tooltip));
	}

	#[test]
	fn unwanted_loops_are_cancelled() {
		let mut scheduler = CountingScheduler::default();
		let mut handles = LoopHandles::default();
		handles.sync(&mut scheduler, true, true);
		handles.sync(&mut scheduler, true, false);
		assert_eq!(scheduler.live, vec![(1, FrameLoop::Simulation)]);
	}

	#[test]
	fn fired_frames_are_rerequested() {
		let mut scheduler = CountingScheduler::default();
		let mut handles = LoopHandles::default();
		handles.sync(&mut scheduler, true, false);
		scheduler.live.clear();
		handles.frame_fired(FrameLoop::Simulation);
		handles.sync(&mut scheduler, true, false);
		assert_eq!(scheduler.live, vec![(2, FrameLoop::Simulation)]);
	}

	#[test]
	fn cancel_all_leaves_nothing_pending() {
		let mut scheduler = CountingScheduler::default();
		let mut handles = LoopHandles::default();
		handles.sync(&mut scheduler, true, true);
		handles.cancel_all(&mut scheduler);
		assert!(scheduler.live.is_empty());
		assert_eq!(handles, LoopHandles::default());
	}
}
