// ────────────────────────────────────────────────────────────────
//  skill-graph: engine scenarios
//
//  Strategy:
//    • Everything runs through SkillGraphState with fake viewport,
//      frame scheduler, theme and text measure; no DOM involved.
//    • Time is a plain millisecond counter advanced by ~16 ms per
//      simulated animation frame.
// ────────────────────────────────────────────────────────────────

#![allow(unused_crate_dependencies)]

use std::cell::Cell;

use skill_graph::components::skill_graph::{
	ApproxTextMeasure, FrameLoop, FrameScheduler, GraphConfig, NodeTone, Point, Size,
	SkillGraphState, SkillRecord, StaticTheme, ThemeColors, ViewportObserver,
};

const FRAME_MS: f64 = 16.0;

struct FakeViewport {
	width: f64,
	container: Cell<Option<Size>>,
}

impl FakeViewport {
	fn new(width: f64, container: Option<Size>) -> Self {
		Self {
			width,
			container: Cell::new(container),
		}
	}
}

impl ViewportObserver for FakeViewport {
	fn viewport_width(&self) -> f64 {
		self.width
	}

	fn container_size(&self) -> Option<Size> {
		self.container.get()
	}
}

#[derive(Default)]
struct FakeScheduler {
	next: i32,
	live: Vec<(i32, FrameLoop)>,
	requested: usize,
}

impl FrameScheduler for FakeScheduler {
	fn request_frame(&mut self, which: FrameLoop) -> Option<i32> {
		self.next += 1;
		self.requested += 1;
		self.live.push((self.next, which));
		Some(self.next)
	}

	fn cancel_frame(&mut self, handle: i32) {
		self.live.retain(|(h, _)| *h != handle);
	}
}

struct Harness {
	state: SkillGraphState,
	clock: f64,
}

impl Harness {
	fn new(counts: &[u32], container: Size) -> Self {
		let mut state = SkillGraphState::new(GraphConfig::default());
		state.set_records(
			counts
				.iter()
				.enumerate()
				.map(|(i, &c)| SkillRecord::new(format!("Skill {i}"), c))
				.collect(),
		);
		state.notify_resize(&FakeViewport::new(1280.0, Some(container)), 0.0);
		Self { state, clock: 0.0 }
	}

	fn frame(&mut self) {
		self.clock += FRAME_MS;
		self.state.on_simulation_frame(self.clock);
	}

	fn tooltip_frame(&mut self) {
		let theme = StaticTheme(ThemeColors::light());
		self.state.on_tooltip_frame(&theme, &ApproxTextMeasure);
	}

	/// Runs simulation frames until the loop would stop; returns frames run.
	fn run_until_idle(&mut self, max_frames: usize) -> usize {
		let mut frames = 0;
		while self.state.wants_simulation_frame() && frames < max_frames {
			self.frame();
			frames += 1;
		}
		frames
	}

	fn ids(&self) -> Vec<String> {
		self.state.nodes_in_draw_order().map(|n| n.id.clone()).collect()
	}
}

const SCENARIO: [u32; 12] = [0, 1, 1, 2, 3, 5, 8, 8, 10, 10, 15, 20];

// ═══════════════════════════════════════════════════════════════
// 1. Layout of the reference skill set
// ═══════════════════════════════════════════════════════════════

#[test]
fn reference_set_settles_without_overlap() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);

	let sim = h.state.simulation().expect("seeded");
	assert!(sim.is_settled());
	assert!(sim.ticks() <= 300, "took {} ticks", sim.ticks());

	let nodes = sim.nodes();
	for (i, a) in nodes.iter().enumerate() {
		assert!(a.position.x >= a.radius && a.position.x <= 600.0 - a.radius);
		assert!(a.position.y >= a.radius && a.position.y <= 600.0 - a.radius);
		for b in &nodes[i + 1..] {
			let d = a.position.distance(b.position);
			assert!(d >= a.radius + b.radius - 0.5, "{} / {} overlap: {d}", a.label, b.label);
		}
	}
}

#[test]
fn reference_set_radii() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.frame();
	h.run_until_idle(10);

	let sim = h.state.simulation().expect("seeded");
	let radius_of = |count: u32| {
		sim.nodes()
			.iter()
			.find(|n| n.usage_count == count)
			.map(|n| n.radius)
			.unwrap()
	};
	assert_eq!(radius_of(20), 32.0);
	assert!((radius_of(0) - 12.0).abs() < 0.5);
	assert!((radius_of(1) - 12.0).abs() < 0.5);
}

// ═══════════════════════════════════════════════════════════════
// 2. Hover and tooltip
// ═══════════════════════════════════════════════════════════════

#[test]
fn hover_switch_never_shows_previous_node() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let ids = h.ids();
	let (x, y) = (&ids[0], &ids[1]);
	let y_label = h.state.simulation().unwrap().node(y).unwrap().label.clone();

	let x_label = h.state.simulation().unwrap().node(x).unwrap().label.clone();

	h.state.hover_enter(x);
	h.tooltip_frame();
	assert_eq!(h.state.tooltip_layout().unwrap().content.title, x_label);
	h.state.hover_enter(y);
	assert_eq!(h.state.tooltip().content().unwrap().title, y_label);
	// Nothing drawn before the next tooltip frame may carry the first node's text.
	assert!(h.state.tooltip_layout().is_none_or(|layout| layout.content.title != x_label));

	// Late leave of the first node must not clear the second.
	h.state.hover_leave(x);
	h.tooltip_frame();
	let layout = h.state.tooltip_layout().expect("tooltip shown");
	assert_eq!(layout.content.title, y_label);
	assert_eq!(h.state.tone(y), NodeTone::Focused);
	assert_eq!(h.state.tone(x), NodeTone::Muted);
}

#[test]
fn press_on_drifted_node_retargets_tooltip() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let ids = h.ids();
	let x = h.state.simulation().unwrap().node(&ids[0]).unwrap().clone();
	let y = h.state.simulation().unwrap().node(&ids[1]).unwrap().clone();

	h.state.pointer_move(x.position);
	h.tooltip_frame();
	assert_eq!(h.state.tooltip_layout().unwrap().content.title, x.label);

	// No mousemove in between: the press lands on the other node directly.
	assert!(h.state.pointer_down(y.position));
	assert_eq!(h.state.tooltip().hovered(), Some(y.id.as_str()));
	assert!(h.state.tooltip_layout().is_none_or(|layout| layout.content.title != x.label));

	h.frame();
	h.tooltip_frame();
	assert_eq!(h.state.tooltip_layout().unwrap().content.title, y.label);
}

#[test]
fn tooltip_catches_up_within_thirty_frames() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let top = h.state.nodes_in_draw_order().last().unwrap().clone();

	assert!(h.state.pointer_down(top.position));
	h.tooltip_frame();
	let target = Point::new(520.0, 480.0);
	h.state.pointer_move(target);
	h.frame();

	for _ in 0..30 {
		h.tooltip_frame();
	}
	let layout = h.state.tooltip_layout().unwrap();
	assert!(layout.anchor.distance(target) < 1.0, "{:?}", layout.anchor);
	let rect = layout.rect;
	assert!(rect.x >= 0.0 && rect.right() <= 600.0);
	assert!(rect.y >= 0.0 && rect.bottom() <= 600.0);
}

#[test]
fn tooltip_stops_when_node_disappears() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let id = h.ids()[3].clone();
	h.state.hover_enter(&id);
	assert!(h.state.wants_tooltip_frame());

	h.state.set_records(vec![SkillRecord::new("Rust", 2)]);
	h.tooltip_frame();
	assert!(h.state.tooltip_layout().is_none());
	assert!(!h.state.wants_tooltip_frame());
}

// ═══════════════════════════════════════════════════════════════
// 3. Dragging
// ═══════════════════════════════════════════════════════════════

#[test]
fn drag_follows_pointer_and_releases_after_grace() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let top = h.state.nodes_in_draw_order().last().unwrap().clone();

	assert!(h.state.pointer_down(top.position));
	for step in 0..20 {
		let pointer = Point::new(100.0 + step as f64 * 10.0, 150.0);
		h.state.pointer_move(pointer);
		h.frame();
		assert_eq!(h.state.simulation().unwrap().node(&top.id).unwrap().position, pointer);
	}

	h.state.pointer_move(Point::new(-50.0, 700.0));
	h.frame();
	let clamped = Point::new(top.radius, 600.0 - top.radius);
	assert_eq!(h.state.simulation().unwrap().node(&top.id).unwrap().position, clamped);

	h.state.pointer_up(h.clock);
	h.frame();
	assert_eq!(h.state.simulation().unwrap().node(&top.id).unwrap().position, clamped);
	for _ in 0..8 {
		h.frame();
	}
	assert!(h.state.simulation().unwrap().node(&top.id).unwrap().fixed.is_none());
	assert!(h.run_until_idle(2_000) < 2_000);
}

// ═══════════════════════════════════════════════════════════════
// 4. Resizing
// ═══════════════════════════════════════════════════════════════

#[test]
fn resize_burst_reseeds_once() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	assert!(h.ids()[0].starts_with("skill-1-"));

	let viewport = FakeViewport::new(1280.0, None);
	for width in [640.0, 660.0, 680.0, 700.0] {
		viewport.container.set(Some(Size::new(width, 600.0)));
		h.state.notify_resize(&viewport, h.clock);
		h.clock += 20.0;
	}
	h.run_until_idle(2_000);
	assert!(h.ids()[0].starts_with("skill-2-"));
	assert_eq!(h.state.size(), Size::new(700.0, 600.0));

	// Sub-pixel jitter is not a layout change.
	viewport.container.set(Some(Size::new(700.4, 600.0)));
	h.state.notify_resize(&viewport, h.clock);
	h.run_until_idle(2_000);
	assert!(h.ids()[0].starts_with("skill-2-"));
}

#[test]
fn degenerate_container_never_seeds() {
	let mut state = SkillGraphState::new(GraphConfig::default());
	state.set_records(vec![SkillRecord::new("Rust", 3)]);
	let viewport = FakeViewport::new(1280.0, None);
	state.notify_resize(&viewport, 0.0);
	viewport.container.set(Some(Size::new(0.0, 0.0)));
	state.notify_resize(&viewport, 10.0);
	state.on_simulation_frame(500.0);

	assert!(state.simulation().is_none());
	assert!(!state.wants_simulation_frame());
	assert_eq!(state.size(), Size::new(500.0, 450.0));
}

#[test]
fn mobile_viewport_uses_mobile_profile() {
	let mut state = SkillGraphState::new(GraphConfig::default());
	state.set_records(vec![SkillRecord::new("Rust", 3)]);
	state.notify_resize(&FakeViewport::new(375.0, Some(Size::new(340.0, 200.0))), 0.0);
	state.on_simulation_frame(150.0);
	assert_eq!(state.size(), Size::new(340.0, 400.0));
}

// ═══════════════════════════════════════════════════════════════
// 5. Frame loops and teardown
// ═══════════════════════════════════════════════════════════════

#[test]
fn loops_run_only_while_needed() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	let mut scheduler = FakeScheduler::default();
	h.state.schedule(&mut scheduler);
	assert_eq!(scheduler.live, vec![(1, FrameLoop::Simulation)]);

	while h.state.wants_simulation_frame() {
		scheduler.live.clear();
		h.frame();
		h.state.schedule(&mut scheduler);
	}
	assert!(scheduler.live.is_empty());
	assert!(!h.state.is_frame_pending(FrameLoop::Simulation));

	let id = h.ids()[0].clone();
	h.state.hover_enter(&id);
	h.state.schedule(&mut scheduler);
	assert_eq!(scheduler.live.len(), 1);
	assert_eq!(scheduler.live[0].1, FrameLoop::Tooltip);
}

#[test]
fn unmount_cancels_everything() {
	let mut h = Harness::new(&SCENARIO, Size::new(600.0, 600.0));
	h.run_until_idle(2_000);
	let id = h.ids()[0].clone();
	h.state.hover_enter(&id);
	let position = h.state.simulation().unwrap().node(&id).unwrap().position;
	assert!(h.state.pointer_down(position));

	let mut scheduler = FakeScheduler::default();
	h.state.schedule(&mut scheduler);
	assert_eq!(scheduler.live.len(), 2);

	h.state.unmount(&mut scheduler);
	assert!(scheduler.live.is_empty());
	assert!(h.state.simulation().is_none());

	// Frames that were already in flight do nothing.
	let requested = scheduler.requested;
	h.frame();
	h.tooltip_frame();
	h.state.notify_resize(&FakeViewport::new(1280.0, Some(Size::new(800.0, 800.0))), h.clock);
	h.run_until_idle(10);
	h.state.schedule(&mut scheduler);
	assert!(h.state.simulation().is_none());
	assert!(h.state.tooltip_layout().is_none());
	assert_eq!(scheduler.requested, requested);
}
