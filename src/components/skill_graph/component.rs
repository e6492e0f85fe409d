//! Leptos component wrapping the skill graph canvas.
//!
//! The component creates a container and a canvas, wires mouse handlers for
//! hover and dragging, and drives two `requestAnimationFrame` loops (physics
//! and tooltip) through the graph state. Container and window resizes feed the
//! debounced layout manager. Everything is torn down on unmount.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver};

use super::config::GraphConfig;
use super::frames::{FrameLoop, FrameScheduler};
use super::layout::ViewportObserver;
use super::render::{self, CanvasTextMeasure, IconCache};
use super::state::SkillGraphState;
use super::theme::{DocumentTheme, ThemeProvider};
use super::types::{DirectIcons, Point, Size, SkillRecord};

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

fn now() -> f64 {
	js_sys::Date::now()
}

/// `requestAnimationFrame` with one long-lived callback per loop.
struct WebScheduler {
	simulation: Closure<dyn FnMut()>,
	tooltip: Closure<dyn FnMut()>,
}

impl FrameScheduler for WebScheduler {
	fn request_frame(&mut self, which: FrameLoop) -> Option<i32> {
		let callback = match which {
			FrameLoop::Simulation => &self.simulation,
			FrameLoop::Tooltip => &self.tooltip,
		};
		web_sys::window()?
			.request_animation_frame(callback.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&mut self, handle: i32) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

/// Container geometry read from the DOM.
struct DomViewport {
	container: HtmlElement,
}

impl ViewportObserver for DomViewport {
	fn viewport_width(&self) -> f64 {
		web_sys::window()
			.and_then(|window| window.inner_width().ok())
			.and_then(|width| width.as_f64())
			.unwrap_or(0.0)
	}

	fn container_size(&self) -> Option<Size> {
		let rect = self.container.get_bounding_client_rect();
		Some(Size::new(rect.width(), rect.height()))
	}
}

/// Bundles the graph state with the browser resources that drive it.
struct GraphContext {
	state: SkillGraphState,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	measure: CanvasTextMeasure,
	icons: IconCache,
	scheduler: WebScheduler,
	viewport: DomViewport,
	resize_observer: Option<ResizeObserver>,
	on_resize: Closure<dyn FnMut()>,
	_on_icon: Closure<dyn FnMut()>,
}

impl GraphContext {
	fn draw(&mut self) {
		let size = self.state.size();
		let (width, height) = (size.width.round() as u32, size.height.round() as u32);
		if self.canvas.width() != width || self.canvas.height() != height {
			self.canvas.set_width(width);
			self.canvas.set_height(height);
		}
		let colors = DocumentTheme.current_colors();
		render::render(&self.state, &self.ctx, &mut self.icons, &DirectIcons, &colors);
	}

	fn schedule(&mut self) {
		self.state.schedule(&mut self.scheduler);
	}

	fn resized(&mut self) {
		self.state.notify_resize(&self.viewport, now());
		self.schedule();
	}

	fn update_cursor(&self, point: Point) {
		let cursor = if self.state.drag().is_dragging() {
			"grabbing"
		} else if self.state.node_at(point).is_some() {
			"grab"
		} else {
			"default"
		};
		self.set_cursor(cursor);
	}

	fn set_cursor(&self, cursor: &str) {
		// Inherent `style()`; leptos' `ElementExt::style` shadows it otherwise.
		let _ = HtmlElement::style(&self.canvas).set_property("cursor", cursor);
	}

	fn pointer(&self, ev: &MouseEvent) -> Point {
		let rect = self.canvas.get_bounding_client_rect();
		Point::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	}

	fn teardown(mut self) {
		self.state.unmount(&mut self.scheduler);
		if let Some(observer) = self.resize_observer.take() {
			observer.disconnect();
		}
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		}
		self.icons.detach();
	}
}

/// Runs `f` on the mounted context. Does nothing before mount, after teardown,
/// or when called re-entrantly.
fn with_context(context: &SharedContext, f: impl FnOnce(&mut GraphContext)) {
	if let Ok(mut guard) = context.try_borrow_mut() {
		if let Some(c) = guard.as_mut() {
			f(c);
		}
	}
}

/// Renders the interactive skill graph.
///
/// Pass the skills via the reactive `data` signal. The graph sizes itself to
/// its container (at least the breakpoint's minimum height) and shows a short
/// message instead of a canvas when there is nothing to display.
#[component]
pub fn SkillGraphCanvas(
	#[prop(into)] data: Signal<Vec<SkillRecord>>,
	#[prop(optional)] config: Option<GraphConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let min_height = config.breakpoints.mobile.min_height;
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));

	let context_init = context.clone();
	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let container: HtmlElement = container.into();
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::warn!("skill-graph: 2d canvas context unavailable");
			return;
		};

		let context_sim = context_init.clone();
		let simulation = Closure::<dyn FnMut()>::new(move || {
			with_context(&context_sim, |c| {
				c.state.on_simulation_frame(now());
				c.draw();
				c.schedule();
			});
		});
		let context_tooltip = context_init.clone();
		let tooltip = Closure::<dyn FnMut()>::new(move || {
			with_context(&context_tooltip, |c| {
				c.state.on_tooltip_frame(&DocumentTheme, &c.measure);
				c.draw();
				c.schedule();
			});
		});
		let context_resize = context_init.clone();
		let on_resize = Closure::<dyn FnMut()>::new(move || with_context(&context_resize, GraphContext::resized));
		let context_icon = context_init.clone();
		let on_icon = Closure::<dyn FnMut()>::new(move || with_context(&context_icon, GraphContext::draw));

		let resize_observer = match ResizeObserver::new(on_resize.as_ref().unchecked_ref()) {
			Ok(observer) => {
				observer.observe(&container);
				Some(observer)
			}
			Err(err) => {
				log::warn!("skill-graph: ResizeObserver unavailable: {err:?}");
				None
			}
		};
		if let Some(window) = web_sys::window() {
			let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
		}

		let mut state = SkillGraphState::new(config.clone());
		state.set_records(data.get_untracked());
		let mut graph = GraphContext {
			state,
			measure: CanvasTextMeasure::new(ctx.clone()),
			icons: IconCache::new(Some(on_icon.as_ref().unchecked_ref::<js_sys::Function>().clone())),
			canvas,
			ctx,
			scheduler: WebScheduler {
				simulation,
				tooltip,
			},
			viewport: DomViewport { container },
			resize_observer,
			on_resize,
			_on_icon: on_icon,
		};
		graph.resized();
		*context_init.borrow_mut() = Some(graph);
		log::debug!("skill-graph: mounted");
	});

	let context_data = context.clone();
	Effect::new(move |_| {
		let records = data.get();
		with_context(&context_data, |c| {
			c.state.set_records(records);
			c.draw();
			c.schedule();
		});
	});

	let teardown = StoredValue::new_local(context.clone());
	on_cleanup(move || {
		let _ = teardown.try_with_value(|context| {
			let graph = context.try_borrow_mut().ok().and_then(|mut guard| guard.take());
			if let Some(graph) = graph {
				graph.teardown();
			}
		});
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		with_context(&context_md, |c| {
			let point = c.pointer(&ev);
			if c.state.pointer_down(point) {
				ev.prevent_default();
			}
			c.update_cursor(point);
			c.schedule();
		});
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		with_context(&context_mm, |c| {
			let point = c.pointer(&ev);
			c.state.pointer_move(point);
			c.update_cursor(point);
			if !c.state.wants_simulation_frame() {
				c.draw();
			}
			c.schedule();
		});
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		with_context(&context_mu, |c| {
			let point = c.pointer(&ev);
			c.state.pointer_up(now());
			c.update_cursor(point);
			c.schedule();
		});
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_context(&context_ml, |c| {
			c.state.pointer_leave(now());
			c.set_cursor("default");
			c.draw();
			c.schedule();
		});
	};

	let is_empty = move || data.with(Vec::is_empty);

	view! {
		<div
			node_ref=container_ref
			class="skill-graph"
			style=format!("position: relative; width: 100%; min-height: {min_height}px;")
		>
			<canvas
				node_ref=canvas_ref
				class="skill-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style:display=move || if is_empty() { "none" } else { "block" }
			/>
			<Show when=is_empty>
				<div class="skill-graph-empty">
					<p>"No skills to display"</p>
				</div>
			</Show>
		</div>
	}
}
