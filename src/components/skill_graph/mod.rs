//! Force-directed skill graph.
//!
//! Renders skills as icon nodes on an HTML canvas with:
//! - Node sizes that emphasise heavily used skills
//! - A cooling force simulation (repulsion, centering, collision) kept inside
//!   the container
//! - Single-node dragging with a short release grace period
//! - A hover tooltip that follows its node and avoids the container edges
//! - Debounced, breakpoint-aware resizing
//!
//! The layout engine (everything except `component` and `render`) has no DOM
//! dependency and is driven through [`SkillGraphState`].
//!
//! # Example
//!
//! ```ignore
//! use skill_graph::{SkillGraphCanvas, SkillRecord};
//!
//! let skills = vec![
//!     SkillRecord::new("Rust", 12).with_icon("/icons/rust.svg"),
//!     SkillRecord::new("TypeScript", 8),
//! ];
//!
//! view! { <SkillGraphCanvas data=Signal::stored(skills) /> }
//! ```

mod component;
pub mod config;
pub mod drag;
pub mod error;
pub mod frames;
pub mod layout;
pub mod nodes;
mod quadtree;
mod render;
pub mod resolver;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod tooltip;
pub mod types;

pub use component::SkillGraphCanvas;
pub use config::{BreakpointConfig, BreakpointProfile, DragConfig, ForceConfig, GraphConfig, TooltipConfig};
pub use error::GraphError;
pub use frames::{FrameLoop, FrameScheduler};
pub use layout::{Breakpoint, LayoutManager, ViewportObserver};
pub use nodes::{Node, NodeId};
pub use simulation::SimulationState;
pub use state::{NodeTone, SkillGraphState};
pub use theme::{Color, DocumentTheme, StaticTheme, ThemeColors, ThemeProvider};
pub use tooltip::{ApproxTextMeasure, Placement, TextMeasure, TooltipLayout};
pub use types::{DirectIcons, IconResolver, Point, Rect, Size, SkillData, SkillRecord};
