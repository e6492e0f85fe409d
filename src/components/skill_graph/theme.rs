//! Theme colours for the skill graph.
//!
//! The graph never caches colours: the tooltip asks the [`ThemeProvider`] on
//! every update so a light/dark toggle applies mid-hover.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Renderer-ready colours for the tooltip and node placeholders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeColors {
	pub background: Color,
	pub foreground: Color,
	pub muted_foreground: Color,
	pub border: Color,
}

impl ThemeColors {
	pub const fn light() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			foreground: Color::rgb(10, 10, 10),
			muted_foreground: Color::rgb(115, 115, 115),
			border: Color::rgb(229, 229, 229),
		}
	}

	pub const fn dark() -> Self {
		Self {
			background: Color::rgb(10, 10, 10),
			foreground: Color::rgb(250, 250, 250),
			muted_foreground: Color::rgb(163, 163, 163),
			border: Color::rgb(38, 38, 38),
		}
	}
}

/// Source of the current theme colours; may change at any time.
pub trait ThemeProvider {
	fn current_colors(&self) -> ThemeColors;
}

/// A provider that always answers with the same colours.
#[derive(Clone, Copy, Debug)]
pub struct StaticTheme(pub ThemeColors);

impl ThemeProvider for StaticTheme {
	fn current_colors(&self) -> ThemeColors {
		self.0
	}
}

/// Reads the page's theme from the `dark` class or `data-theme` attribute on
/// the document element.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl DocumentTheme {
	fn is_dark() -> bool {
		let Some(root) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element())
		else {
			return false;
		};
		let class_dark = root
			.get_attribute("class")
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == "dark"));
		class_dark || root.get_attribute("data-theme").as_deref() == Some("dark")
	}
}

impl ThemeProvider for DocumentTheme {
	fn current_colors(&self) -> ThemeColors {
		if Self::is_dark() {
			ThemeColors::dark()
		} else {
			ThemeColors::light()
		}
	}
}
