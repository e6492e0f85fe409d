//! Input records and small geometry types shared by the layout engine.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::Deserialize;

/// A skill as supplied by the content store.
///
/// Field aliases cover both the CMS naming (`tag_name`, `tag_count`, `tag_url`)
/// and the camelCase naming used by the site's API routes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SkillRecord {
	/// Display name of the skill.
	#[serde(alias = "tag_name")]
	pub name: String,
	/// Number of projects using this skill.
	#[serde(default, alias = "tag_count", alias = "usageCount")]
	pub usage_count: u32,
	/// Opaque icon reference, resolved to an image URL by an [`IconResolver`].
	#[serde(default, alias = "tag_url", alias = "iconRef")]
	pub icon_ref: Option<String>,
}

impl SkillRecord {
	pub fn new(name: impl Into<String>, usage_count: u32) -> Self {
		Self {
			name: name.into(),
			usage_count,
			icon_ref: None,
		}
	}

	pub fn with_icon(mut self, icon_ref: impl Into<String>) -> Self {
		self.icon_ref = Some(icon_ref.into());
		self
	}
}

/// One block of the "about" rich text. The graph never reads it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AboutBlock {
	#[serde(default)]
	pub content: serde_json::Value,
}

/// The `{ about, tags }` shape used by the about section of the site.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AboutWithTags {
	#[serde(default)]
	pub about: Vec<AboutBlock>,
	#[serde(default)]
	pub tags: Vec<SkillRecord>,
}

/// Any payload the graph accepts: a bare record list or the about section.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillData {
	Records(Vec<SkillRecord>),
	About(AboutWithTags),
}

impl SkillData {
	/// Flattens the payload into records, dropping entries without a usable name.
	pub fn into_records(self) -> Vec<SkillRecord> {
		let records = match self {
			SkillData::Records(records) => records,
			SkillData::About(about) => about.tags,
		};
		let total = records.len();
		let valid: Vec<SkillRecord> = records
			.into_iter()
			.filter(|record| !record.name.trim().is_empty())
			.collect();
		if valid.len() < total {
			log::warn!(
				"skill-graph: dropped {} malformed skill record(s)",
				total - valid.len()
			);
		}
		valid
	}
}

/// Resolves a record's opaque icon reference into an image URL.
pub trait IconResolver {
	fn resolve(&self, icon_ref: &str) -> Option<String>;
}

/// Treats the icon reference as a ready-to-use URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectIcons;

impl IconResolver for DirectIcons {
	fn resolve(&self, icon_ref: &str) -> Option<String> {
		let trimmed = icon_ref.trim();
		(!trimmed.is_empty()).then(|| trimmed.to_string())
	}
}

/// A point (or displacement) in container-local pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length_sq(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	pub fn length(self) -> f64 {
		self.length_sq().sqrt()
	}

	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

/// Container dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// True when both sides are finite and strictly positive.
	pub fn is_valid(self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	pub fn area(self) -> f64 {
		self.width * self.height
	}

	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn center_x(&self) -> f64 {
		self.x + self.width / 2.0
	}
}
