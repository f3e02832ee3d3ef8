use crate::mode::TimelineMode;
use crate::model::{DerivedEvent, DerivedSeries};
use serde::Serialize;

/// Pixel scale of both coordinate systems
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
	/// Horizontal pixels per second on the time-scaled axis
	pub pixels_per_second: f64,
	/// Width of one event slot on the event-indexed axis
	pub slot_width: f64,
}

impl ScaleConfig {
	pub const fn new(pixels_per_second: f64, slot_width: f64) -> Self {
		Self { pixels_per_second, slot_width }
	}

	#[allow(clippy::cast_precision_loss)]
	pub fn ms_to_px(&self, ms: u64) -> f64 {
		ms as f64 * self.pixels_per_second / 1000.0
	}

	#[allow(clippy::cast_precision_loss)]
	pub fn slot_x(&self, index: usize) -> f64 {
		index as f64 * self.slot_width
	}
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self::new(20.0, 48.0)
	}
}

/// Horizontal box of one event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
	pub x: f64,
	pub width: f64,
}

impl Geometry {
	pub fn of(event: &DerivedEvent, mode: TimelineMode, scale: &ScaleConfig) -> Self {
		match mode {
			TimelineMode::TimeScaled => Self {
				x: scale.ms_to_px(event.cumulative_offset),
				width: scale.ms_to_px(event.duration()),
			},
			TimelineMode::EventIndexed => Self {
				x: scale.slot_x(event.index),
				width: scale.slot_width,
			},
		}
	}

	/// Boxes for every event of a series, in order
	pub fn layout(series: &DerivedSeries, mode: TimelineMode, scale: &ScaleConfig) -> Vec<Self> {
		series.events.iter().map(|event| Self::of(event, mode, scale)).collect()
	}
}

/// Where the live cursor is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CursorProjection {
	/// Highlight one discrete slot
	Slot { series: usize, event: usize },
	/// Vertical line at `x` pixels into the series
	Continuous { series: usize, x: f64 },
}

impl CursorProjection {
	pub const fn series(&self) -> usize {
		match self {
			Self::Slot { series, .. } | Self::Continuous { series, .. } => *series,
		}
	}
}
