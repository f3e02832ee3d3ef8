use range_events::{EventDefinition, SeriesDefinition, TargetCommand};
use serde::Serialize;
use std::fmt;

/// Glyph a renderer draws for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolClass {
	#[serde(rename = "show+audio")]
	ShowAudio,
	#[serde(rename = "hide+audio")]
	HideAudio,
	#[serde(rename = "show")]
	Show,
	#[serde(rename = "hide")]
	Hide,
	#[serde(rename = "audio")]
	Audio,
	#[serde(rename = "none")]
	None,
}

impl SymbolClass {
	/// Classify an event; target command and audio combine, command wins over audio alone
	pub fn classify(event: &EventDefinition) -> Self {
		match (event.command, event.has_audio()) {
			(TargetCommand::Show, true) => Self::ShowAudio,
			(TargetCommand::Hide, true) => Self::HideAudio,
			(TargetCommand::Show, false) => Self::Show,
			(TargetCommand::Hide, false) => Self::Hide,
			(TargetCommand::None, true) => Self::Audio,
			(TargetCommand::None, false) => Self::None,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ShowAudio => "show+audio",
			Self::HideAudio => "hide+audio",
			Self::Show => "show",
			Self::Hide => "hide",
			Self::Audio => "audio",
			Self::None => "none",
		}
	}
}

impl fmt::Display for SymbolClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An event definition placed on its series' time axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedEvent {
	pub index: usize,
	#[serde(flatten)]
	pub event: EventDefinition,
	/// Sum of the durations of every earlier event in the series
	pub cumulative_offset: u64,
	pub symbol: SymbolClass,
}

impl DerivedEvent {
	pub const fn duration(&self) -> u64 {
		self.event.duration
	}

	pub const fn end_offset(&self) -> u64 {
		self.cumulative_offset.saturating_add(self.event.duration)
	}

	/// Whether `elapsed_ms` into the series falls inside this event
	pub const fn contains(&self, elapsed_ms: u64) -> bool {
		self.cumulative_offset <= elapsed_ms && elapsed_ms < self.end_offset()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSeries {
	pub name: String,
	pub optional: bool,
	pub events: Vec<DerivedEvent>,
	pub total_duration: u64,
}

impl DerivedSeries {
	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn event(&self, index: usize) -> Option<&DerivedEvent> {
		self.events.get(index)
	}

	/// Event running `elapsed_ms` into the series, the last one once time runs past the end
	pub fn event_at(&self, elapsed_ms: u64) -> Option<&DerivedEvent> {
		self.events.iter().find(|event| event.contains(elapsed_ms)).or_else(|| self.events.last())
	}
}

/// Derive offsets and symbols for every series.
///
/// Pure: the same input always yields a structurally identical output, and
/// nothing is cached between calls.
pub fn preprocess(series: &[SeriesDefinition]) -> Vec<DerivedSeries> {
	series.iter().map(derive_series).collect()
}

fn derive_series(series: &SeriesDefinition) -> DerivedSeries {
	let mut offset = 0u64;
	let events = series
		.events
		.iter()
		.enumerate()
		.map(|(index, event)| {
			let derived = DerivedEvent {
				index,
				event: event.clone(),
				cumulative_offset: offset,
				symbol: SymbolClass::classify(event),
			};
			offset = offset.saturating_add(event.duration);
			derived
		})
		.collect();

	DerivedSeries {
		name: series.name.clone(),
		optional: series.optional,
		events,
		total_duration: offset,
	}
}
