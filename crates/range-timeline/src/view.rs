use crate::cursor::{CursorProjection, Geometry, ScaleConfig};
use crate::error::{Result, TimelineError};
use crate::mode::{ModeSelection, TimelineMode};
use crate::model::{preprocess, DerivedSeries};
use range_events::ProgramDefinition;
use tracing::{debug, info};

/// The loaded program's derived timeline plus the live cursor on it.
///
/// Holds the raw run position (series, event) and the latest elapsed time;
/// the projection is computed on demand so switching mode re-projects the
/// same position instead of losing it.
#[derive(Debug, Clone, Default)]
pub struct TimelineView {
	program: Option<ProgramDefinition>,
	series: Vec<DerivedSeries>,
	selection: ModeSelection,
	mode: Option<TimelineMode>,
	scale: ScaleConfig,
	position: Option<(usize, usize)>,
	elapsed: Option<(usize, u64)>,
}

impl TimelineView {
	pub fn new(scale: ScaleConfig) -> Self {
		Self { scale, ..Self::default() }
	}

	pub fn with_selection(mut self, selection: ModeSelection) -> Self {
		self.selection = selection;
		self
	}

	/// Derive the timeline of `program`, replacing whatever was loaded
	pub fn load(&mut self, program: ProgramDefinition) -> TimelineMode {
		let mode = self.selection.resolve(&program);
		self.series = preprocess(&program.series);
		info!(program_id = program.id, title = %program.title, %mode, series = self.series.len(), "loaded timeline");

		self.program = Some(program);
		self.mode = Some(mode);
		self.position = None;
		self.elapsed = None;
		mode
	}

	/// Forget the program and the cursor
	pub fn unload(&mut self) {
		self.program = None;
		self.series.clear();
		self.mode = None;
		self.clear();
	}

	pub const fn program(&self) -> Option<&ProgramDefinition> {
		self.program.as_ref()
	}

	pub fn series(&self) -> &[DerivedSeries] {
		&self.series
	}

	pub const fn mode(&self) -> Option<TimelineMode> {
		self.mode
	}

	pub const fn selection(&self) -> ModeSelection {
		self.selection
	}

	pub const fn scale(&self) -> &ScaleConfig {
		&self.scale
	}

	/// Change how the mode is chosen and re-project the current cursor
	pub fn set_selection(&mut self, selection: ModeSelection) -> Option<CursorProjection> {
		self.selection = selection;
		if let Some(program) = &self.program {
			let mode = selection.resolve(program);
			if self.mode != Some(mode) {
				debug!(%mode, "timeline mode switched");
			}
			self.mode = Some(mode);
		}
		self.cursor()
	}

	/// Track the run position; `None` clears the highlight
	pub fn update_position(&mut self, position: Option<(usize, usize)>) -> Result<Option<CursorProjection>> {
		if let Some((series, event)) = position {
			self.check(series, Some(event))?;
			if matches!(self.elapsed, Some((elapsed_series, _)) if elapsed_series != series) {
				self.elapsed = None;
			}
		}
		self.position = position;
		Ok(self.cursor())
	}

	/// Track the live elapsed time of the running series
	pub fn update_elapsed(&mut self, series: usize, elapsed_ms: u64) -> Result<Option<CursorProjection>> {
		self.check(series, None)?;
		self.elapsed = Some((series, elapsed_ms));
		Ok(self.cursor())
	}

	/// Drop the live cursor over `series` once it completed
	pub fn cleanup(&mut self, series: usize) -> Option<CursorProjection> {
		if matches!(self.elapsed, Some((elapsed_series, _)) if elapsed_series == series) {
			self.elapsed = None;
		}
		self.cursor()
	}

	pub fn clear(&mut self) {
		self.position = None;
		self.elapsed = None;
	}

	/// Project the stored position into the current mode's coordinates
	pub fn cursor(&self) -> Option<CursorProjection> {
		match self.mode? {
			TimelineMode::EventIndexed => self.slot(),
			TimelineMode::TimeScaled => self.continuous(),
		}
	}

	/// Event boxes of one series in the current mode
	pub fn layout(&self, series: usize) -> Result<Vec<Geometry>> {
		let mode = self.mode.ok_or(TimelineError::NoProgram)?;
		let derived = self.derived(series)?;
		Ok(Geometry::layout(derived, mode, &self.scale))
	}

	fn slot(&self) -> Option<CursorProjection> {
		if let Some((series, event)) = self.position {
			return Some(CursorProjection::Slot { series, event });
		}

		// Only a Chrono tick so far: highlight whichever event the clock is in
		let (series, elapsed) = self.elapsed?;
		let event = self.series.get(series)?.event_at(elapsed)?;
		Some(CursorProjection::Slot { series, event: event.index })
	}

	fn continuous(&self) -> Option<CursorProjection> {
		if let Some((series, elapsed)) = self.elapsed {
			return Some(CursorProjection::Continuous {
				series,
				x: self.scale.ms_to_px(elapsed),
			});
		}

		// No tick received yet: sit at the start of the current event
		let (series, event) = self.position?;
		let offset = self.series.get(series)?.event(event)?.cumulative_offset;
		Some(CursorProjection::Continuous {
			series,
			x: self.scale.ms_to_px(offset),
		})
	}

	fn derived(&self, series: usize) -> Result<&DerivedSeries> {
		if self.program.is_none() {
			return Err(TimelineError::NoProgram);
		}
		self.series.get(series).ok_or(TimelineError::SeriesOutOfRange {
			index: series,
			len: self.series.len(),
		})
	}

	fn check(&self, series: usize, event: Option<usize>) -> Result<()> {
		let derived = self.derived(series)?;
		match event {
			Some(index) if index >= derived.len() => Err(TimelineError::EventOutOfRange {
				series,
				index,
				len: derived.len(),
			}),
			_ => Ok(()),
		}
	}
}
