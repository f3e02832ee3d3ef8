use crate::render;
use async_trait::async_trait;
use range_api::RangeClient;
use range_events::{DomainEvent, ProgramDefinition, ProgramId, ProgramSummary, StatusSnapshot};
use range_timeline::{CursorProjection, ModeSelection, ScaleConfig, TimelineView};
use run_state::{Session, StateChange};
use tracing::{debug, warn};

/// Read side of the controller API the mirror fetches from
#[async_trait]
pub trait ProgramSource: Send + Sync {
	async fn status(&self) -> range_api::Result<StatusSnapshot>;

	async fn programs(&self) -> range_api::Result<Vec<ProgramSummary>>;

	async fn program(&self, id: ProgramId) -> range_api::Result<ProgramDefinition>;
}

#[async_trait]
impl ProgramSource for RangeClient {
	async fn status(&self) -> range_api::Result<StatusSnapshot> {
		Self::status(self).await
	}

	async fn programs(&self) -> range_api::Result<Vec<ProgramSummary>> {
		Self::programs(self).await
	}

	async fn program(&self, id: ProgramId) -> range_api::Result<ProgramDefinition> {
		Self::program(self, id).await
	}
}

/// Local copy of the controller: run state plus the derived timeline of the
/// running program.
///
/// Every operation returns the console lines it produced instead of printing
/// them, and fetches definitions through a [`ProgramSource`].
pub struct Mirror {
	session: Session,
	view: TimelineView,
}

impl Mirror {
	pub fn new(selection: ModeSelection) -> Self {
		Self {
			session: Session::new(),
			view: TimelineView::new(ScaleConfig::default()).with_selection(selection),
		}
	}

	pub const fn session(&self) -> &Session {
		&self.session
	}

	pub const fn view(&self) -> &TimelineView {
		&self.view
	}

	pub fn state_line(&self) -> String {
		render::run_state(&self.session.snapshot())
	}

	/// Paint the first frame from the controller's status snapshot.
	///
	/// An unavailable snapshot leaves the mirror as it was.
	pub async fn seed(&mut self, source: &dyn ProgramSource) -> Vec<String> {
		let mut out = Vec::new();

		match source.status().await {
			Ok(snapshot) => {
				out.push(render::snapshot(&snapshot));
				let changes = self.session.seed(&snapshot);
				self.react_all(changes, None, source, &mut out).await;
			}
			Err(e) => warn!("Initial status unavailable: {}", e),
		}

		out
	}

	pub async fn apply(&mut self, event: &DomainEvent, source: &dyn ProgramSource) -> Vec<String> {
		let mut out = Vec::new();
		let changes = self.session.handle(event);
		self.react_all(changes, event.program_id(), source, &mut out).await;
		out
	}

	pub fn set_selection(&mut self, selection: ModeSelection) -> Vec<String> {
		let cursor = self.view.set_selection(selection);
		let header = match self.view.mode() {
			Some(mode) => format!("[timeline] {mode} mode ({selection})"),
			None => format!("[timeline] {selection}"),
		};
		vec![header, render::cursor_line(cursor.as_ref())]
	}

	/// Apply every change in order, then draw the cursor once if it may have moved
	async fn react_all(&mut self, changes: Vec<StateChange>, touched: Option<ProgramId>, source: &dyn ProgramSource, out: &mut Vec<String>) {
		let mut redraw = changes.iter().any(StateChange::affects_cursor);

		for change in changes {
			if let Some(line) = render::change_line(&change) {
				out.push(line);
			}
			redraw |= self.react(change, touched, source, out).await;
		}

		if redraw {
			out.push(render::cursor_line(self.view.cursor().as_ref()));
		}
	}

	/// Returns whether the timeline was reloaded
	async fn react(&mut self, change: StateChange, touched: Option<ProgramId>, source: &dyn ProgramSource, out: &mut Vec<String>) -> bool {
		match change {
			StateChange::ProgramChanged(Some(id)) => self.load_timeline(id, source, out).await,
			StateChange::ProgramChanged(None) => self.view.unload(),
			StateChange::PositionChanged(position) => {
				let position = position.map(|p| (p.series_index, p.event_index));
				note(self.view.update_position(position));
			}
			StateChange::Elapsed { series_index, elapsed_ms } => note(self.view.update_elapsed(series_index, elapsed_ms)),
			StateChange::CursorCleanup { series_index } => {
				self.view.cleanup(series_index);
			}
			StateChange::ChronometerReset => self.view.clear(),
			StateChange::CatalogRefresh => return self.refresh_catalog(touched, source, out).await,
			_ => {}
		}
		false
	}

	/// Fetch and derive the definition of the running program
	async fn load_timeline(&mut self, id: ProgramId, source: &dyn ProgramSource, out: &mut Vec<String>) {
		match source.program(id).await {
			Ok(program) => {
				self.view.load(program);
				out.push(render::timeline(&self.view));

				if let Some(position) = self.session.snapshot().position() {
					note(self.view.update_position(Some((position.series_index, position.event_index))));
				}
			}
			Err(e) => {
				warn!(program_id = id, "Failed to fetch program definition: {}", e);
				self.view.unload();
			}
		}
	}

	async fn refresh_catalog(&mut self, touched: Option<ProgramId>, source: &dyn ProgramSource, out: &mut Vec<String>) -> bool {
		match source.programs().await {
			Ok(programs) => out.push(render::catalog(&programs)),
			Err(e) => warn!("Failed to refresh program catalog: {}", e),
		}

		// the running program itself was edited or removed
		let current = self.session.snapshot().program_id();
		let Some(id) = current.filter(|id| touched == Some(*id)) else {
			return false;
		};
		self.load_timeline(id, source, out).await;
		true
	}
}

fn note(projected: range_timeline::Result<Option<CursorProjection>>) {
	if let Err(e) = projected {
		debug!("Cursor not projected: {}", e);
	}
}
