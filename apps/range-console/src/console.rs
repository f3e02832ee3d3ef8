use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::render;
use crate::repl::{self, ConsoleCommand};
use range_api::RangeClient;
use range_events::DomainEvent;
use range_stream::{StreamConfig, StreamConnection};
use range_timeline::ModeSelection;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Live view of one controller.
///
/// Stream events are forwarded into a channel and applied here one at a time,
/// in delivery order, so the mirrored state has a single writer.
pub struct Console {
	client: RangeClient,
	connection: StreamConnection,
	mirror: Mirror,
}

impl Console {
	pub fn new(client: RangeClient, reconnect_delay: Duration, selection: ModeSelection) -> Self {
		let config = StreamConfig::new(client.base_url()).with_reconnect_delay(reconnect_delay);

		Self {
			connection: StreamConnection::http(config),
			client,
			mirror: Mirror::new(selection),
		}
	}

	pub async fn run(mut self) -> Result<()> {
		print_lines(self.mirror.seed(&self.client).await);

		let (tx, mut events) = mpsc::unbounded_channel();
		self.connection
			.open(move |event| {
				let _ = tx.send(event);
			})
			.await;

		let mut statuses = self.connection.status_changes();
		let mut lines = BufReader::new(tokio::io::stdin()).lines();
		let mut stdin_open = true;
		let shutdown = tokio::signal::ctrl_c();
		tokio::pin!(shutdown);

		println!("{}", repl::HELP);

		loop {
			tokio::select! {
				Some(event) = events.recv() => print_lines(self.mirror.apply(&event, &self.client).await),
				Ok(status) = statuses.recv() => println!("{}", render::status_line(status)),
				line = lines.next_line(), if stdin_open => match line? {
					Some(line) if line.trim().is_empty() => {}
					Some(line) => match line.parse::<ConsoleCommand>() {
						Ok(ConsoleCommand::Quit) => break,
						Ok(command) => self.execute(command, &mut events).await,
						Err(e) => println!("{e}"),
					},
					None => {
						debug!("stdin closed, watching only");
						stdin_open = false;
					}
				},
				_ = &mut shutdown => break,
			}
		}

		self.connection.close().await;
		info!("watch ended");
		Ok(())
	}

	async fn execute(&mut self, command: ConsoleCommand, events: &mut mpsc::UnboundedReceiver<DomainEvent>) {
		let result = match command {
			ConsoleCommand::Server(url) => self.switch_server(&url, events).await,
			ConsoleCommand::Mode(selection) => {
				print_lines(self.mirror.set_selection(selection));
				Ok(())
			}
			ConsoleCommand::State => {
				println!("{}", self.mirror.state_line());
				Ok(())
			}
			ConsoleCommand::Load(id) => self.client.load(id).await.map_err(Error::from),
			ConsoleCommand::Start => self.client.start().await.map_err(Error::from),
			ConsoleCommand::Stop => self.client.stop().await.map_err(Error::from),
			ConsoleCommand::Skip(series) => self.client.skip_to(series).await.map_err(Error::from),
			ConsoleCommand::Help => {
				println!("{}", repl::HELP);
				Ok(())
			}
			ConsoleCommand::Quit => Ok(()),
		};

		if let Err(e) = result {
			println!("error: {e}");
		}
	}

	/// Move both the REST client and the stream to another controller.
	///
	/// Nothing mirrored from the previous controller survives the switch: its
	/// queued events are dropped and the state is reset before seeding.
	async fn switch_server(&mut self, url: &str, events: &mut mpsc::UnboundedReceiver<DomainEvent>) -> Result<()> {
		self.client.set_base_url(url)?;
		self.connection.retarget(self.client.base_url());
		println!("[server] {}", self.client.base_url());

		let dropped = discard_stale(events);
		debug!(dropped, "discarded events from the previous controller");

		print_lines(self.mirror.apply(&DomainEvent::reset(), &self.client).await);
		print_lines(self.mirror.seed(&self.client).await);
		Ok(())
	}
}

/// Drop everything already queued, returning how many events were discarded
fn discard_stale(events: &mut mpsc::UnboundedReceiver<DomainEvent>) -> usize {
	let mut dropped = 0;
	while events.try_recv().is_ok() {
		dropped += 1;
	}
	dropped
}

fn print_lines(lines: Vec<String>) {
	for line in lines {
		println!("{line}");
	}
}
