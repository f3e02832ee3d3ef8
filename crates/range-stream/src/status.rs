use async_broadcast::{InactiveReceiver, Receiver, Sender};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, trace};

const CHANGE_CAPACITY: usize = 16;

/// Connectivity of the event stream as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
	Connecting,
	Connected,
	Error,
	#[default]
	Disconnected,
}

impl ConnectionStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Connecting => "connecting",
			Self::Connected => "connected",
			Self::Error => "error",
			Self::Disconnected => "disconnected",
		}
	}

	pub const fn is_connected(self) -> bool {
		matches!(self, Self::Connected)
	}
}

impl fmt::Display for ConnectionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Single writer of the connection status.
///
/// Readers either sample the latest value through [`watch`] or follow every
/// transition through the broadcast channel.
#[derive(Clone)]
pub struct StatusPublisher {
	current: Arc<watch::Sender<ConnectionStatus>>,
	changes: Sender<ConnectionStatus>,
	// keeps the broadcast channel open while nobody listens
	_idle: InactiveReceiver<ConnectionStatus>,
}

impl StatusPublisher {
	pub fn new() -> Self {
		let (current, _) = watch::channel(ConnectionStatus::default());
		let (mut changes, idle) = async_broadcast::broadcast(CHANGE_CAPACITY);
		changes.set_overflow(true);
		changes.set_await_active(false);

		Self {
			current: Arc::new(current),
			changes,
			_idle: idle.deactivate(),
		}
	}

	pub fn publish(&self, status: ConnectionStatus) {
		let previous = self.current.send_replace(status);
		if previous != status {
			info!(from = %previous, to = %status, "event stream status changed");
		}
		self.broadcast(status);
	}

	/// Returns `false` when a transition was lost, this one or the oldest queued
	fn broadcast(&self, status: ConnectionStatus) -> bool {
		match self.changes.try_broadcast(status) {
			Ok(None) => true,
			Ok(Some(dropped)) => {
				trace!(%dropped, "status listener lagging, oldest transition dropped");
				false
			}
			Err(e) => {
				trace!(error = %e, "status transition not broadcast");
				false
			}
		}
	}

	pub fn current(&self) -> ConnectionStatus {
		*self.current.borrow()
	}

	pub fn watch(&self) -> watch::Receiver<ConnectionStatus> {
		self.current.subscribe()
	}

	pub fn changes(&self) -> Receiver<ConnectionStatus> {
		self.changes.new_receiver()
	}
}

impl Default for StatusPublisher {
	fn default() -> Self {
		Self::new()
	}
}
