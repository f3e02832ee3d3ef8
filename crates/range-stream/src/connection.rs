use crate::config::StreamConfig;
use crate::sse::SseFrame;
use crate::status::{ConnectionStatus, StatusPublisher};
use crate::transport::{EventTransport, FrameStream, HttpEventTransport, TransportError};
use futures_util::StreamExt;
use range_events::DomainEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Owner of the single live event-stream subscription.
///
/// Also the only writer of [`ConnectionStatus`]; everyone else reads it
/// through [`StreamConnection::status`] or [`StreamConnection::status_changes`].
pub struct StreamConnection {
	transport: Arc<dyn EventTransport>,
	config: StreamConfig,
	status: StatusPublisher,
	base_url: watch::Sender<String>,
	subscription: Option<Subscription>,
	generation: u64,
}

struct Subscription {
	cancel: CancellationToken,
	task: JoinHandle<()>,
}

/// Caller-side view of a subscription opened by [`StreamConnection::open`]
#[derive(Debug, Clone)]
pub struct StreamHandle {
	generation: u64,
	cancel: CancellationToken,
}

impl StreamHandle {
	/// Increments every time the connection is (re)opened
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Retire the subscription without waiting for it to wind down
	pub fn close(&self) {
		self.cancel.cancel();
	}

	pub fn is_closed(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

impl StreamConnection {
	pub fn new(transport: Arc<dyn EventTransport>, config: StreamConfig) -> Self {
		let (base_url, _) = watch::channel(config.base_url.clone());

		Self {
			transport,
			config,
			status: StatusPublisher::new(),
			base_url,
			subscription: None,
			generation: 0,
		}
	}

	/// Connection backed by server-sent events over HTTP
	pub fn http(config: StreamConfig) -> Self {
		Self::new(Arc::new(HttpEventTransport::new()), config)
	}

	/// Start delivering domain events to `on_event`.
	///
	/// Any existing subscription is torn down and awaited first, so at most one
	/// subscription is ever live. The same callback survives every reconnect.
	pub async fn open<F>(&mut self, on_event: F) -> StreamHandle
	where
		F: FnMut(DomainEvent) + Send + 'static,
	{
		self.close().await;

		self.generation += 1;
		let cancel = CancellationToken::new();

		let worker = SubscriptionWorker {
			transport: Arc::clone(&self.transport),
			config: self.config.clone(),
			status: self.status.clone(),
			base_url: self.base_url.subscribe(),
			cancel: cancel.clone(),
			on_event,
		};

		info!(generation = self.generation, url = %self.stream_url(), "opening event stream subscription");
		let task = tokio::spawn(worker.run());

		self.subscription = Some(Subscription { cancel: cancel.clone(), task });

		StreamHandle {
			generation: self.generation,
			cancel,
		}
	}

	/// Retire the live subscription, if any, and wait until it has let go of the transport
	pub async fn close(&mut self) {
		let Some(subscription) = self.subscription.take() else {
			return;
		};

		subscription.cancel.cancel();
		match subscription.task.await {
			Ok(()) => {}
			Err(e) if e.is_cancelled() => {}
			Err(e) => {
				error!("Event stream task failed: {}", e);
				self.status.publish(ConnectionStatus::Disconnected);
			}
		}
	}

	/// Point the subscription at another controller.
	///
	/// A live subscription drops its current stream and reconnects immediately
	/// against the new address with the same callback.
	pub fn retarget(&mut self, base_url: impl Into<String>) {
		let base_url = base_url.into();
		self.config.base_url.clone_from(&base_url);

		let changed = self.base_url.send_if_modified(|current| {
			if *current == base_url {
				false
			} else {
				*current = base_url;
				true
			}
		});

		if changed {
			info!(url = %self.stream_url(), "event stream retargeted");
		}
	}

	pub fn base_url(&self) -> String {
		self.base_url.borrow().clone()
	}

	pub fn stream_url(&self) -> String {
		self.config.stream_url(&self.base_url.borrow())
	}

	pub fn is_open(&self) -> bool {
		self.subscription.as_ref().is_some_and(|s| !s.task.is_finished())
	}

	pub fn current_status(&self) -> ConnectionStatus {
		self.status.current()
	}

	/// Latest status, for displays that only care about "now"
	pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
		self.status.watch()
	}

	/// Every status transition, in order
	pub fn status_changes(&self) -> async_broadcast::Receiver<ConnectionStatus> {
		self.status.changes()
	}
}

impl Drop for StreamConnection {
	fn drop(&mut self) {
		if let Some(subscription) = &self.subscription {
			subscription.cancel.cancel();
		}
	}
}

enum Outcome {
	Cancelled,
	Retarget,
	Failed(TransportError),
}

struct SubscriptionWorker<F> {
	transport: Arc<dyn EventTransport>,
	config: StreamConfig,
	status: StatusPublisher,
	base_url: watch::Receiver<String>,
	cancel: CancellationToken,
	on_event: F,
}

impl<F> SubscriptionWorker<F>
where
	F: FnMut(DomainEvent) + Send + 'static,
{
	async fn run(mut self) {
		loop {
			let url = self.config.stream_url(&self.base_url.borrow_and_update());
			self.status.publish(ConnectionStatus::Connecting);

			// an address change abandons a pending connect attempt
			let subscribed = tokio::select! {
				biased;
				() = self.cancel.cancelled() => Err(Outcome::Cancelled),
				changed = self.base_url.changed() => Err(if changed.is_ok() { Outcome::Retarget } else { Outcome::Cancelled }),
				result = self.transport.subscribe(&url) => Ok(result),
			};

			let outcome = match subscribed {
				Err(outcome) => outcome,
				Ok(Ok(frames)) => {
					info!(%url, "event stream connected");
					self.status.publish(ConnectionStatus::Connected);
					self.pump(frames).await
				}
				Ok(Err(e)) => Outcome::Failed(e),
			};

			match outcome {
				Outcome::Cancelled => break,
				Outcome::Retarget => {
					self.status.publish(ConnectionStatus::Disconnected);
				}
				Outcome::Failed(e) => {
					error!(%url, error = %e, "event stream failed, retrying in {:?}", self.config.reconnect_delay);
					self.status.publish(ConnectionStatus::Error);
					(self.on_event)(DomainEvent::reset());

					if !self.wait_before_retry(self.config.reconnect_delay).await {
						break;
					}
				}
			}
		}

		debug!("event stream subscription retired");
		self.status.publish(ConnectionStatus::Disconnected);
	}

	/// Deliver frames until the stream fails, the address changes or the subscription is retired
	async fn pump(&mut self, mut frames: FrameStream) -> Outcome {
		loop {
			let next = tokio::select! {
				biased;
				() = self.cancel.cancelled() => return Outcome::Cancelled,
				changed = self.base_url.changed() => {
					return if changed.is_ok() { Outcome::Retarget } else { Outcome::Cancelled };
				}
				frame = frames.next() => frame,
			};

			match next {
				Some(Ok(frame)) => self.dispatch(frame),
				Some(Err(e)) => return Outcome::Failed(e),
				None => return Outcome::Failed(TransportError::Closed),
			}
		}
	}

	/// Sleep out the reconnect delay. A new address cuts the wait short.
	/// Returns `false` once the subscription has been retired.
	async fn wait_before_retry(&mut self, delay: Duration) -> bool {
		tokio::select! {
			biased;
			() = self.cancel.cancelled() => false,
			changed = self.base_url.changed() => changed.is_ok(),
			() = tokio::time::sleep(delay) => true,
		}
	}

	fn dispatch(&mut self, frame: SseFrame) {
		match DomainEvent::from_wire(&frame.event, &frame.data) {
			Ok(event) => (self.on_event)(event),
			Err(e) => warn!(event = %frame.event, error = %e, "dropping malformed stream event"),
		}
	}
}
