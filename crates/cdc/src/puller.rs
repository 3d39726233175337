// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! The puller: one fetch task per span, a fan-in filter and the buffer
//! they hand off through, plus the frontier that turns their resolved
//! events into a single watermark.

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use riptide_core::{
	CaptureId, ChangefeedId, CommitTs, Error, RegionFeedEvent, Result, Span,
	interface::{EventFeedClient, RawTxnSink, ResolvedTsTracker},
	span::key_in_spans,
};
use tokio::{
	sync::{Mutex, MutexGuard, mpsc},
	task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::{buffer::Buffer, frontier::SpanFrontier, metrics::PullerMetrics, txn};

/// Capacity of the channel shared by every per-span feed task.
const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Configuration for a [`Puller`].
#[derive(Debug, Clone)]
pub struct PullerConfig {
	/// Capture process this puller runs in, for labeling only.
	pub capture_id: CaptureId,
	/// Changefeed this puller serves, for labeling only.
	pub changefeed_id: ChangefeedId,
	/// Timestamp to resume fetching from.
	pub checkpoint_ts: CommitTs,
	/// Key ranges to subscribe to. Fixed for the puller's lifetime.
	pub spans: Vec<Span>,
	/// Whether span bounds must be keycode-encoded before they are
	/// compared against delivered keys.
	pub need_encode: bool,
}

impl PullerConfig {
	pub fn new(
		capture_id: CaptureId,
		changefeed_id: ChangefeedId,
		checkpoint_ts: CommitTs,
		spans: Vec<Span>,
		need_encode: bool,
	) -> Self {
		Self {
			capture_id,
			changefeed_id,
			checkpoint_ts,
			spans,
			need_encode,
		}
	}
}

/// Pulls change events for a set of spans and exposes them as an ordered
/// transaction stream plus a resolved-timestamp watermark.
///
/// The puller owns its buffer and frontier exclusively. `run` drives the
/// producer side, `collect_raw_txns` the consumer side; both run against
/// the same cancellation token and are fate-shared with every feed task.
pub struct Puller<C> {
	client: Arc<C>,
	config: PullerConfig,
	/// Span set the fan-in filter compares keys against; keycode-encoded
	/// when the config asks for it.
	filter_spans: Arc<Vec<Span>>,
	buffer: Arc<Buffer>,
	frontier: Mutex<SpanFrontier>,
	resolved_ts: AtomicU64,
	metrics: Arc<PullerMetrics>,
}

impl<C: EventFeedClient> Puller<C> {
	/// Creates a puller fetching `config.spans` from `config.checkpoint_ts`.
	pub fn new(client: C, config: PullerConfig, metrics: Arc<PullerMetrics>) -> Self {
		let filter_spans: Vec<Span> = if config.need_encode {
			config.spans.iter().map(Span::keycode_encoded).collect()
		} else {
			config.spans.clone()
		};
		// resolved events arrive in the same key encoding as the data
		// events, so the frontier tracks the filter's view of the spans
		let frontier = SpanFrontier::new(filter_spans.clone());
		Self {
			client: Arc::new(client),
			config,
			filter_spans: Arc::new(filter_spans),
			buffer: Arc::new(Buffer::new()),
			frontier: Mutex::new(frontier),
			resolved_ts: AtomicU64::new(0),
			metrics,
		}
	}

	/// Runs the per-span feed tasks and the fan-in filter until `shutdown`
	/// fires or any task fails.
	///
	/// All-or-nothing fan-out: the first failure cancels the token, every
	/// task is awaited, and the first error is returned. The frontier is
	/// only meaningful while every span makes progress, so there is no
	/// degraded mode with a subset of spans alive.
	pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
		info!(
			capture = %self.config.capture_id,
			changefeed = %self.config.changefeed_id,
			spans = self.config.spans.len(),
			checkpoint = self.config.checkpoint_ts.0,
			"puller starting"
		);

		let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
		let mut tasks: JoinSet<Result<()>> = JoinSet::new();

		for span in &self.config.spans {
			let client = Arc::clone(&self.client);
			let span = span.clone();
			let checkpoint_ts = self.config.checkpoint_ts;
			let events = event_tx.clone();
			let token = shutdown.clone();
			tasks.spawn(async move { client.event_feed(span, checkpoint_ts, events, token).await });
		}
		drop(event_tx);

		{
			let buffer = Arc::clone(&self.buffer);
			let metrics = Arc::clone(&self.metrics);
			let filter_spans = Arc::clone(&self.filter_spans);
			let token = shutdown.clone();
			tasks.spawn(async move {
				loop {
					let event = tokio::select! {
						_ = token.cancelled() => return Err(Error::Cancelled),
						event = event_rx.recv() => event.ok_or(Error::ChannelClosed)?,
					};
					match &event {
						RegionFeedEvent::Entry(entry) => {
							// A region holding [a, z) returns every key it
							// has even when only [b, c) was requested; drop
							// what nobody asked for.
							if !key_in_spans(&entry.key, &filter_spans) {
								metrics.filtered_events.fetch_add(1, Ordering::Relaxed);
								trace!(key = ?entry.key, "key not in requested spans, dropped");
								continue;
							}
							metrics.kv_events.fetch_add(1, Ordering::Relaxed);
						}
						RegionFeedEvent::Resolved(_) => {
							metrics.resolved_events.fetch_add(1, Ordering::Relaxed);
						}
					}
					buffer.add_entry(&token, event).await?;
				}
			});
		}

		let mut first_err: Option<Error> = None;
		while let Some(joined) = tasks.join_next().await {
			let result = match joined {
				Ok(result) => result,
				Err(join) => Err(Error::Internal(format!("puller task panicked: {join}"))),
			};
			if let Err(err) = result {
				if first_err.is_none() {
					// fate-shared group: the first failure tears the
					// rest down, then we still wait for all of them
					shutdown.cancel();
					first_err = Some(err);
				}
			}
		}

		match first_err {
			Some(err) => {
				warn!(changefeed = %self.config.changefeed_id, error = %err, "puller stopped");
				Err(err)
			}
			None => Ok(()),
		}
	}

	/// Current global resolved timestamp. Safe to call concurrently with
	/// [`Puller::run`] and the collector loop.
	pub fn resolved_ts(&self) -> CommitTs {
		CommitTs(self.resolved_ts.load(Ordering::Acquire))
	}

	/// Runs the transaction collector over this puller's buffer, emitting
	/// ordered transactions into `sink` until `shutdown` fires or
	/// something fails.
	///
	/// The frontier lock is held for the whole loop, which makes this
	/// collector the frontier's only writer; a second concurrent collector
	/// blocks here instead of corrupting the forwarded signal.
	pub async fn collect_raw_txns<S: RawTxnSink>(&self, shutdown: CancellationToken, sink: &mut S) -> Result<()> {
		let mut tracker = SharedFrontier {
			inner: self.frontier.lock().await,
			resolved_ts: &self.resolved_ts,
		};
		txn::collect_raw_txns(&shutdown, &self.buffer, &mut tracker, sink, &self.metrics).await
	}
}

/// Publishes frontier advances into the lock-free cache behind
/// [`Puller::resolved_ts`] while delegating the tracking itself.
struct SharedFrontier<'a> {
	inner: MutexGuard<'a, SpanFrontier>,
	resolved_ts: &'a AtomicU64,
}

impl ResolvedTsTracker for SharedFrontier<'_> {
	fn forward(&mut self, span: &Span, ts: CommitTs) -> bool {
		let forwarded = self.inner.forward(span, ts);
		if forwarded {
			self.resolved_ts.store(self.inner.frontier().0, Ordering::Release);
		}
		forwarded
	}

	fn frontier(&self) -> CommitTs {
		self.inner.frontier()
	}
}
