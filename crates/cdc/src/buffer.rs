// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use riptide_core::{Error, RegionFeedEvent, Result};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Capacity of the channel between the fan-in task and the collector.
/// Once it fills up, backpressure stalls every producer.
const BUFFER_CAPACITY: usize = 128;

/// Ordered hand-off between the concurrent producer side of the puller
/// and its single sequential consumer.
///
/// FIFO per producer only; cross-producer ordering is the business of the
/// frontier and the entry group downstream, not of this channel.
pub struct Buffer {
	tx: mpsc::Sender<RegionFeedEvent>,
	rx: Mutex<mpsc::Receiver<RegionFeedEvent>>,
}

impl Buffer {
	pub fn new() -> Self {
		let (tx, rx) = mpsc::channel(BUFFER_CAPACITY);
		Self {
			tx,
			rx: Mutex::new(rx),
		}
	}

	/// Enqueues one event, blocking while the buffer is full. Fails with a
	/// cancellation-kind error once `shutdown` fires.
	pub async fn add_entry(&self, shutdown: &CancellationToken, event: RegionFeedEvent) -> Result<()> {
		tokio::select! {
			_ = shutdown.cancelled() => Err(Error::Cancelled),
			sent = self.tx.send(event) => sent.map_err(|_| Error::ChannelClosed),
		}
	}

	/// Dequeues the next event in FIFO order, suspending until one is
	/// available or `shutdown` fires.
	pub async fn get(&self, shutdown: &CancellationToken) -> Result<RegionFeedEvent> {
		let mut rx = self.rx.lock().await;
		tokio::select! {
			_ = shutdown.cancelled() => Err(Error::Cancelled),
			event = rx.recv() => event.ok_or(Error::ChannelClosed),
		}
	}
}

impl Default for Buffer {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use riptide_core::{CommitTs, Span};

	use super::*;

	fn resolved(ts: u64) -> RegionFeedEvent {
		RegionFeedEvent::Resolved(riptide_core::ResolvedSpan {
			span: Span::new(b"a".to_vec(), b"z".to_vec()),
			resolved_ts: CommitTs(ts),
		})
	}

	#[tokio::test]
	async fn test_fifo() {
		let buffer = Buffer::new();
		let shutdown = CancellationToken::new();
		for ts in [1u64, 2, 3] {
			buffer.add_entry(&shutdown, resolved(ts)).await.unwrap();
		}
		for ts in [1u64, 2, 3] {
			assert_eq!(buffer.get(&shutdown).await.unwrap(), resolved(ts));
		}
	}

	#[tokio::test]
	async fn test_cancelled_get() {
		let buffer = Buffer::new();
		let shutdown = CancellationToken::new();
		shutdown.cancel();
		let err = buffer.get(&shutdown).await.unwrap_err();
		assert!(err.is_cancelled());
	}

	#[tokio::test]
	async fn test_cancelled_add_while_full() {
		let buffer = Buffer::new();
		let shutdown = CancellationToken::new();
		for ts in 0..super::BUFFER_CAPACITY as u64 {
			buffer.add_entry(&shutdown, resolved(ts)).await.unwrap();
		}
		// the buffer is full; a blocked producer must observe the shutdown
		let pending = buffer.add_entry(&shutdown, resolved(999));
		shutdown.cancel();
		let err = pending.await.unwrap_err();
		assert!(err.is_cancelled());
	}
}
