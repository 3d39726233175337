// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! The transaction collector: the single sequential consumer that turns
//! buffered region events into an ordered transaction stream.

use std::sync::atomic::Ordering;

use riptide_core::{
	RawTxn, RegionFeedEvent, Result,
	interface::{RawTxnSink, ResolvedTsTracker},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{buffer::Buffer, group::EntryGroup, metrics::PullerMetrics};

/// Drains `input`, feeds the tracker and groups entries into transactions,
/// emitting them to `sink` in ascending commit-timestamp order.
///
/// The loop is the tracker's only writer, which is what gives `forward`'s
/// return value its meaning: a `true` means the global minimum really
/// advanced, so everything at or below the new frontier is complete and
/// safe to flush. When a flush finds nothing buffered, a fake transaction
/// still goes out so the downstream watermark keeps moving through idle
/// periods.
///
/// Runs until `shutdown` fires or the input or sink fails; there is no
/// successful termination.
pub(crate) async fn collect_raw_txns<T, S>(
	shutdown: &CancellationToken,
	input: &Buffer,
	tracker: &mut T,
	sink: &mut S,
	metrics: &PullerMetrics,
) -> Result<()>
where
	T: ResolvedTsTracker,
	S: RawTxnSink,
{
	let mut group = EntryGroup::new();
	loop {
		match input.get(shutdown).await? {
			RegionFeedEvent::Entry(entry) => {
				metrics.collected_entries.fetch_add(1, Ordering::Relaxed);
				group.add_entry(entry.ts, entry);
			}
			RegionFeedEvent::Resolved(resolved) => {
				metrics.collected_resolved.fetch_add(1, Ordering::Relaxed);
				if !tracker.forward(&resolved.span, resolved.resolved_ts) {
					continue;
				}
				// Consume up to the new global minimum, not the event's
				// own timestamp: with several spans in flight the event
				// that advanced the frontier can still be ahead of it.
				let watermark = tracker.frontier();
				let txns = group.consume(watermark);
				let ready = txns.len();
				for txn in txns {
					metrics.txns_emitted.fetch_add(1, Ordering::Relaxed);
					sink.emit(txn).await?;
				}
				if ready == 0 {
					debug!(ts = watermark.0, "forwarding fake txn");
					metrics.txns_emitted.fetch_add(1, Ordering::Relaxed);
					metrics.fake_txns_emitted.fetch_add(1, Ordering::Relaxed);
					sink.emit(RawTxn::fake(watermark)).await?;
				}
			}
		}
	}
}
