// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::atomic::AtomicU64;

/// Counters for one puller pipeline.
///
/// Handed to the puller by the enclosing service (which owns the actual
/// metrics runtime and labels them with capture and changefeed ids), so
/// ingestion stays observable without any registry attached.
#[derive(Debug, Default)]
pub struct PullerMetrics {
	/// Data events accepted into the buffer.
	pub kv_events: AtomicU64,
	/// Watermark events accepted into the buffer.
	pub resolved_events: AtomicU64,
	/// Events dropped by the span-membership filter.
	pub filtered_events: AtomicU64,
	/// Data events picked up by the collector.
	pub collected_entries: AtomicU64,
	/// Watermark events picked up by the collector.
	pub collected_resolved: AtomicU64,
	/// Transactions emitted, fake ones included.
	pub txns_emitted: AtomicU64,
	/// Fake transactions emitted to advance the watermark.
	pub fake_txns_emitted: AtomicU64,
}

impl PullerMetrics {
	pub fn new() -> Self {
		Self::default()
	}
}
