// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::collections::BTreeMap;

use riptide_core::{CommitTs, RawKVEntry, RawTxn};

/// Buffers out-of-order entries per commit timestamp until the watermark
/// proves they are complete.
///
/// A region feed can deliver entries for a timestamp before or after that
/// timestamp's resolved event, so buckets accumulate for as long as it
/// takes; `consume` then flushes everything at or below the watermark in
/// ascending order, which is what gives the output stream its total order.
#[derive(Default)]
pub struct EntryGroup {
	buckets: BTreeMap<CommitTs, Vec<RawKVEntry>>,
}

impl EntryGroup {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `entry` to the bucket for `ts`.
	pub fn add_entry(&mut self, ts: CommitTs, entry: RawKVEntry) {
		self.buckets.entry(ts).or_default().push(entry);
	}

	/// Removes and returns every bucket with timestamp at or below
	/// `resolved_ts` as transactions in ascending timestamp order. Later
	/// buckets stay buffered; an empty result is fine.
	pub fn consume(&mut self, resolved_ts: CommitTs) -> Vec<RawTxn> {
		let pending = match resolved_ts.0.checked_add(1) {
			Some(next) => self.buckets.split_off(&CommitTs(next)),
			None => BTreeMap::new(),
		};
		let ready = std::mem::replace(&mut self.buckets, pending);
		ready.into_iter()
			.map(|(ts, entries)| RawTxn {
				ts,
				entries,
			})
			.collect()
	}
}
