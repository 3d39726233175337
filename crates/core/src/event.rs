// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Event model of the region change feed.

use crate::{common::CommitTs, span::Span};

/// Kind of change carried by a [`RawKVEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
	Put,
	Delete,
}

/// A single key/value change, immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKVEntry {
	pub op: OpType,
	pub key: Vec<u8>,
	pub value: Vec<u8>,
	/// Previous value, present for updates when the store captures it.
	pub old_value: Option<Vec<u8>>,
	pub ts: CommitTs,
}

/// Watermark event: no entry with commit ts at or below `resolved_ts` will
/// ever be delivered for `span` again.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpan {
	pub span: Span,
	pub resolved_ts: CommitTs,
}

/// One event from a region feed: either a change or a watermark.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionFeedEvent {
	Entry(RawKVEntry),
	Resolved(ResolvedSpan),
}

/// All entries committed at one timestamp, the unit of ordered output.
///
/// `entries` may be empty: such a fake transaction exists purely to move
/// the downstream watermark during periods with no writes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTxn {
	pub ts: CommitTs,
	pub entries: Vec<RawKVEntry>,
}

impl RawTxn {
	/// A watermark-only transaction with no entries.
	pub fn fake(ts: CommitTs) -> Self {
		Self {
			ts,
			entries: Vec::new(),
		}
	}

	pub fn is_fake(&self) -> bool {
		self.entries.is_empty()
	}
}
