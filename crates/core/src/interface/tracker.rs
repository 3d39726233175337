// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::{common::CommitTs, span::Span};

/// Tracks per-span resolved timestamps and the global minimum across them.
///
/// `forward` must only ever be called from one logical thread; the return
/// value means "the global minimum advanced" and is meaningless under
/// concurrent writers. The pipeline enforces this structurally by locking
/// the tracker for the lifetime of the collector loop.
pub trait ResolvedTsTracker {
	/// Records that `span` has resolved up to `ts`. Returns whether the
	/// global minimum advanced.
	fn forward(&mut self, span: &Span, ts: CommitTs) -> bool;

	/// Current global minimum across all tracked sub-ranges. Zero until
	/// every part of the requested coverage has reported.
	fn frontier(&self) -> CommitTs;
}
