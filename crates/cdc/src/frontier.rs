// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Resolved-timestamp frontier over a fixed set of key spans.

use std::collections::BTreeMap;

use riptide_core::{CommitTs, Span, interface::ResolvedTsTracker};

/// One tracked sub-range `[start, end)` and its last resolved timestamp.
/// The start key is the map key it is stored under.
struct Segment {
	end: Vec<u8>,
	ts: CommitTs,
}

/// Tracks the minimum resolved timestamp across the requested spans.
///
/// Region splits and merges report resolved timestamps per sub-range, not
/// per requested span, so the tracked segments are re-tiled on every
/// `forward`: the covered part of an existing segment is replaced, the
/// uncovered remainders keep their old timestamps. The segment set always
/// exactly tiles the spans supplied at construction; reports outside that
/// coverage are ignored, and a report can never lower a segment.
pub struct SpanFrontier {
	segments: BTreeMap<Vec<u8>, Segment>,
	min: CommitTs,
}

impl SpanFrontier {
	/// Creates a frontier covering `spans`, all at timestamp zero. The
	/// spans must not overlap each other.
	pub fn new(spans: impl IntoIterator<Item = Span>) -> Self {
		let mut segments = BTreeMap::new();
		for span in spans {
			if span.is_empty() {
				continue;
			}
			segments.insert(
				span.start,
				Segment {
					end: span.end,
					ts: CommitTs(0),
				},
			);
		}
		Self {
			segments,
			min: CommitTs(0),
		}
	}

	fn apply(&mut self, span: &Span, ts: CommitTs) {
		if span.is_empty() {
			return;
		}

		let mut affected = Vec::new();
		for (start, segment) in &self.segments {
			if !span.end.is_empty() && start.as_slice() >= span.end.as_slice() {
				break;
			}
			if segment.end.is_empty() || segment.end.as_slice() > span.start.as_slice() {
				affected.push(start.clone());
			}
		}

		for start in affected {
			let Some(segment) = self.segments.remove(&start) else {
				continue;
			};
			if ts <= segment.ts {
				// stale or tied report, minimum wins
				self.segments.insert(start, segment);
				continue;
			}

			let overlap_start = if span.start.as_slice() > start.as_slice() {
				span.start.clone()
			} else {
				start.clone()
			};
			let overlap_end = end_min(&span.end, &segment.end);

			if overlap_start.as_slice() > start.as_slice() {
				self.segments.insert(
					start,
					Segment {
						end: overlap_start.clone(),
						ts: segment.ts,
					},
				);
			}
			if !overlap_end.is_empty()
				&& (segment.end.is_empty() || overlap_end.as_slice() < segment.end.as_slice())
			{
				self.segments.insert(
					overlap_end.clone(),
					Segment {
						end: segment.end,
						ts: segment.ts,
					},
				);
			}
			self.segments.insert(
				overlap_start,
				Segment {
					end: overlap_end,
					ts,
				},
			);
		}
	}
}

impl ResolvedTsTracker for SpanFrontier {
	fn forward(&mut self, span: &Span, ts: CommitTs) -> bool {
		let previous = self.min;
		self.apply(span, ts);
		let current = self.segments.values().map(|s| s.ts).min().unwrap_or(CommitTs(0));
		debug_assert!(current >= previous, "frontier regressed");
		self.min = current;
		current > previous
	}

	fn frontier(&self) -> CommitTs {
		self.min
	}
}

/// Minimum of two exclusive end bounds, where an empty bound is unbounded.
fn end_min(a: &[u8], b: &[u8]) -> Vec<u8> {
	if a.is_empty() {
		b.to_vec()
	} else if b.is_empty() || a <= b {
		a.to_vec()
	} else {
		b.to_vec()
	}
}
