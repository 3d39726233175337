// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::fmt;

use crate::keycode;

/// A half-open key range `[start, end)` over raw bytes.
///
/// An empty `end` means the range is unbounded above. Spans partition the
/// keyspace for subscription; they are fixed for the lifetime of a puller,
/// while the store's regions split and merge underneath them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Span {
	pub start: Vec<u8>,
	pub end: Vec<u8>,
}

impl Span {
	pub fn new(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
		Self {
			start: start.into(),
			end: end.into(),
		}
	}

	/// Whether `key` falls inside this range.
	pub fn contains(&self, key: &[u8]) -> bool {
		key >= self.start.as_slice() && (self.end.is_empty() || key < self.end.as_slice())
	}

	/// Whether the range covers no keys at all.
	pub fn is_empty(&self) -> bool {
		!self.end.is_empty() && self.start >= self.end
	}

	/// The same range with both bounds keycode-encoded, for comparison
	/// against keys the store delivers in its on-disk encoding.
	pub fn keycode_encoded(&self) -> Span {
		Span {
			start: keycode::encode_bytes(&self.start),
			end: if self.end.is_empty() {
				Vec::new()
			} else {
				keycode::encode_bytes(&self.end)
			},
		}
	}
}

impl fmt::Debug for Span {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, ", hex(&self.start))?;
		if self.end.is_empty() {
			f.write_str("..)")
		} else {
			write!(f, "{})", hex(&self.end))
		}
	}
}

fn hex(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Whether `key` falls inside any of `spans`.
///
/// Regions do not align with requested spans, so the store can deliver
/// events for keys nobody asked for; this is the membership check the
/// puller filters with.
pub fn key_in_spans(key: &[u8], spans: &[Span]) -> bool {
	spans.iter().any(|span| span.contains(key))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_contains_half_open() {
		let span = Span::new(b"a".to_vec(), b"m".to_vec());
		assert!(span.contains(b"a"));
		assert!(span.contains(b"b"));
		assert!(span.contains(b"lzzz"));
		assert!(!span.contains(b"m"));
		assert!(!span.contains(b"z"));
	}

	#[test]
	fn test_contains_unbounded_end() {
		let span = Span::new(b"t".to_vec(), Vec::new());
		assert!(span.contains(b"t"));
		assert!(span.contains(b"zzzz"));
		assert!(!span.contains(b"a"));
	}

	#[test]
	fn test_is_empty() {
		assert!(Span::new(b"b".to_vec(), b"a".to_vec()).is_empty());
		assert!(Span::new(b"a".to_vec(), b"a".to_vec()).is_empty());
		assert!(!Span::new(b"a".to_vec(), b"b".to_vec()).is_empty());
		assert!(!Span::new(b"a".to_vec(), Vec::new()).is_empty());
	}

	#[test]
	fn test_key_in_spans() {
		let spans = vec![Span::new(b"a".to_vec(), b"c".to_vec()), Span::new(b"x".to_vec(), b"z".to_vec())];
		assert!(key_in_spans(b"b", &spans));
		assert!(key_in_spans(b"y", &spans));
		assert!(!key_in_spans(b"m", &spans));
		assert!(!key_in_spans(b"z", &spans));
	}

	#[test]
	fn test_keycode_encoded_preserves_membership() {
		let span = Span::new(b"a".to_vec(), b"m".to_vec());
		let encoded = span.keycode_encoded();
		assert!(encoded.contains(&keycode::encode_bytes(b"b")));
		assert!(!encoded.contains(&keycode::encode_bytes(b"z")));
	}
}
