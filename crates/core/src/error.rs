// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Error type shared by the riptide crates.
//!
//! Every failure is fatal to the pipeline instance that produced it; the
//! core never retries. Cancellation is its own kind so callers can tell a
//! deliberate shutdown apart from a data-path failure, and `NotFound` is
//! distinct so "does not exist yet" never reads as "operation failed".

/// Error type for the riptide pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The shared cancellation signal fired while an operation was in
	/// flight.
	#[error("operation cancelled")]
	Cancelled,

	/// A per-span subscription failed. Fatal to the owning puller.
	#[error("event feed subscription failed: {reason}")]
	Subscription {
		reason: String,
	},

	/// Every producer of a channel is gone; the input is exhausted.
	#[error("event channel closed")]
	ChannelClosed,

	/// The requested record does not exist.
	#[error("{resource} not found")]
	NotFound {
		resource: String,
	},

	/// Encoding or decoding failed.
	#[error("codec error: {0}")]
	Codec(String),

	/// The coordination-service meta store failed an operation.
	#[error("meta store error: {0}")]
	MetaStore(String),

	/// The output sink rejected a transaction.
	#[error("output sink failed: {0}")]
	Sink(String),

	/// Internal invariant violation.
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Whether this error was produced by the shared cancellation signal.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}

	/// Whether this error means the record does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::NotFound { .. })
	}
}

/// Result type for riptide operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_kinds() {
		assert!(Error::Cancelled.is_cancelled());
		assert!(!Error::ChannelClosed.is_cancelled());
		let err = Error::NotFound {
			resource: "capture capture-1".to_string(),
		};
		assert!(err.is_not_found());
		assert_eq!(err.to_string(), "capture capture-1 not found");
	}
}
