// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::sync::Arc;

use parking_lot::Mutex;
use riptide_core::{Error, RawTxn, Result, interface::RawTxnSink};

/// A [`RawTxnSink`] that records everything it receives.
#[derive(Default)]
pub struct CollectingSink {
	txns: Arc<Mutex<Vec<RawTxn>>>,
}

impl CollectingSink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared handle onto the collected transactions, usable after the
	/// sink itself moved into the collector.
	pub fn handle(&self) -> Arc<Mutex<Vec<RawTxn>>> {
		Arc::clone(&self.txns)
	}
}

impl RawTxnSink for CollectingSink {
	async fn emit(&mut self, txn: RawTxn) -> Result<()> {
		self.txns.lock().push(txn);
		Ok(())
	}
}

/// A [`RawTxnSink`] that rejects every transaction.
pub struct FailingSink {
	reason: String,
}

impl FailingSink {
	pub fn new(reason: impl Into<String>) -> Self {
		Self {
			reason: reason.into(),
		}
	}
}

impl RawTxnSink for FailingSink {
	async fn emit(&mut self, _txn: RawTxn) -> Result<()> {
		Err(Error::Sink(self.reason.clone()))
	}
}
