// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::{error::Result, event::RawTxn};

/// Ordered consumer of [`RawTxn`]s.
///
/// The collector invokes `emit` with transactions in strictly ascending
/// commit-timestamp order, fake transactions included. A sink that blocks
/// backpressures the whole pipeline; a sink that fails halts it.
pub trait RawTxnSink: Send {
	fn emit(&mut self, txn: RawTxn) -> impl Future<Output = Result<()>> + Send;
}
