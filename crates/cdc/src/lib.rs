// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Change-data-capture ingestion pipeline.
//!
//! Turns the unordered, multiplexed event streams of a sharded KV store
//! into one globally-ordered stream of committed transactions: a
//! [`Puller`] fans per-span subscriptions into a bounded [`Buffer`], the
//! transaction collector drains it, the [`SpanFrontier`] tracks the
//! watermark below which no further writes can arrive, and the
//! [`EntryGroup`] releases complete transactions in ascending
//! commit-timestamp order.

pub mod buffer;
pub mod capture;
pub mod frontier;
pub mod group;
pub mod metrics;
pub mod puller;
mod txn;

pub use buffer::Buffer;
pub use capture::{CaptureInfo, CaptureRegistry};
pub use frontier::SpanFrontier;
pub use group::EntryGroup;
pub use metrics::PullerMetrics;
pub use puller::{Puller, PullerConfig};
