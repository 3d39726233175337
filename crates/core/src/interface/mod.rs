// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Capability boundaries of the pipeline.
//!
//! Everything the ingestion core talks to lives behind one of these traits
//! so that tests can substitute fakes: the upstream feed client, the
//! resolved-ts tracker, the ordered output sink and the coordination
//! service's meta store.

mod feed;
mod meta;
mod sink;
mod tracker;

pub use feed::EventFeedClient;
pub use meta::MetaStore;
pub use sink::RawTxnSink;
pub use tracker::ResolvedTsTracker;
