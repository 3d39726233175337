// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Shared data model for the riptide change-data-capture pipeline.
//!
//! This crate carries everything the pipeline crates agree on: logical
//! timestamps, key spans, the region feed event model, the order-preserving
//! key encoding and the trait seams behind which the upstream feed client,
//! the resolved-ts tracker, the output sink and the coordination-service
//! meta store live.

pub mod common;
pub mod error;
pub mod event;
pub mod interface;
pub mod keycode;
pub mod span;

pub use common::{CaptureId, ChangefeedId, CommitTs};
pub use error::{Error, Result};
pub use event::{OpType, RawKVEntry, RawTxn, RegionFeedEvent, ResolvedSpan};
pub use span::Span;
