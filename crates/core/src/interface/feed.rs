// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{common::CommitTs, error::Result, event::RegionFeedEvent, span::Span};

/// Upstream change-feed client: per-span subscription to region events.
///
/// An implementation delivers the span's events into `events`, starting at
/// `checkpoint_ts`, until `shutdown` fires or the subscription fails. The
/// contract tolerates two quirks of the region layer: keys slightly outside
/// the requested span may be delivered (the puller filters them), and
/// resolved events may arrive per sub-range while regions split and merge
/// (the frontier re-tiles its coverage accordingly).
pub trait EventFeedClient: Send + Sync + 'static {
	fn event_feed(
		&self,
		span: Span,
		checkpoint_ts: CommitTs,
		events: mpsc::Sender<RegionFeedEvent>,
		shutdown: CancellationToken,
	) -> impl Future<Output = Result<()>> + Send;
}
