// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use riptide_core::{CommitTs, Error, RegionFeedEvent, Result, Span, interface::EventFeedClient};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One step of a scripted feed.
#[derive(Debug, Clone)]
pub enum FeedAction {
	/// Deliver this event.
	Event(RegionFeedEvent),
	/// Fail the subscription with this reason.
	Fail(String),
}

/// An [`EventFeedClient`] that replays a fixed script per span.
///
/// After its script is exhausted a subscription stays open, like a real
/// feed during a quiet period, until the shutdown token fires. A span
/// without a script idles the same way.
#[derive(Default)]
pub struct ScriptedFeed {
	scripts: Mutex<HashMap<Span, Vec<FeedAction>>>,
	checkpoints: Arc<Mutex<Vec<(Span, CommitTs)>>>,
}

impl ScriptedFeed {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds the script to replay for `span`.
	pub fn with_script(self, span: Span, actions: Vec<FeedAction>) -> Self {
		self.scripts.lock().insert(span, actions);
		self
	}

	/// Shared log of the `(span, checkpoint_ts)` pairs subscriptions were
	/// opened with, usable after the feed moved into a puller.
	pub fn checkpoint_log(&self) -> Arc<Mutex<Vec<(Span, CommitTs)>>> {
		Arc::clone(&self.checkpoints)
	}
}

impl EventFeedClient for ScriptedFeed {
	async fn event_feed(
		&self,
		span: Span,
		checkpoint_ts: CommitTs,
		events: mpsc::Sender<RegionFeedEvent>,
		shutdown: CancellationToken,
	) -> Result<()> {
		self.checkpoints.lock().push((span.clone(), checkpoint_ts));
		let actions = self.scripts.lock().remove(&span).unwrap_or_default();

		for action in actions {
			match action {
				FeedAction::Event(event) => {
					tokio::select! {
						_ = shutdown.cancelled() => return Err(Error::Cancelled),
						sent = events.send(event) => {
							if sent.is_err() {
								return Err(Error::ChannelClosed);
							}
						}
					}
				}
				FeedAction::Fail(reason) => {
					return Err(Error::Subscription {
						reason,
					});
				}
			}
		}

		// a real subscription never completes on its own
		shutdown.cancelled().await;
		Err(Error::Cancelled)
	}
}
