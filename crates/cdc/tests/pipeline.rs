// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 riptide

//! Integration tests for the puller pipeline: fan-out, span filtering,
//! watermark tracking and ordered transaction collection.

use std::sync::{Arc, atomic::Ordering};

use riptide_cdc::{Puller, PullerConfig, PullerMetrics};
use riptide_core::{
	CaptureId, ChangefeedId, CommitTs, Error, OpType, RawKVEntry, RawTxn, RegionFeedEvent, ResolvedSpan, Span,
	keycode::encode_bytes,
};
use riptide_testing::{CollectingSink, FeedAction, ScriptedFeed, wait_for};
use tokio_util::sync::CancellationToken;

fn entry(key: Vec<u8>, ts: u64) -> FeedAction {
	FeedAction::Event(RegionFeedEvent::Entry(RawKVEntry {
		op: OpType::Put,
		key,
		value: b"v".to_vec(),
		old_value: None,
		ts: CommitTs(ts),
	}))
}

fn resolved(span: Span, ts: u64) -> FeedAction {
	FeedAction::Event(RegionFeedEvent::Resolved(ResolvedSpan {
		span,
		resolved_ts: CommitTs(ts),
	}))
}

fn config(spans: Vec<Span>, need_encode: bool) -> PullerConfig {
	PullerConfig::new(
		CaptureId::new("capture-1"),
		ChangefeedId::new("feed-1"),
		CommitTs(100),
		spans,
		need_encode,
	)
}

struct RunningPipeline {
	puller: Arc<Puller<ScriptedFeed>>,
	metrics: Arc<PullerMetrics>,
	shutdown: CancellationToken,
	txns: Arc<parking_lot::Mutex<Vec<RawTxn>>>,
	run: tokio::task::JoinHandle<riptide_core::Result<()>>,
	collect: tokio::task::JoinHandle<riptide_core::Result<()>>,
}

fn start(feed: ScriptedFeed, config: PullerConfig) -> RunningPipeline {
	riptide_testing::init_tracing();

	let metrics = Arc::new(PullerMetrics::new());
	let puller = Arc::new(Puller::new(feed, config, Arc::clone(&metrics)));
	let shutdown = CancellationToken::new();

	let run = tokio::spawn({
		let puller = Arc::clone(&puller);
		let shutdown = shutdown.clone();
		async move { puller.run(shutdown).await }
	});

	let mut sink = CollectingSink::new();
	let txns = sink.handle();
	let collect = tokio::spawn({
		let puller = Arc::clone(&puller);
		let shutdown = shutdown.clone();
		async move { puller.collect_raw_txns(shutdown, &mut sink).await }
	});

	RunningPipeline {
		puller,
		metrics,
		shutdown,
		txns,
		run,
		collect,
	}
}

impl RunningPipeline {
	/// Cancels the pipeline and asserts both halves report cancellation.
	async fn stop(self) -> Vec<RawTxn> {
		self.shutdown.cancel();
		assert!(self.run.await.unwrap().unwrap_err().is_cancelled());
		assert!(self.collect.await.unwrap().unwrap_err().is_cancelled());
		let txns = self.txns.lock().clone();
		txns
	}
}

#[tokio::test]
async fn test_end_to_end_ordering_and_filtering() {
	let span = Span::new(b"a".to_vec(), b"m".to_vec());
	let feed = ScriptedFeed::new().with_script(
		span.clone(),
		vec![
			entry(b"b".to_vec(), 105),
			// out of span: the region returns more than was asked for
			entry(b"z".to_vec(), 105),
			resolved(span.clone(), 104),
			resolved(span.clone(), 106),
		],
	);
	let checkpoints = feed.checkpoint_log();

	let pipeline = start(feed, config(vec![span.clone()], false));

	wait_for(|| pipeline.puller.resolved_ts() == CommitTs(106)).await;
	let metrics = Arc::clone(&pipeline.metrics);
	wait_for(|| metrics.txns_emitted.load(Ordering::Relaxed) == 2).await;

	let txns = pipeline.stop().await;

	// 104 advanced the watermark with nothing buffered, 106 released the
	// single real transaction; the out-of-span entry never got in
	assert_eq!(txns.len(), 2);
	assert_eq!(txns[0], RawTxn::fake(CommitTs(104)));
	assert_eq!(txns[1].ts, CommitTs(105));
	assert_eq!(txns[1].entries.len(), 1);
	assert_eq!(txns[1].entries[0].key, b"b".to_vec());

	assert_eq!(metrics.filtered_events.load(Ordering::Relaxed), 1);
	assert_eq!(checkpoints.lock().clone(), vec![(span, CommitTs(100))]);
}

#[tokio::test]
async fn test_liveness_without_writes() {
	let span = Span::new(b"a".to_vec(), b"m".to_vec());
	let feed = ScriptedFeed::new().with_script(span.clone(), vec![resolved(span.clone(), 110)]);

	let pipeline = start(feed, config(vec![span], false));

	wait_for(|| pipeline.puller.resolved_ts() == CommitTs(110)).await;
	let metrics = Arc::clone(&pipeline.metrics);
	wait_for(|| metrics.fake_txns_emitted.load(Ordering::Relaxed) == 1).await;

	let txns = pipeline.stop().await;
	assert_eq!(txns, vec![RawTxn::fake(CommitTs(110))]);
}

#[tokio::test]
async fn test_need_encode_filters_on_encoded_keys() {
	let span = Span::new(b"a".to_vec(), b"m".to_vec());
	let encoded_span = span.keycode_encoded();
	// the store delivers keys and resolved spans in its on-disk encoding
	let feed = ScriptedFeed::new().with_script(
		span.clone(),
		vec![
			entry(encode_bytes(b"b"), 105),
			entry(encode_bytes(b"z"), 105),
			resolved(encoded_span.clone(), 106),
		],
	);

	let pipeline = start(feed, config(vec![span], true));

	wait_for(|| pipeline.puller.resolved_ts() == CommitTs(106)).await;
	let metrics = Arc::clone(&pipeline.metrics);
	wait_for(|| metrics.txns_emitted.load(Ordering::Relaxed) == 1).await;

	let txns = pipeline.stop().await;
	assert_eq!(txns.len(), 1);
	assert_eq!(txns[0].ts, CommitTs(105));
	assert_eq!(txns[0].entries[0].key, encode_bytes(b"b"));
	assert_eq!(metrics.filtered_events.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_watermark_needs_every_span() {
	let left = Span::new(b"a".to_vec(), b"c".to_vec());
	let right = Span::new(b"x".to_vec(), b"z".to_vec());
	let feed = ScriptedFeed::new()
		.with_script(left.clone(), vec![resolved(left.clone(), 120)])
		.with_script(right.clone(), vec![resolved(right.clone(), 115)]);

	let pipeline = start(feed, config(vec![left, right], false));

	// the global minimum only moves once both spans have reported
	wait_for(|| pipeline.puller.resolved_ts() == CommitTs(115)).await;

	let txns = pipeline.stop().await;
	assert_eq!(txns, vec![RawTxn::fake(CommitTs(115))]);
}

#[tokio::test]
async fn test_subscription_failure_cancels_the_group() {
	let left = Span::new(b"a".to_vec(), b"c".to_vec());
	let right = Span::new(b"x".to_vec(), b"z".to_vec());
	let feed = ScriptedFeed::new()
		.with_script(left.clone(), vec![resolved(left.clone(), 120)])
		.with_script(right.clone(), vec![FeedAction::Fail("region unavailable".to_string())]);

	let metrics = Arc::new(PullerMetrics::new());
	let puller = Arc::new(Puller::new(feed, config(vec![left, right], false), Arc::clone(&metrics)));
	let shutdown = CancellationToken::new();

	// no degraded mode: the healthy span's task dies with the broken one
	let err = puller.run(shutdown.clone()).await.unwrap_err();
	match err {
		Error::Subscription {
			reason,
		} => assert_eq!(reason, "region unavailable"),
		other => panic!("expected subscription failure, got {other}"),
	}
	assert!(shutdown.is_cancelled());
}

#[tokio::test]
async fn test_external_cancellation_stops_everything() {
	let span = Span::new(b"a".to_vec(), b"m".to_vec());
	let feed = ScriptedFeed::new().with_script(span.clone(), vec![resolved(span.clone(), 104)]);

	let pipeline = start(feed, config(vec![span], false));
	wait_for(|| pipeline.puller.resolved_ts() == CommitTs(104)).await;

	// stop() asserts both run and collect surface cancellation
	let txns = pipeline.stop().await;
	assert_eq!(txns, vec![RawTxn::fake(CommitTs(104))]);
}
