// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Test tooling for the riptide crates: a scripted event feed, collecting
//! and failing sinks, an in-memory meta store and wait helpers.

pub mod feed;
pub mod sink;
pub mod store;
pub mod wait;

pub use feed::{FeedAction, ScriptedFeed};
pub use sink::{CollectingSink, FailingSink};
pub use store::MemoryMetaStore;
pub use wait::{wait_for, wait_for_with_timeout};

/// Installs a fmt tracing subscriber honoring `RUST_LOG`. Safe to call
/// from every test; only the first call wins.
pub fn init_tracing() {
	use tracing_subscriber::EnvFilter;

	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}
