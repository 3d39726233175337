// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Condition-polling wait helpers, so tests never sleep for fixed amounts.

use std::time::{Duration, Instant};

use tokio::time::sleep;

/// Default timeout for wait operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Waits for `condition` to become true, panicking after the default
/// timeout.
pub async fn wait_for<F>(condition: F)
where
	F: Fn() -> bool,
{
	wait_for_with_timeout(condition, DEFAULT_TIMEOUT).await
}

/// Waits for `condition` to become true, panicking after `timeout`.
pub async fn wait_for_with_timeout<F>(condition: F, timeout: Duration)
where
	F: Fn() -> bool,
{
	let start = Instant::now();
	while !condition() {
		if start.elapsed() > timeout {
			panic!("timeout after {:?} waiting for condition", timeout);
		}
		sleep(POLL_INTERVAL).await;
	}
}
