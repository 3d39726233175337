// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use crate::error::Result;

/// Minimal key/value surface of the coordination service.
///
/// `get` returns `None` for missing keys; callers decide whether that is
/// an error. Everything else is a plain store failure.
pub trait MetaStore: Send + Sync {
	fn put(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

	fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

	fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
