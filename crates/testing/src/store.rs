// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::collections::HashMap;

use parking_lot::Mutex;
use riptide_core::{Result, interface::MetaStore};

/// In-memory [`MetaStore`] standing in for the coordination service.
#[derive(Default)]
pub struct MemoryMetaStore {
	entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryMetaStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl MetaStore for MemoryMetaStore {
	async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
		self.entries.lock().insert(key.to_string(), value);
		Ok(())
	}

	async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
		Ok(self.entries.lock().get(key).cloned())
	}

	async fn delete(&self, key: &str) -> Result<()> {
		self.entries.lock().remove(key);
		Ok(())
	}
}
