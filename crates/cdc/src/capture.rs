// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use riptide_core::{CaptureId, Error, Result, interface::MetaStore};
use serde::{Deserialize, Serialize};

/// Prefix the registry stores capture records under.
const CAPTURE_INFO_PREFIX: &str = "/riptide/capture/info";

/// Identity record a capture process publishes to the coordination
/// service, so peers can find it and label its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureInfo {
	pub id: CaptureId,
	/// Address the capture process advertises.
	pub address: String,
}

/// CRUD access to capture records, keyed by capture id.
///
/// Not part of the ordering core: the registry only supplies the process
/// and changefeed identifiers the pipeline labels its output with. A
/// missing record surfaces as [`Error::NotFound`], distinct from store
/// failures, so callers can tell "does not exist yet" from "broken".
pub struct CaptureRegistry<S> {
	store: S,
}

impl<S: MetaStore> CaptureRegistry<S> {
	pub fn new(store: S) -> Self {
		Self {
			store,
		}
	}

	pub async fn put(&self, info: &CaptureInfo) -> Result<()> {
		let value = serde_json::to_vec(info).map_err(|e| Error::Codec(e.to_string()))?;
		self.store.put(&Self::key(&info.id), value).await
	}

	pub async fn get(&self, id: &CaptureId) -> Result<CaptureInfo> {
		match self.store.get(&Self::key(id)).await? {
			Some(raw) => serde_json::from_slice(&raw).map_err(|e| Error::Codec(e.to_string())),
			None => Err(Error::NotFound {
				resource: format!("capture {}", id),
			}),
		}
	}

	pub async fn delete(&self, id: &CaptureId) -> Result<()> {
		self.store.delete(&Self::key(id)).await
	}

	fn key(id: &CaptureId) -> String {
		format!("{}/{}", CAPTURE_INFO_PREFIX, id)
	}
}
