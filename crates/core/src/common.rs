// Copyright (c) riptide.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

use std::{
	fmt,
	fmt::{Display, Formatter},
	num::ParseIntError,
	str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

/// Logical commit timestamp handed out by the upstream store.
///
/// Strictly ordered, monotonic and unsigned. Ties are resolved by
/// "minimum wins" everywhere a watermark is computed.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, PartialOrd, PartialEq, Ord, Eq, Hash)]
pub struct CommitTs(pub u64);

impl FromStr for CommitTs {
	type Err = ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(CommitTs(u64::from_str(s)?))
	}
}

impl Display for CommitTs {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl PartialEq<u64> for CommitTs {
	fn eq(&self, other: &u64) -> bool {
		self.0.eq(other)
	}
}

impl From<CommitTs> for u64 {
	fn from(value: CommitTs) -> Self {
		value.0
	}
}

impl From<u64> for CommitTs {
	fn from(value: u64) -> Self {
		Self(value)
	}
}

impl Serialize for CommitTs {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(self.0)
	}
}

impl<'de> Deserialize<'de> for CommitTs {
	fn deserialize<D>(deserializer: D) -> Result<CommitTs, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct U64Visitor;

		impl Visitor<'_> for U64Visitor {
			type Value = CommitTs;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("an unsigned 64-bit number")
			}

			fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
				Ok(CommitTs(value))
			}
		}

		deserializer.deserialize_u64(U64Visitor)
	}
}

/// Identifier of a capture process, used for labeling only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureId(String);

impl CaptureId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for CaptureId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of a changefeed, used for labeling only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangefeedId(String);

impl ChangefeedId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for ChangefeedId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
