//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DomError, Result};
use crate::render::markers::{DEFAULT_AUTO_ID_PREFIX, DEFAULT_ID_PREFIX};

/// What happens to listeners registered outside any component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
	/// Accept the listener into the unowned bucket, released by
	/// [`Dom::release_orphans`](crate::Dom::release_orphans).
	#[default]
	Collect,
	/// Refuse the registration with [`DomError::OrphanedListener`].
	Reject,
}

/// Options of a document session.
///
/// ## Example
///
/// ```ignore
/// let options = DomOptions::from_json(r#"{ "id_prefix": "app", "orphan_policy": "reject" }"#)?;
/// let dom = Dom::builder().host(doc).options(options).build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomOptions {
	/// Prefix of generated component ids (`dk-1`).
	pub id_prefix: String,
	/// Prefix of ids generated for event-bearing nodes (`auto-2`).
	pub auto_id_prefix: String,
	pub orphan_policy: OrphanPolicy,
	/// Check that a cached node is still connected before returning it.
	pub validate_cache: bool,
}

impl Default for DomOptions {
	fn default() -> Self {
		Self {
			id_prefix: DEFAULT_ID_PREFIX.to_string(),
			auto_id_prefix: DEFAULT_AUTO_ID_PREFIX.to_string(),
			orphan_policy: OrphanPolicy::default(),
			validate_cache: true,
		}
	}
}

impl DomOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses options from JSON. Missing fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self> {
		let options: Self =
			serde_json::from_str(json).map_err(|e| DomError::InvalidOptions(e.to_string()))?;
		options.validate()?;
		Ok(options)
	}

	/// Checks that generated ids will be usable as element ids.
	pub fn validate(&self) -> Result<()> {
		for (field, prefix) in [
			("id_prefix", &self.id_prefix),
			("auto_id_prefix", &self.auto_id_prefix),
		] {
			if prefix.is_empty() || prefix.contains(char::is_whitespace) {
				return Err(DomError::InvalidOptions(format!(
					"{} must be a non-empty token, got {:?}",
					field, prefix
				)));
			}
		}
		Ok(())
	}

	pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.id_prefix = prefix.into();
		self
	}

	pub fn auto_id_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.auto_id_prefix = prefix.into();
		self
	}

	pub fn orphan_policy(mut self, policy: OrphanPolicy) -> Self {
		self.orphan_policy = policy;
		self
	}

	pub fn validate_cache(mut self, validate: bool) -> Self {
		self.validate_cache = validate;
		self
	}
}
