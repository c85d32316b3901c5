//! Error types for domkit-dom.
//!
//! Every fallible driver operation returns [`Result`]. Lookup failures are
//! reported as values; a missing optional capability on a component is never
//! an error.

/// Errors reported by the document session and its host bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// The container a component was rendered, appended or hydrated into
	/// could not be resolved in the host document.
	#[error("parent element not found: {0}")]
	ParentNotFound(String),

	/// The node of a component could not be resolved in the host document.
	#[error("component element not found: {0}")]
	ComponentNotFound(String),

	/// A listener was requested on a node that has no identifier, so no
	/// event key can be built for it.
	#[error("cannot key a `{event}` listener on an element without an id")]
	MissingId {
		/// The event name that was requested.
		event: String,
	},

	/// A listener was registered outside any component while the session
	/// rejects unowned listeners.
	#[error("listener `{0}` has no owning component")]
	OrphanedListener(String),

	/// A call into the host document failed.
	#[error("host document error: {0}")]
	Host(String),

	/// No browser document is available in this environment.
	#[error("no document available")]
	NoDocument,

	/// Session options could not be parsed.
	#[error("invalid options: {0}")]
	InvalidOptions(String),
}

impl DomError {
	/// Returns `true` for the not-found family of errors.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::ParentNotFound(_) | Self::ComponentNotFound(_))
	}
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DomError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		Self::Host(
			value
				.as_string()
				.unwrap_or_else(|| format!("{:?}", value)),
		)
	}
}

/// Result alias used throughout the crate.
pub type Result<T, E = DomError> = std::result::Result<T, E>;
