//! Event abstraction handed to listeners.
//!
//! An [`Event`] wraps either a platform event (`web_sys::Event` on WASM) or a
//! synthetic event produced by the in-memory document. Handlers see the same
//! API in both cases.

use std::cell::Cell;
use std::rc::Rc;

/// An event delivered to a listener.
#[derive(Clone, Debug)]
pub struct Event {
	inner: EventInner,
}

#[derive(Clone, Debug)]
enum EventInner {
	Synthetic(Rc<SyntheticEvent>),
	#[cfg(target_arch = "wasm32")]
	Web(web_sys::Event),
}

/// Event state for documents without a platform event object.
///
/// One instance is shared by every listener reached while the event bubbles,
/// so `prevent_default`/`stop_propagation` are visible to the dispatcher.
#[derive(Debug, Default)]
pub struct SyntheticEvent {
	name: String,
	target_id: String,
	target_value: String,
	target_checked: bool,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}

impl SyntheticEvent {
	/// Creates a synthetic event with an empty target.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Sets the target's id, form value and checked state.
	pub fn with_target(
		mut self,
		id: impl Into<String>,
		value: impl Into<String>,
		checked: bool,
	) -> Self {
		self.target_id = id.into();
		self.target_value = value.into();
		self.target_checked = checked;
		self
	}

	/// Returns whether a listener called `prevent_default`.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}

	/// Returns whether a listener called `stop_propagation`.
	pub fn propagation_stopped(&self) -> bool {
		self.propagation_stopped.get()
	}
}

impl Event {
	/// Creates a standalone synthetic event with the given name.
	pub fn synthetic(name: impl Into<String>) -> Self {
		Self::from_synthetic(Rc::new(SyntheticEvent::new(name)))
	}

	/// Wraps shared synthetic event state.
	pub fn from_synthetic(event: Rc<SyntheticEvent>) -> Self {
		Self {
			inner: EventInner::Synthetic(event),
		}
	}

	/// Wraps a platform event.
	#[cfg(target_arch = "wasm32")]
	pub fn from_web(event: web_sys::Event) -> Self {
		Self {
			inner: EventInner::Web(event),
		}
	}

	/// Returns the underlying platform event, if any.
	#[cfg(target_arch = "wasm32")]
	pub fn as_web(&self) -> Option<&web_sys::Event> {
		match &self.inner {
			EventInner::Web(event) => Some(event),
			EventInner::Synthetic(_) => None,
		}
	}

	/// Returns the event name (`"click"`, `"input"`, ...).
	pub fn name(&self) -> String {
		match &self.inner {
			EventInner::Synthetic(event) => event.name.clone(),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => event.type_(),
		}
	}

	/// Prevents the default action of the event.
	pub fn prevent_default(&self) {
		match &self.inner {
			EventInner::Synthetic(event) => event.default_prevented.set(true),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => event.prevent_default(),
		}
	}

	/// Stops the event from bubbling further up the tree.
	pub fn stop_propagation(&self) {
		match &self.inner {
			EventInner::Synthetic(event) => event.propagation_stopped.set(true),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => event.stop_propagation(),
		}
	}

	/// Returns whether the default action has been prevented.
	pub fn default_prevented(&self) -> bool {
		match &self.inner {
			EventInner::Synthetic(event) => event.default_prevented(),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => event.default_prevented(),
		}
	}

	/// Returns the form value of the event target, or an empty string.
	pub fn target_value(&self) -> String {
		match &self.inner {
			EventInner::Synthetic(event) => event.target_value.clone(),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => web_target_property(event, "value")
				.and_then(|v| v.as_string())
				.unwrap_or_default(),
		}
	}

	/// Returns the id of the event target, or an empty string.
	pub fn target_id(&self) -> String {
		match &self.inner {
			EventInner::Synthetic(event) => event.target_id.clone(),
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => {
				use wasm_bindgen::JsCast;
				event
					.target()
					.and_then(|t| t.dyn_into::<web_sys::Element>().ok())
					.map(|el| el.id())
					.unwrap_or_default()
			}
		}
	}

	/// Returns the checked state of the event target (`false` if it has none).
	pub fn target_checked(&self) -> bool {
		match &self.inner {
			EventInner::Synthetic(event) => event.target_checked,
			#[cfg(target_arch = "wasm32")]
			EventInner::Web(event) => web_target_property(event, "checked")
				.and_then(|v| v.as_bool())
				.unwrap_or(false),
		}
	}
}

#[cfg(target_arch = "wasm32")]
fn web_target_property(event: &web_sys::Event, name: &str) -> Option<wasm_bindgen::JsValue> {
	let target = event.target()?;
	let value = js_sys::Reflect::get(target.as_ref(), &wasm_bindgen::JsValue::from_str(name)).ok()?;
	if value.is_undefined() || value.is_null() {
		None
	} else {
		Some(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_synthetic_defaults() {
		let event = Event::synthetic("click");
		assert_eq!(event.name(), "click");
		assert_eq!(event.target_id(), "");
		assert_eq!(event.target_value(), "");
		assert!(!event.target_checked());
		assert!(!event.default_prevented());
	}

	#[test]
	fn test_flags_are_shared_between_clones() {
		let state = Rc::new(SyntheticEvent::new("submit").with_target("form", "", false));
		let event = Event::from_synthetic(Rc::clone(&state));
		let cloned = event.clone();

		cloned.prevent_default();
		cloned.stop_propagation();

		assert!(event.default_prevented());
		assert!(state.propagation_stopped());
	}

	#[test]
	fn test_target_accessors() {
		let event = Event::from_synthetic(Rc::new(
			SyntheticEvent::new("change").with_target("agree", "yes", true),
		));
		assert_eq!(event.target_id(), "agree");
		assert_eq!(event.target_value(), "yes");
		assert!(event.target_checked());
	}
}
