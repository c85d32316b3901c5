//! Host document bindings.
//!
//! [`HostDocument`] is the boundary between the lifecycle driver and a real
//! document. Two implementations exist:
//!
//! - [`MemoryDocument`](memory::MemoryDocument): an in-process document used
//!   on native targets and in tests.
//! - [`WebDocument`](web::WebDocument) (`wasm32` only): the browser's
//!   `window.document`.
//!
//! Node and listener handles are opaque enums so the trait stays object safe
//! and the driver never needs to know which host it talks to.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::fmt;
use std::rc::Rc;

use crate::callback::EventHandler;
use crate::error::Result;

pub use memory::{MemoryDocument, NodeKey};
#[cfg(target_arch = "wasm32")]
pub use web::WebDocument;

/// An opaque reference to a node in a host document.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeHandle {
	/// A node of a [`MemoryDocument`].
	Memory(NodeKey),
	/// A browser element.
	#[cfg(target_arch = "wasm32")]
	Web(web_sys::Element),
}

/// Registration of a platform callback.
///
/// Dropping the handle releases the callback; it must be detached through
/// [`HostDocument::remove_listener`] first.
pub enum ListenerHandle {
	/// Listener id inside a [`MemoryDocument`].
	Memory(u64),
	/// A browser closure kept alive while the listener is attached.
	#[cfg(target_arch = "wasm32")]
	Web(wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>),
}

impl fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Memory(id) => f.debug_tuple("Memory").field(id).finish(),
			#[cfg(target_arch = "wasm32")]
			Self::Web(_) => f.debug_tuple("Web").field(&"<closure>").finish(),
		}
	}
}

/// Hash-change subscriber.
pub type HashHandler = Rc<dyn Fn(String) + 'static>;

/// Operations the driver needs from a document.
///
/// Lookups report absence as `None`; mutations report host failures as
/// [`DomError::Host`](crate::DomError::Host).
pub trait HostDocument {
	/// Resolves an element by exact id.
	fn element_by_id(&self, id: &str) -> Option<NodeHandle>;

	/// The `<body>` root.
	fn body(&self) -> Option<NodeHandle>;

	/// The `<head>` root.
	fn head(&self) -> Option<NodeHandle>;

	/// Whether the node is still attached to the document.
	fn is_connected(&self, node: &NodeHandle) -> bool;

	/// Replaces the node's content with parsed markup.
	fn set_inner_html(&self, node: &NodeHandle, markup: &str) -> Result<()>;

	/// Replaces the node itself with parsed markup.
	fn set_outer_html(&self, node: &NodeHandle, markup: &str) -> Result<()>;

	/// Inserts parsed markup after the node's existing content.
	fn append_html(&self, node: &NodeHandle, markup: &str) -> Result<()>;

	/// Detaches the node from the document.
	fn remove(&self, node: &NodeHandle) -> Result<()>;

	/// Attaches a named-event callback to the node.
	fn add_listener(
		&self,
		node: &NodeHandle,
		event: &str,
		handler: EventHandler,
	) -> Result<ListenerHandle>;

	/// Detaches a callback previously returned by `add_listener` and
	/// releases it.
	fn remove_listener(&self, node: &NodeHandle, event: &str, handle: ListenerHandle);

	fn attribute(&self, node: &NodeHandle, name: &str) -> Option<String>;

	fn set_attribute(&self, node: &NodeHandle, name: &str, value: &str) -> Result<()>;

	fn remove_attribute(&self, node: &NodeHandle, name: &str) -> Result<()>;

	/// The current form value (empty for nodes without one).
	fn value(&self, node: &NodeHandle) -> String;

	fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()>;

	/// The current checked state (`false` for nodes without one).
	fn checked(&self, node: &NodeHandle) -> bool;

	fn set_checked(&self, node: &NodeHandle, checked: bool) -> Result<()>;

	/// The node's text content.
	fn text(&self, node: &NodeHandle) -> String;

	/// Replaces the node's content with a single text node.
	fn set_text(&self, node: &NodeHandle, text: &str) -> Result<()>;

	fn focus(&self, node: &NodeHandle) -> Result<()>;

	/// All elements matching a selector, in document order.
	fn query_all(&self, selector: &str) -> Vec<NodeHandle>;

	/// The current fragment identifier, including the leading `#`.
	fn location_hash(&self) -> String;

	fn set_location_hash(&self, hash: &str);

	/// Subscribes to fragment changes. The handler receives the new hash.
	fn on_hash_change(&self, handler: HashHandler) -> Result<ListenerHandle>;

	/// Cancels a hash subscription.
	fn remove_hash_listener(&self, handle: ListenerHandle);
}
