//! domkit-dom - component rendering and listener lifecycle over a host document
//!
//! Components describe themselves as element trees (or raw markup), the
//! renderer serializes them, and a [`Dom`] session injects the markup into a
//! host document, wires event listeners, and keeps track of what is live so
//! that updates and unmounts release exactly what they created.
//!
//! ## Architecture
//!
//! - [`builder`]: element builders and typed form controls
//! - [`component`]: the [`Component`] trait and its optional capabilities
//! - [`render`]: markup serialization and pending event collection
//! - [`dom`]: the session (registry, lifecycle driver, live element handles)
//! - [`host`]: the [`HostDocument`] boundary, with an in-memory document and
//!   the browser document (`wasm32` only)
//! - [`event`]: the event abstraction handed to listeners
//! - [`router`]: hash routing and queries
//!
//! ## Example
//!
//! ```ignore
//! use domkit_dom::prelude::*;
//!
//! let dom = Dom::browser()?;
//! dom.render("app", div().class("hello").text("Hello!").into_component())?;
//! ```

pub mod builder;
pub mod callback;
pub mod component;
pub mod dom;
pub mod error;
pub mod event;
pub mod host;
pub mod logging;
pub mod render;
pub mod router;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

pub use builder::{Child, Element, Form, Input, IntoChild, Select, Textarea};
pub use callback::{Callback, EventHandler, IntoEventHandler, event_handler, into_event_handler};
pub use component::{
	ChildProvider, Component, ComponentBase, ComponentRef, ElementComponent, ElementSource,
	HtmlRenderer, Mountable, Unmountable, Updatable, View,
};
pub use dom::{
	Dom, DomBuilder, DomOptions, ElementRef, LogSink, MountContext, OrphanPolicy, WeakDom,
	event_key,
};
pub use error::{DomError, Result};
pub use event::{Event, SyntheticEvent};
pub use host::{HostDocument, MemoryDocument, NodeHandle};
#[cfg(target_arch = "wasm32")]
pub use host::WebDocument;

/// Installs process-wide hooks.
///
/// With the `console_error_panic_hook` feature, panics are reported to the
/// browser console. Safe to call more than once.
pub fn init() {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();
	crate::info_log!("domkit-dom initialized");
}

/// Everything an application usually needs.
pub mod prelude {
	pub use crate::builder::form::{form, input, select, textarea};
	pub use crate::builder::html::*;
	pub use crate::{
		Callback, Component, ComponentBase, ComponentRef, Dom, DomError, DomOptions, ElementRef,
		Event, HtmlRenderer, MountContext, Mountable, Result, Unmountable, Updatable, View,
		WeakDom,
	};
}
