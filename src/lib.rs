//! # domkit
//!
//! Component rendering and listener lifecycle for WebAssembly frontends.
//!
//! Components describe themselves with element builders, a [`Dom`] session
//! renders them into a host document, and every listener wired along the way
//! is released again when the component updates or unmounts.
//!
//! ## Crates
//!
//! - [`dom`] (`domkit-dom`): builders, renderer, session, host documents
//!
//! ## Feature Flags
//!
//! - `console_error_panic_hook` - report panics to the browser console from
//!   [`init`]
//! - `debug-hooks` - enable `debug_log!` output in debug builds
//!
//! ## Quick Example
//!
//! ```ignore
//! use domkit::prelude::*;
//!
//! struct Hello {
//!     base: ComponentBase,
//! }
//!
//! impl View for Hello {
//!     fn view(&self) -> Element {
//!         div().class("hello").child(h1().text("Hello, domkit!"))
//!     }
//! }
//!
//! impl Component for Hello {
//!     fn base(&self) -> &ComponentBase {
//!         &self.base
//!     }
//!
//!     fn as_view(&self) -> Option<&dyn View> {
//!         Some(self)
//!     }
//! }
//!
//! domkit::init();
//! let dom = Dom::browser()?;
//! dom.render("app", Rc::new(Hello { base: ComponentBase::new() }))?;
//! ```

pub use domkit_dom as dom;

pub use domkit_dom::builder::html::{
	Child, Element, IntoChild, a, button, div, h1, h2, h3, img, label, li, ol, option, p, span,
	ul,
};
pub use domkit_dom::builder::form::{Form, Input, Select, Textarea, form, input, select, textarea};
pub use domkit_dom::{
	Callback, ChildProvider, Component, ComponentBase, ComponentRef, Dom, DomBuilder, DomError,
	DomOptions, ElementComponent, ElementRef, ElementSource, Event, HostDocument, HtmlRenderer,
	MemoryDocument, MountContext, Mountable, OrphanPolicy, Result, Unmountable, Updatable, View,
	WeakDom, init,
};
#[cfg(target_arch = "wasm32")]
pub use domkit_dom::WebDocument;

// Logging macros are exported by `domkit-dom`
pub use domkit_dom::{debug_log, dom_log, error_log, info_log, warn_log};

/// Re-exports for application code.
pub mod prelude {
	pub use domkit_dom::prelude::*;
	pub use std::rc::Rc;
}

#[cfg(test)]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_prelude_renders_through_facade() {
		let doc = Rc::new(crate::MemoryDocument::with_body("<div id='app'></div>"));
		let dom = Dom::new(doc.clone());
		dom.render("app", h1().text("hi").into_component()).unwrap();
		assert_eq!(doc.text_by_id("dk-1").as_deref(), Some("hi"));
	}
}
