//! Component System for domkit
//!
//! A component is a unit of UI with a stable identifier. Everything else is
//! an optional capability: declarative rendering, a wrapped element, raw
//! markup, declared children and mount/update/unmount notifications.
//!
//! ## Usage
//!
//! ```ignore
//! use domkit_dom::component::{Component, ComponentBase, Mountable, View};
//!
//! struct Counter {
//!     base: ComponentBase,
//!     count: Cell<u32>,
//! }
//!
//! impl View for Counter {
//!     fn view(&self) -> Element {
//!         div().child(span().id("count").text(self.count.get().to_string()))
//!     }
//! }
//!
//! impl Component for Counter {
//!     fn base(&self) -> &ComponentBase { &self.base }
//!     fn as_view(&self) -> Option<&dyn View> { Some(self) }
//! }
//! ```

mod element;
mod traits;

pub use element::ElementComponent;
pub use traits::{
	ChildProvider, Component, ComponentBase, ComponentRef, ElementSource, HtmlRenderer, Mountable,
	Unmountable, Updatable, View,
};
