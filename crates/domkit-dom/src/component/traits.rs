//! Component trait definition and optional capabilities.

use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::html::Element;
use crate::dom::MountContext;

/// Shared handle to a component instance.
pub type ComponentRef = Rc<dyn Component>;

/// Trait for reusable UI components.
///
/// A component only has to provide its identity through [`ComponentBase`].
/// Rendering and lifecycle behaviour are optional capabilities, each exposed
/// through an `as_*` accessor that returns `None` by default. The driver
/// asks for a capability once per step and skips the step when it is absent.
///
/// # Example
///
/// ```ignore
/// use domkit_dom::component::{Component, ComponentBase, View};
///
/// struct Greeting {
///     base: ComponentBase,
///     name: String,
/// }
///
/// impl View for Greeting {
///     fn view(&self) -> Element {
///         div().class("greeting").text(format!("Hello, {}!", self.name))
///     }
/// }
///
/// impl Component for Greeting {
///     fn base(&self) -> &ComponentBase {
///         &self.base
///     }
///
///     fn as_view(&self) -> Option<&dyn View> {
///         Some(self)
///     }
/// }
/// ```
pub trait Component: 'static {
	/// Returns the identity holder of this component.
	fn base(&self) -> &ComponentBase;

	/// Returns the identifier, empty until one is assigned.
	fn id(&self) -> String {
		self.base().id()
	}

	/// Replaces the identifier.
	fn set_id(&self, id: &str) {
		self.base().set_id(id);
	}

	/// Declarative rendering (first priority).
	fn as_view(&self) -> Option<&dyn View> {
		None
	}

	/// A wrapped element (second priority).
	fn as_element(&self) -> Option<&dyn ElementSource> {
		None
	}

	/// Raw markup rendering (fallback).
	fn as_html(&self) -> Option<&dyn HtmlRenderer> {
		None
	}

	/// Child enumeration.
	fn as_parent(&self) -> Option<&dyn ChildProvider> {
		None
	}

	/// Mount notification.
	fn as_mountable(&self) -> Option<&dyn Mountable> {
		None
	}

	/// Update notification.
	fn as_updatable(&self) -> Option<&dyn Updatable> {
		None
	}

	/// Unmount notification.
	fn as_unmountable(&self) -> Option<&dyn Unmountable> {
		None
	}
}

/// Renders the component as an element tree.
pub trait View {
	fn view(&self) -> Element;
}

/// A component that directly wraps an element.
pub trait ElementSource {
	fn element(&self) -> Element;
}

/// Renders the component as a raw markup string.
///
/// The markup is inserted verbatim. Its root should carry the component id,
/// otherwise the component cannot be updated or removed later.
pub trait HtmlRenderer {
	fn render_html(&self) -> String;
}

/// Enumerates child components declared outside the rendered markup.
pub trait ChildProvider {
	fn children(&self) -> Vec<ComponentRef>;
}

/// Called once after the component's markup is live.
///
/// Listeners registered through `cx.get(..)` are attributed to this component
/// and released when it is unmounted or re-rendered.
pub trait Mountable {
	fn on_mount(&self, cx: &MountContext<'_>);
}

/// Called after the component was re-rendered in place.
pub trait Updatable {
	fn on_update(&self, cx: &MountContext<'_>);
}

/// Called before the component's listeners and node are released.
pub trait Unmountable {
	fn on_unmount(&self);
}

/// Identity holder embedded in every component.
///
/// The id lives in a `RefCell` so the driver can assign one through a shared
/// `Rc` handle.
#[derive(Debug, Default)]
pub struct ComponentBase {
	id: RefCell<String>,
	prefix: Option<String>,
}

impl ComponentBase {
	/// Creates a base without an id; one is generated on first render.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a base with a fixed id.
	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: RefCell::new(id.into()),
			prefix: None,
		}
	}

	/// Creates a base whose generated id uses `prefix` instead of the
	/// session's component prefix.
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			id: RefCell::new(String::new()),
			prefix: Some(prefix.into()),
		}
	}

	pub fn id(&self) -> String {
		self.id.borrow().clone()
	}

	pub fn set_id(&self, id: &str) {
		*self.id.borrow_mut() = id.to_string();
	}

	pub fn has_id(&self) -> bool {
		!self.id.borrow().is_empty()
	}

	pub fn prefix(&self) -> Option<&str> {
		self.prefix.as_deref()
	}
}
