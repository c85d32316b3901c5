//! An element used directly as a component.

use std::fmt;

use super::traits::{ChildProvider, Component, ComponentBase, ComponentRef, ElementSource};
use crate::builder::html::Element;

/// Wraps an [`Element`] so it can be rendered, updated and unmounted like
/// any other component.
///
/// The element's explicit id, if any, becomes the component id. Components
/// nested as direct children are reported as declared children.
pub struct ElementComponent {
	base: ComponentBase,
	element: Element,
}

impl ElementComponent {
	pub fn new(element: Element) -> Self {
		let base = match element.element_id() {
			Some(id) => ComponentBase::with_id(id),
			None => ComponentBase::new(),
		};
		Self { base, element }
	}

	pub fn inner(&self) -> &Element {
		&self.element
	}
}

impl fmt::Debug for ElementComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementComponent")
			.field("id", &self.base.id())
			.field("element", &self.element)
			.finish()
	}
}

impl ElementSource for ElementComponent {
	fn element(&self) -> Element {
		self.element.clone().id(self.base.id())
	}
}

impl ChildProvider for ElementComponent {
	fn children(&self) -> Vec<ComponentRef> {
		self.element.child_components()
	}
}

impl Component for ElementComponent {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_element(&self) -> Option<&dyn ElementSource> {
		Some(self)
	}

	fn as_parent(&self) -> Option<&dyn ChildProvider> {
		Some(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::html::{Child, div, span};
	use rstest::rstest;

	#[rstest]
	fn test_explicit_id_becomes_component_id() {
		let component = div().id("panel").into_component();
		assert_eq!(component.id(), "panel");
	}

	#[rstest]
	fn test_assigned_id_is_stamped_on_element() {
		let component = div().into_component();
		component.set_id("dk-9");
		let element = component.as_element().map(ElementSource::element);
		assert_eq!(element.and_then(|el| el.element_id().map(str::to_string)), Some("dk-9".to_string()));
	}

	#[rstest]
	fn test_declared_children() {
		let inner = span().into_component();
		let outer = div().child(Child::component(inner)).into_component();
		let children = outer.as_parent().map(ChildProvider::children).unwrap_or_default();
		assert_eq!(children.len(), 1);
	}
}
