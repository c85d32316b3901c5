//! Markup renderer.
//!
//! Walks an element tree depth-first and produces a markup string. While
//! walking it collects:
//!
//! - every nested component, in document order, and which component it was
//!   rendered inside of;
//! - a pending event for every event binding, to be wired once the markup is
//!   live. A node with bindings but no id receives a generated one.
//!
//! The walk never touches the document. The only state it changes is the
//! session's id counter and the ids assigned to components that had none.

pub mod markers;

use std::fmt;
use std::rc::Rc;

use crate::builder::html::{Child, Element};
use crate::callback::EventHandler;
use crate::component::ComponentRef;
use crate::dom::DomOptions;

pub use markers::IdGenerator;

/// An event binding collected during rendering.
#[derive(Clone)]
pub struct PendingEvent {
	/// Component the listener is attributed to.
	pub owner: Option<String>,
	/// Id of the node the listener is attached to.
	pub target: String,
	/// Event name.
	pub event: String,
	/// The handler.
	pub handler: EventHandler,
}

impl fmt::Debug for PendingEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingEvent")
			.field("owner", &self.owner)
			.field("target", &self.target)
			.field("event", &self.event)
			.finish()
	}
}

/// Everything a render pass produced.
#[derive(Default)]
pub struct RenderOutput {
	/// The serialized markup.
	pub markup: String,
	/// Nested components in document order (the rendered root excluded).
	pub components: Vec<ComponentRef>,
	/// Direct child components per rendering component.
	pub children_by_owner: Vec<(String, Vec<ComponentRef>)>,
	/// Event bindings to wire after insertion.
	pub pending: Vec<PendingEvent>,
	/// Non-fatal anomalies noticed while rendering.
	pub warnings: Vec<String>,
}

impl RenderOutput {
	/// Returns the direct child components rendered inside `owner`.
	pub fn children_of(&self, owner: &str) -> Vec<ComponentRef> {
		self.children_by_owner
			.iter()
			.find(|(id, _)| id == owner)
			.map(|(_, children)| children.clone())
			.unwrap_or_default()
	}

	fn push_child(&mut self, owner: &str, child: ComponentRef) {
		match self.children_by_owner.iter_mut().find(|(id, _)| id == owner) {
			Some((_, children)) => children.push(child),
			None => self
				.children_by_owner
				.push((owner.to_string(), vec![child])),
		}
	}
}

impl fmt::Debug for RenderOutput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderOutput")
			.field("markup", &self.markup)
			.field("components", &self.components.len())
			.field("pending", &self.pending)
			.field("warnings", &self.warnings)
			.finish()
	}
}

/// Serializes elements and components for one document session.
pub struct MarkupRenderer<'a> {
	ids: &'a IdGenerator,
	options: &'a DomOptions,
}

impl<'a> MarkupRenderer<'a> {
	pub fn new(ids: &'a IdGenerator, options: &'a DomOptions) -> Self {
		Self { ids, options }
	}

	/// Assigns an id to the component if it has none and returns it.
	pub fn ensure_id(&self, component: &ComponentRef) -> String {
		let id = component.id();
		if !id.is_empty() {
			return id;
		}
		let prefix = component
			.base()
			.prefix()
			.unwrap_or(&self.options.id_prefix)
			.to_string();
		let id = self.ids.next(&prefix);
		component.set_id(&id);
		id
	}

	/// Renders a component and everything nested inside it.
	pub fn render_component(&self, component: &ComponentRef) -> RenderOutput {
		let mut out = RenderOutput::default();
		self.write_component(component, &mut out);
		out
	}

	/// Renders a bare element. Collected listeners are attributed to `owner`.
	pub fn render_element(&self, element: &Element, owner: Option<&str>) -> RenderOutput {
		let mut out = RenderOutput::default();
		self.write_element(element, None, owner, &mut out);
		out
	}

	fn write_component(&self, component: &ComponentRef, out: &mut RenderOutput) {
		let id = self.ensure_id(component);
		if let Some(view) = component.as_view() {
			self.write_root(&view.view(), &id, out);
		} else if let Some(source) = component.as_element() {
			self.write_root(&source.element(), &id, out);
		} else if let Some(html) = component.as_html() {
			out.markup.push_str(&html.render_html());
		}
	}

	fn write_root(&self, root: &Element, component_id: &str, out: &mut RenderOutput) {
		let root_id = match root.element_id() {
			None => component_id.to_string(),
			Some(explicit) => {
				if explicit != component_id {
					out.warnings.push(format!(
						"component {} renders a root with id {}; updates will not find it",
						component_id, explicit
					));
				}
				explicit.to_string()
			}
		};
		self.write_element(root, Some(&root_id), Some(component_id), out);
	}

	fn write_element(
		&self,
		element: &Element,
		forced_id: Option<&str>,
		owner: Option<&str>,
		out: &mut RenderOutput,
	) {
		let id = match (forced_id, element.element_id()) {
			(Some(id), _) | (None, Some(id)) => Some(id.to_string()),
			(None, None) if !element.events().is_empty() => {
				Some(self.ids.next(&self.options.auto_id_prefix))
			}
			(None, None) => None,
		};

		out.markup.push('<');
		out.markup.push_str(element.tag_name());
		if let Some(id) = &id {
			push_attr(&mut out.markup, "id", id);
		}
		if !element.classes().is_empty() {
			push_attr(&mut out.markup, "class", &element.classes().join(" "));
		}
		for (name, value) in element.attrs() {
			push_attr(&mut out.markup, name, value);
		}

		if let Some(target) = &id {
			for (event, handler) in element.events() {
				out.pending.push(PendingEvent {
					owner: owner.map(str::to_string),
					target: target.clone(),
					event: event.clone(),
					handler: Rc::clone(handler),
				});
			}
		}

		if element.is_void() {
			out.markup.push_str(" />");
			return;
		}
		out.markup.push('>');

		for child in element.child_nodes() {
			match child {
				Child::Text(text) => out.markup.push_str(&escape_text(text)),
				Child::Raw(raw) => out.markup.push_str(raw),
				Child::Element(nested) => self.write_element(nested, None, owner, out),
				Child::Component(component) => {
					out.components.push(Rc::clone(component));
					self.ensure_id(component);
					if let Some(owner) = owner {
						out.push_child(owner, Rc::clone(component));
					}
					self.write_component(component, out);
				}
			}
		}

		out.markup.push_str("</");
		out.markup.push_str(element.tag_name());
		out.markup.push('>');
	}
}

fn push_attr(markup: &mut String, name: &str, value: &str) {
	markup.push(' ');
	markup.push_str(name);
	markup.push_str("='");
	markup.push_str(&escape_attr(value));
	markup.push('\'');
}

/// Escapes a value for a single-quoted attribute.
pub fn escape_attr(value: &str) -> String {
	value.replace('&', "&amp;").replace('\'', "&#39;")
}

/// Escapes text content.
pub fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::html::{br, button, div, span};
	use crate::component::{Component, ComponentBase, HtmlRenderer, View};
	use crate::event::Event;
	use rstest::{fixture, rstest};

	struct Card {
		base: ComponentBase,
		root_id: Option<&'static str>,
	}

	impl View for Card {
		fn view(&self) -> Element {
			let root = div().class("card").child(button().text("x").on_click(|_: &Event| {}));
			match self.root_id {
				Some(id) => root.id(id),
				None => root,
			}
		}
	}

	impl Component for Card {
		fn base(&self) -> &ComponentBase {
			&self.base
		}

		fn as_view(&self) -> Option<&dyn View> {
			Some(self)
		}
	}

	struct Raw {
		base: ComponentBase,
	}

	impl HtmlRenderer for Raw {
		fn render_html(&self) -> String {
			format!("<p id='{}'>raw</p>", self.base.id())
		}
	}

	impl Component for Raw {
		fn base(&self) -> &ComponentBase {
			&self.base
		}

		fn as_html(&self) -> Option<&dyn HtmlRenderer> {
			Some(self)
		}
	}

	struct Blank {
		base: ComponentBase,
	}

	impl Component for Blank {
		fn base(&self) -> &ComponentBase {
			&self.base
		}
	}

	#[fixture]
	fn options() -> DomOptions {
		DomOptions::default()
	}

	fn input_el() -> Element {
		Element::new("input")
	}

	#[rstest]
	fn test_void_element_drops_children(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let out = renderer.render_element(&input_el().attr("type", "text").child("ignored"), None);
		assert_eq!(out.markup, "<input type='text' />");
	}

	#[rstest]
	fn test_auto_id_for_event_bearing_node(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let out = renderer.render_element(&button().on_click(|_: &Event| {}), Some("owner"));
		assert_eq!(out.markup, "<button id='auto-1'></button>");
		assert_eq!(out.pending.len(), 1);
		assert_eq!(out.pending[0].target, "auto-1");
		assert_eq!(out.pending[0].owner.as_deref(), Some("owner"));
	}

	#[rstest]
	fn test_component_id_stamped_on_root(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let card: ComponentRef = Rc::new(Card {
			base: ComponentBase::new(),
			root_id: None,
		});
		let out = renderer.render_component(&card);
		assert_eq!(card.id(), "dk-1");
		assert_eq!(
			out.markup,
			"<div id='dk-1' class='card'><button id='auto-2'>x</button></div>"
		);
		assert_eq!(out.pending[0].owner.as_deref(), Some("dk-1"));
		assert!(out.warnings.is_empty());
	}

	#[rstest]
	fn test_mismatched_root_id_is_kept_and_reported(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let card: ComponentRef = Rc::new(Card {
			base: ComponentBase::with_id("card"),
			root_id: Some("other"),
		});
		let out = renderer.render_component(&card);
		assert!(out.markup.starts_with("<div id='other'"));
		assert_eq!(out.warnings.len(), 1);
	}

	#[rstest]
	fn test_nested_components_are_collected_per_owner(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let raw: ComponentRef = Rc::new(Raw {
			base: ComponentBase::with_prefix("raw"),
		});
		let blank: ComponentRef = Rc::new(Blank {
			base: ComponentBase::with_id("blank"),
		});
		let outer = div()
			.id("outer")
			.child(raw.clone())
			.child(span().child(blank.clone()))
			.into_component();
		let outer: ComponentRef = outer;

		let out = renderer.render_component(&outer);

		assert_eq!(
			out.markup,
			"<div id='outer'><p id='raw-1'>raw</p><span></span></div>"
		);
		assert_eq!(out.components.len(), 2);
		let children: Vec<String> = out.children_of("outer").iter().map(|c| c.id()).collect();
		assert_eq!(children, vec!["raw-1".to_string(), "blank".to_string()]);
	}

	#[rstest]
	#[case("a & b", "a &amp; b")]
	#[case("<script>", "&lt;script&gt;")]
	fn test_escape_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_text(input), expected);
	}

	#[rstest]
	fn test_escape_attr() {
		assert_eq!(escape_attr("it's & done"), "it&#39;s &amp; done");
	}

	#[rstest]
	fn test_void_br_in_tree(options: DomOptions) {
		let ids = IdGenerator::new();
		let renderer = MarkupRenderer::new(&ids, &options);
		let out = renderer.render_element(&div().child(br()), None);
		assert_eq!(out.markup, "<div><br /></div>");
	}
}
