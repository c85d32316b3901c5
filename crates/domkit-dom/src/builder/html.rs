//! HTML Element Builder
//!
//! This module provides a fluent API for describing markup elements. An
//! [`Element`] is plain data: tag, id, classes, attributes, event bindings and
//! children. Nothing touches the document until the element is handed to the
//! renderer through [`Dom::render`](crate::Dom::render) or a component view.
//!
//! ## Design Pattern
//!
//! - **Fluent API**: Method chaining for readable construction
//! - **Deferred wiring**: Event bindings are collected by the renderer and
//!   attached only after the markup is live
//! - **Components as children**: Any [`ComponentRef`] can be nested

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::callback::{EventHandler, IntoEventHandler};
use crate::component::{Component, ComponentRef, ElementComponent};
use crate::dom::DomOptions;
use crate::render::{IdGenerator, MarkupRenderer};

/// Most elements have 0-2 event listeners in practice
const TYPICAL_EVENT_COUNT: usize = 2;

/// Returns `true` for tags that never have a closing tag or children.
pub fn is_void_tag(tag: &str) -> bool {
	matches!(
		tag,
		"area"
			| "base" | "br"
			| "col" | "embed"
			| "hr" | "img"
			| "input" | "link"
			| "meta" | "source"
			| "track" | "wbr"
	)
}

/// A child of an [`Element`].
#[derive(Clone)]
pub enum Child {
	/// Text content, escaped when serialized.
	Text(String),
	/// Markup inserted verbatim.
	Raw(String),
	/// A nested element.
	Element(Element),
	/// A nested component, mounted after insertion.
	Component(ComponentRef),
}

impl Child {
	/// Wraps a concrete component as a child.
	pub fn component<C: Component>(component: Rc<C>) -> Self {
		Self::Component(component)
	}
}

impl fmt::Debug for Child {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
			Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
			Self::Component(component) => f.debug_tuple("Component").field(&component.id()).finish(),
		}
	}
}

/// Conversion into an element [`Child`].
pub trait IntoChild {
	/// Converts self into a child node.
	fn into_child(self) -> Child;
}

impl IntoChild for Child {
	fn into_child(self) -> Child {
		self
	}
}

impl IntoChild for Element {
	fn into_child(self) -> Child {
		Child::Element(self)
	}
}

impl IntoChild for ComponentRef {
	fn into_child(self) -> Child {
		Child::Component(self)
	}
}

impl IntoChild for &str {
	fn into_child(self) -> Child {
		Child::Text(self.to_string())
	}
}

impl IntoChild for String {
	fn into_child(self) -> Child {
		Child::Text(self)
	}
}

impl IntoChild for &String {
	fn into_child(self) -> Child {
		Child::Text(self.clone())
	}
}

/// HTML element description with fluent API
///
/// ## Example
///
/// ```ignore
/// let button = button()
///     .class("btn btn-primary")
///     .id("submit-button")
///     .text("Submit")
///     .on_click(|_: &Event| info_log!("Clicked!"));
/// ```
#[derive(Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	id: Option<String>,
	classes: Vec<String>,
	attrs: Vec<(String, String)>,
	events: Vec<(String, EventHandler)>,
	children: Vec<Child>,
	is_void: bool,
}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("id", &self.id)
			.field("classes", &self.classes)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("is_void", &self.is_void)
			.field("event_handlers_count", &self.events.len())
			.finish()
	}
}

impl Element {
	/// Creates an element with the given tag.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = is_void_tag(&tag);
		Self {
			tag,
			id: None,
			classes: Vec::new(),
			attrs: Vec::new(),
			events: Vec::with_capacity(TYPICAL_EVENT_COUNT),
			children: Vec::new(),
			is_void,
		}
	}

	/// Set the id
	///
	/// ## Example
	///
	/// ```ignore
	/// div().id("main-content")
	/// ```
	pub fn id(mut self, id: impl Into<String>) -> Self {
		let id = id.into();
		self.id = if id.is_empty() { None } else { Some(id) };
		self
	}

	/// Add one or more classes
	///
	/// Whitespace-separated values add several classes. Classes keep the
	/// order in which they were added.
	///
	/// ## Example
	///
	/// ```ignore
	/// div().class("container").class("flex-row")
	/// ```
	pub fn class(mut self, class: &str) -> Self {
		self.classes
			.extend(class.split_whitespace().map(str::to_string));
		self
	}

	/// Set an attribute
	///
	/// A later value for the same name replaces the earlier one in place.
	/// `id` and `class` are routed to [`Element::id`] and the class list.
	///
	/// ## Example
	///
	/// ```ignore
	/// div().attr("data-test-id", "my-div")
	/// ```
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		let value = value.into();
		match name.as_str() {
			"id" => return self.id(value),
			"class" => {
				self.classes.clear();
				return self.class(&value);
			}
			_ => {}
		}
		match self.attrs.iter_mut().find(|(key, _)| *key == name) {
			Some(slot) => slot.1 = value,
			None => self.attrs.push((name, value)),
		}
		self
	}

	/// Set a boolean attribute (`disabled`, `required`, ...)
	pub fn bool_attr(self, name: impl Into<String>) -> Self {
		self.attr(name, "")
	}

	/// Remove an attribute
	pub fn remove_attr(mut self, name: &str) -> Self {
		self.attrs.retain(|(key, _)| key != name);
		self
	}

	/// Set the style attribute
	///
	/// ## Example
	///
	/// ```ignore
	/// div().style("color: red; font-size: 16px")
	/// ```
	pub fn style(self, style: impl Into<String>) -> Self {
		self.attr("style", style)
	}

	/// Add an event binding for any event type
	///
	/// The handler is attached after the element is inserted into the
	/// document. An element with bindings and no id receives a generated id.
	///
	/// ## Example
	///
	/// ```ignore
	/// button()
	///     .on("mouseenter", |_: &Event| info_log!("Mouse entered"))
	///     .on("mouseleave", |_: &Event| info_log!("Mouse left"))
	/// ```
	pub fn on(mut self, event: impl Into<String>, handler: impl IntoEventHandler) -> Self {
		self.events
			.push((event.into(), handler.into_event_handler()));
		self
	}

	/// Add a click event binding
	#[inline]
	pub fn on_click(self, handler: impl IntoEventHandler) -> Self {
		self.on("click", handler)
	}

	/// Add an input event binding
	#[inline]
	pub fn on_input(self, handler: impl IntoEventHandler) -> Self {
		self.on("input", handler)
	}

	/// Add a change event binding
	#[inline]
	pub fn on_change(self, handler: impl IntoEventHandler) -> Self {
		self.on("change", handler)
	}

	/// Add a submit event binding
	#[inline]
	pub fn on_submit(self, handler: impl IntoEventHandler) -> Self {
		self.on("submit", handler)
	}

	/// Add a keydown event binding
	#[inline]
	pub fn on_keydown(self, handler: impl IntoEventHandler) -> Self {
		self.on("keydown", handler)
	}

	/// Append a child
	///
	/// ## Example
	///
	/// ```ignore
	/// div()
	///     .child(p().text("First paragraph"))
	///     .child(p().text("Second paragraph"))
	/// ```
	pub fn child(mut self, child: impl IntoChild) -> Self {
		self.children.push(child.into_child());
		self
	}

	/// Append several children
	pub fn children<I, C>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = C>,
		C: IntoChild,
	{
		self.children
			.extend(children.into_iter().map(IntoChild::into_child));
		self
	}

	/// Append text content (escaped on output)
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.children.push(Child::Text(text.into()));
		self
	}

	/// Append raw markup (not escaped)
	pub fn raw(mut self, markup: impl Into<String>) -> Self {
		self.children.push(Child::Raw(markup.into()));
		self
	}

	/// Wraps this element as a component.
	pub fn into_component(self) -> Rc<ElementComponent> {
		Rc::new(ElementComponent::new(self))
	}

	/// Serializes the element without a document session.
	///
	/// Ids generated for event-bearing nodes use the default prefixes.
	pub fn render_to_string(&self) -> String {
		let ids = IdGenerator::new();
		let options = DomOptions::default();
		MarkupRenderer::new(&ids, &options)
			.render_element(self, None)
			.markup
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the explicit id, if any.
	pub fn element_id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// Returns the class list.
	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	/// Returns the attributes in insertion order.
	pub fn attrs(&self) -> &[(String, String)] {
		&self.attrs
	}

	/// Returns the value of an attribute.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Returns the event bindings.
	pub fn events(&self) -> &[(String, EventHandler)] {
		&self.events
	}

	/// Returns the children.
	pub fn child_nodes(&self) -> &[Child] {
		&self.children
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}

	/// Returns the components among the direct children.
	pub fn child_components(&self) -> Vec<ComponentRef> {
		self.children
			.iter()
			.filter_map(|child| match child {
				Child::Component(component) => Some(Rc::clone(component)),
				_ => None,
			})
			.collect()
	}
}

/// Macro for defining HTML element creation functions
macro_rules! define_element {
	($(#[$meta:meta])* $name:ident, $tag:literal) => {
		$(#[$meta])*
		pub fn $name() -> Element {
			Element::new($tag)
		}
	};
}

define_element!(
	/// Create a `<div>` element
	///
	/// ## Example
	///
	/// ```ignore
	/// let container = div()
	///     .class("container")
	///     .child(p().text("Content"));
	/// ```
	div, "div"
);

define_element!(
	/// Create a `<span>` element
	span, "span"
);

define_element!(
	/// Create a `<p>` element (paragraph)
	p, "p"
);

define_element!(
	/// Create a `<button>` element
	///
	/// ## Example
	///
	/// ```ignore
	/// let button = button()
	///     .text("Click me")
	///     .on_click(|_: &Event| info_log!("Clicked!"));
	/// ```
	button, "button"
);

define_element!(
	/// Create an `<a>` element
	a, "a"
);

define_element!(
	/// Create an `<img>` element (void)
	img, "img"
);

define_element!(
	/// Create a `<label>` element
	label, "label"
);

define_element!(
	/// Create a `<br>` element (void)
	br, "br"
);

define_element!(
	/// Create an `<hr>` element (void)
	hr, "hr"
);

define_element!(
	/// Create an `<option>` element
	option, "option"
);

// ============================================================================
// Headings
// ============================================================================

define_element!(
	/// Create an `<h1>` element
	h1, "h1"
);
define_element!(
	/// Create an `<h2>` element
	h2, "h2"
);
define_element!(
	/// Create an `<h3>` element
	h3, "h3"
);
define_element!(
	/// Create an `<h4>` element
	h4, "h4"
);
define_element!(
	/// Create an `<h5>` element
	h5, "h5"
);
define_element!(
	/// Create an `<h6>` element
	h6, "h6"
);

// ============================================================================
// Lists
// ============================================================================

define_element!(
	/// Create a `<ul>` element (unordered list)
	ul, "ul"
);
define_element!(
	/// Create an `<ol>` element (ordered list)
	ol, "ol"
);
define_element!(
	/// Create a `<li>` element (list item)
	li, "li"
);

// ============================================================================
// Sectioning
// ============================================================================

define_element!(
	/// Create a `<nav>` element
	nav, "nav"
);
define_element!(
	/// Create a `<section>` element
	section, "section"
);
define_element!(
	/// Create a `<header>` element
	header, "header"
);
define_element!(
	/// Create a `<footer>` element
	footer, "footer"
);
define_element!(
	/// Create a `<main>` element
	///
	/// Named `main_el` so it does not clash with `fn main`.
	main_el, "main"
);
define_element!(
	/// Create an `<article>` element
	article, "article"
);
define_element!(
	/// Create an `<aside>` element
	aside, "aside"
);

// ============================================================================
// Tables
// ============================================================================

define_element!(
	/// Create a `<table>` element
	table, "table"
);
define_element!(
	/// Create a `<thead>` element
	thead, "thead"
);
define_element!(
	/// Create a `<tbody>` element
	tbody, "tbody"
);
define_element!(
	/// Create a `<tr>` element
	tr, "tr"
);
define_element!(
	/// Create a `<th>` element
	th, "th"
);
define_element!(
	/// Create a `<td>` element
	td, "td"
);

// ============================================================================
// Inline text
// ============================================================================

define_element!(
	/// Create a `<strong>` element
	strong, "strong"
);
define_element!(
	/// Create an `<em>` element
	em, "em"
);
define_element!(
	/// Create a `<code>` element
	code, "code"
);
define_element!(
	/// Create a `<pre>` element
	pre, "pre"
);
define_element!(
	/// Create a `<small>` element
	small, "small"
);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::Event;
	use rstest::rstest;

	#[rstest]
	#[case("input", true)]
	#[case("br", true)]
	#[case("img", true)]
	#[case("div", false)]
	#[case("textarea", false)]
	fn test_void_tags(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(Element::new(tag.to_string()).is_void(), expected);
	}

	#[rstest]
	fn test_attr_last_write_wins_in_place() {
		let el = div()
			.attr("data-a", "1")
			.attr("title", "x")
			.attr("data-a", "2");
		assert_eq!(
			el.attrs(),
			&[
				("data-a".to_string(), "2".to_string()),
				("title".to_string(), "x".to_string())
			]
		);
	}

	#[rstest]
	fn test_attr_routes_id_and_class() {
		let el = div()
			.class("old")
			.attr("id", "main")
			.attr("class", "a b");
		assert_eq!(el.element_id(), Some("main"));
		assert_eq!(el.classes(), &["a".to_string(), "b".to_string()]);
		assert!(el.attrs().is_empty());
	}

	#[rstest]
	fn test_empty_id_clears() {
		assert_eq!(div().id("x").id("").element_id(), None);
	}

	#[rstest]
	fn test_remove_attr() {
		let el = button().bool_attr("disabled").remove_attr("disabled");
		assert_eq!(el.get_attr("disabled"), None);
	}

	#[rstest]
	fn test_event_shortcuts() {
		let el = input_like()
			.on_input(|_: &Event| {})
			.on_change(|_: &Event| {});
		let names: Vec<&str> = el.events().iter().map(|(n, _)| n.as_str()).collect();
		assert_eq!(names, vec!["input", "change"]);
	}

	fn input_like() -> Element {
		Element::new("input")
	}

	#[rstest]
	fn test_children_and_components() {
		let inner = span().text("x").into_component();
		let el = div()
			.child("hello")
			.child(p())
			.child(Child::component(inner))
			.children(vec!["a", "b"]);
		assert_eq!(el.child_nodes().len(), 5);
		assert_eq!(el.child_components().len(), 1);
	}

	#[rstest]
	fn test_render_to_string() {
		let el = div()
			.id("root")
			.class("box")
			.attr("title", "it's")
			.child(span().text("a < b"))
			.child(br());
		assert_eq!(
			el.render_to_string(),
			"<div id='root' class='box' title='it&#39;s'><span>a &lt; b</span><br /></div>"
		);
	}

	#[rstest]
	fn test_main_el_tag() {
		assert_eq!(main_el().tag_name(), "main");
	}
}
