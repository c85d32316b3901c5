//! In-memory host document.
//!
//! [`MemoryDocument`] keeps an arena of element and text nodes behind a
//! `RefCell`. Markup is parsed with html5ever into an `RcDom` and converted
//! into the arena. Node keys are never reused, so a node replaced through
//! `set_outer_html` always comes back with a new handle.
//!
//! Besides the [`HostDocument`] operations it offers what tests need to drive
//! a page: serialization, synchronous event dispatch with bubbling, form
//! input helpers, focus tracking and listener accounting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::{HashHandler, HostDocument, ListenerHandle, NodeHandle};
use crate::builder::html::is_void_tag;
use crate::callback::EventHandler;
use crate::error::{DomError, Result};
use crate::event::{Event, SyntheticEvent};
use crate::render::escape_text;

/// Stable key of a node inside a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

#[derive(Debug)]
enum NodeData {
	Element(ElementData),
	Text(String),
}

#[derive(Debug, Default)]
struct ElementData {
	tag: String,
	attrs: Vec<(String, String)>,
	// Form state set through the property API; `None` falls back to markup.
	value: Option<String>,
	checked: Option<bool>,
}

impl ElementData {
	fn attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}
}

#[derive(Debug)]
struct Node {
	data: NodeData,
	parent: Option<NodeKey>,
	children: Vec<NodeKey>,
}

struct Listener {
	id: u64,
	node: NodeKey,
	event: String,
	handler: EventHandler,
}

/// A node tree produced by the parser, not yet in the arena.
enum Parsed {
	Element {
		tag: String,
		attrs: Vec<(String, String)>,
		children: Vec<Parsed>,
	},
	Text(String),
}

struct State {
	nodes: HashMap<NodeKey, Node>,
	next_key: u64,
	html: NodeKey,
	head: NodeKey,
	body: NodeKey,
	listeners: Vec<Listener>,
	hash_listeners: Vec<(u64, HashHandler)>,
	next_listener: u64,
	focused: Option<NodeKey>,
	hash: String,
}

impl State {
	fn new() -> Self {
		let mut state = Self {
			nodes: HashMap::new(),
			next_key: 0,
			html: NodeKey(0),
			head: NodeKey(0),
			body: NodeKey(0),
			listeners: Vec::new(),
			hash_listeners: Vec::new(),
			next_listener: 0,
			focused: None,
			hash: String::new(),
		};
		let html = state.create(NodeData::Element(element_data("html")), None);
		let head = state.create(NodeData::Element(element_data("head")), Some(html));
		let body = state.create(NodeData::Element(element_data("body")), Some(html));
		state.html = html;
		state.head = head;
		state.body = body;
		state
	}

	fn create(&mut self, data: NodeData, parent: Option<NodeKey>) -> NodeKey {
		self.next_key += 1;
		let key = NodeKey(self.next_key);
		self.nodes.insert(
			key,
			Node {
				data,
				parent,
				children: Vec::new(),
			},
		);
		if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
			parent.children.push(key);
		}
		key
	}

	fn insert(&mut self, parsed: Parsed, parent: NodeKey) -> NodeKey {
		match parsed {
			Parsed::Text(text) => self.create(NodeData::Text(text), Some(parent)),
			Parsed::Element {
				tag,
				attrs,
				children,
			} => {
				let key = self.create(
					NodeData::Element(ElementData {
						tag,
						attrs,
						..ElementData::default()
					}),
					Some(parent),
				);
				for child in children {
					self.insert(child, key);
				}
				key
			}
		}
	}

	fn element(&self, key: NodeKey) -> Option<&ElementData> {
		match &self.nodes.get(&key)?.data {
			NodeData::Element(el) => Some(el),
			NodeData::Text(_) => None,
		}
	}

	fn element_mut(&mut self, key: NodeKey) -> Result<&mut ElementData> {
		match self.nodes.get_mut(&key).map(|node| &mut node.data) {
			Some(NodeData::Element(el)) => Ok(el),
			_ => Err(detached()),
		}
	}

	fn is_connected(&self, key: NodeKey) -> bool {
		let mut current = Some(key);
		while let Some(k) = current {
			if k == self.html {
				return true;
			}
			current = self.nodes.get(&k).and_then(|node| node.parent);
		}
		false
	}

	/// Drops a node and its descendants from the arena. Listeners stay
	/// registered until they are removed explicitly.
	fn drop_subtree(&mut self, key: NodeKey) {
		if let Some(node) = self.nodes.remove(&key) {
			if self.focused == Some(key) {
				self.focused = None;
			}
			for child in node.children {
				self.drop_subtree(child);
			}
		}
	}

	fn clear_children(&mut self, key: NodeKey) -> Result<()> {
		let children = match self.nodes.get_mut(&key) {
			Some(node) => std::mem::take(&mut node.children),
			None => return Err(detached()),
		};
		for child in children {
			self.drop_subtree(child);
		}
		Ok(())
	}

	fn descendants(&self, key: NodeKey, out: &mut Vec<NodeKey>) {
		if let Some(node) = self.nodes.get(&key) {
			for child in &node.children {
				out.push(*child);
				self.descendants(*child, out);
			}
		}
	}

	/// Elements in document order, `<html>` first.
	fn elements(&self) -> Vec<NodeKey> {
		let mut all = vec![self.html];
		self.descendants(self.html, &mut all);
		all.retain(|key| self.element(*key).is_some());
		all
	}

	fn text_content(&self, key: NodeKey) -> String {
		let mut out = String::new();
		self.collect_text(key, &mut out);
		out
	}

	fn collect_text(&self, key: NodeKey, out: &mut String) {
		if let Some(node) = self.nodes.get(&key) {
			match &node.data {
				NodeData::Text(text) => out.push_str(text),
				NodeData::Element(_) => {
					for child in &node.children {
						self.collect_text(*child, out);
					}
				}
			}
		}
	}

	fn write_node(&self, key: NodeKey, out: &mut String) {
		let Some(node) = self.nodes.get(&key) else {
			return;
		};
		match &node.data {
			NodeData::Text(text) => out.push_str(&escape_text(text)),
			NodeData::Element(el) => {
				out.push('<');
				out.push_str(&el.tag);
				for (name, value) in &el.attrs {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
					out.push('"');
				}
				out.push('>');
				if is_void_tag(&el.tag) {
					return;
				}
				for child in &node.children {
					self.write_node(*child, out);
				}
				out.push_str("</");
				out.push_str(&el.tag);
				out.push('>');
			}
		}
	}

	fn form_value(&self, key: NodeKey) -> String {
		let Some(el) = self.element(key) else {
			return String::new();
		};
		if let Some(value) = &el.value {
			return value.clone();
		}
		match el.tag.as_str() {
			"textarea" => self.text_content(key),
			"select" => self.selected_option_value(key),
			_ => el.attr("value").unwrap_or_default().to_string(),
		}
	}

	fn selected_option_value(&self, select: NodeKey) -> String {
		let mut options = Vec::new();
		self.descendants(select, &mut options);
		options.retain(|key| self.element(*key).is_some_and(|el| el.tag == "option"));
		let chosen = options
			.iter()
			.find(|key| self.element(**key).is_some_and(|el| el.attr("selected").is_some()))
			.or_else(|| options.first());
		match chosen {
			Some(key) => match self.element(*key).and_then(|el| el.attr("value")) {
				Some(value) => value.to_string(),
				None => self.text_content(*key),
			},
			None => String::new(),
		}
	}

	fn form_checked(&self, key: NodeKey) -> bool {
		self.element(key)
			.map(|el| el.checked.unwrap_or_else(|| el.attr("checked").is_some()))
			.unwrap_or(false)
	}
}

fn element_data(tag: &str) -> ElementData {
	ElementData {
		tag: tag.to_string(),
		..ElementData::default()
	}
}

fn detached() -> DomError {
	DomError::Host("node is not in the document".to_string())
}

fn parse_fragment(markup: &str) -> Vec<Parsed> {
	let dom = parse_document(RcDom::default(), Default::default()).one(markup);
	let mut out = Vec::new();
	for html in dom.document.children.borrow().iter() {
		if !is_element(html, "html") {
			continue;
		}
		// Content html5ever hoists into <head> keeps its position before the
		// body content.
		for section in html.children.borrow().iter() {
			if is_element(section, "head") || is_element(section, "body") {
				for child in section.children.borrow().iter() {
					out.extend(convert(child));
				}
			}
		}
	}
	out
}

fn is_element(handle: &Handle, tag: &str) -> bool {
	matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

fn convert(handle: &Handle) -> Option<Parsed> {
	match &handle.data {
		RcNodeData::Element { name, attrs, .. } => Some(Parsed::Element {
			tag: name.local.to_string(),
			attrs: attrs
				.borrow()
				.iter()
				.map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
				.collect(),
			children: handle.children.borrow().iter().filter_map(convert).collect(),
		}),
		RcNodeData::Text { contents } => Some(Parsed::Text(contents.borrow().to_string())),
		_ => None,
	}
}

/// A compound selector: `tag#id.class[attr=value]`.
#[derive(Debug, Default)]
struct Selector {
	tag: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
	attrs: Vec<(String, Option<String>)>,
}

impl Selector {
	fn parse(input: &str) -> Option<Self> {
		let input = input.trim();
		if input.is_empty() {
			return None;
		}
		let is_delimiter = |ch: char| matches!(ch, '#' | '.' | '[');
		let mut selector = Self::default();
		let tag_end = input.find(is_delimiter).unwrap_or(input.len());
		let tag = &input[..tag_end];
		if tag.contains(char::is_whitespace) {
			// combinators are not supported
			return None;
		}
		if !tag.is_empty() && tag != "*" {
			selector.tag = Some(tag.to_ascii_lowercase());
		}
		let mut rest = &input[tag_end..];
		while let Some(first) = rest.chars().next() {
			match first {
				'#' | '.' => {
					let body = &rest[1..];
					let end = body.find(is_delimiter).unwrap_or(body.len());
					let name = &body[..end];
					if name.is_empty() {
						return None;
					}
					if first == '#' {
						selector.id = Some(name.to_string());
					} else {
						selector.classes.push(name.to_string());
					}
					rest = &body[end..];
				}
				'[' => {
					let close = rest.find(']')?;
					let inner = &rest[1..close];
					let attr = match inner.split_once('=') {
						Some((name, value)) => (
							name.trim().to_string(),
							Some(value.trim().trim_matches(['"', '\'']).to_string()),
						),
						None => (inner.trim().to_string(), None),
					};
					selector.attrs.push(attr);
					rest = &rest[close + 1..];
				}
				_ => return None,
			}
		}
		Some(selector)
	}

	fn matches(&self, el: &ElementData) -> bool {
		if self.tag.as_deref().is_some_and(|tag| tag != el.tag) {
			return false;
		}
		if let Some(id) = &self.id
			&& el.attr("id") != Some(id.as_str())
		{
			return false;
		}
		let classes: Vec<&str> = el.attr("class").unwrap_or_default().split_whitespace().collect();
		if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
			return false;
		}
		self.attrs.iter().all(|(name, expected)| match (el.attr(name), expected) {
			(Some(_), None) => true,
			(Some(actual), Some(expected)) => actual == expected,
			(None, _) => false,
		})
	}
}

/// In-process document for native targets and tests.
///
/// ## Example
///
/// ```ignore
/// let doc = Rc::new(MemoryDocument::with_body("<div id='app'></div>"));
/// let dom = Dom::new(doc.clone());
/// dom.render("app", counter)?;
/// doc.click("counter-btn")?;
/// assert_eq!(doc.text_by_id("counter-val").as_deref(), Some("1"));
/// ```
pub struct MemoryDocument {
	state: RefCell<State>,
}

impl Default for MemoryDocument {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for MemoryDocument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryDocument")
			.field("nodes", &state.nodes.len())
			.field("listeners", &state.listeners.len())
			.field("hash", &state.hash)
			.finish()
	}
}

impl MemoryDocument {
	/// Creates an empty document (`<html><head></head><body></body></html>`).
	pub fn new() -> Self {
		Self {
			state: RefCell::new(State::new()),
		}
	}

	/// Creates a document whose body holds the given markup.
	pub fn with_body(markup: &str) -> Self {
		let doc = Self::new();
		{
			let mut state = doc.state.borrow_mut();
			let body = state.body;
			for parsed in parse_fragment(markup) {
				state.insert(parsed, body);
			}
		}
		doc
	}

	fn key(node: &NodeHandle) -> Result<NodeKey> {
		match node {
			NodeHandle::Memory(key) => Ok(*key),
			#[cfg(target_arch = "wasm32")]
			NodeHandle::Web(_) => Err(DomError::Host(
				"browser node passed to a memory document".to_string(),
			)),
		}
	}

	fn resolve(&self, id: &str) -> Result<NodeKey> {
		match self.element_by_id(id) {
			Some(NodeHandle::Memory(key)) => Ok(key),
			_ => Err(DomError::Host(format!("no element with id {}", id))),
		}
	}

	/// Serializes the content of a node.
	pub fn inner_html(&self, node: &NodeHandle) -> String {
		let state = self.state.borrow();
		let mut out = String::new();
		if let Ok(key) = Self::key(node)
			&& let Some(n) = state.nodes.get(&key)
		{
			for child in &n.children {
				state.write_node(*child, &mut out);
			}
		}
		out
	}

	/// Serializes a node including its own tag.
	pub fn outer_html(&self, node: &NodeHandle) -> String {
		let state = self.state.borrow();
		let mut out = String::new();
		if let Ok(key) = Self::key(node) {
			state.write_node(key, &mut out);
		}
		out
	}

	/// Concatenated text of a node and its descendants.
	pub fn text_content(&self, node: &NodeHandle) -> String {
		match Self::key(node) {
			Ok(key) => self.state.borrow().text_content(key),
			Err(_) => String::new(),
		}
	}

	/// Serializes the body content.
	pub fn body_html(&self) -> String {
		let body = NodeHandle::Memory(self.state.borrow().body);
		self.inner_html(&body)
	}

	/// Serializes the content of the element with the given id.
	pub fn inner_html_by_id(&self, id: &str) -> Option<String> {
		self.element_by_id(id).map(|node| self.inner_html(&node))
	}

	/// Text content of the element with the given id.
	pub fn text_by_id(&self, id: &str) -> Option<String> {
		self.element_by_id(id).map(|node| self.text(&node))
	}

	/// Dispatches an event at a node and bubbles it to the root.
	///
	/// Returns `false` if a listener prevented the default action.
	pub fn dispatch(&self, node: &NodeHandle, event: &str) -> Result<bool> {
		let key = Self::key(node)?;
		let (path, synthetic) = {
			let state = self.state.borrow();
			let Some(el) = state.element(key) else {
				return Err(detached());
			};
			let mut path = vec![key];
			let mut current = state.nodes.get(&key).and_then(|n| n.parent);
			while let Some(parent) = current {
				path.push(parent);
				current = state.nodes.get(&parent).and_then(|n| n.parent);
			}
			let synthetic = SyntheticEvent::new(event).with_target(
				el.attr("id").unwrap_or_default(),
				state.form_value(key),
				state.form_checked(key),
			);
			(path, Rc::new(synthetic))
		};
		let dispatched = Event::from_synthetic(Rc::clone(&synthetic));
		for key in path {
			// Clone the handlers out so listeners may mutate the document.
			let handlers: Vec<(u64, EventHandler)> = self
				.state
				.borrow()
				.listeners
				.iter()
				.filter(|l| l.node == key && l.event == event)
				.map(|l| (l.id, Rc::clone(&l.handler)))
				.collect();
			for (id, handler) in handlers {
				// A listener removed by an earlier one does not fire.
				let live = self.state.borrow().listeners.iter().any(|l| l.id == id);
				if live {
					handler(&dispatched);
				}
			}
			if synthetic.propagation_stopped() {
				break;
			}
		}
		Ok(!synthetic.default_prevented())
	}

	/// Dispatches an event at the element with the given id.
	pub fn dispatch_by_id(&self, id: &str, event: &str) -> Result<bool> {
		let key = self.resolve(id)?;
		self.dispatch(&NodeHandle::Memory(key), event)
	}

	/// Clicks the element with the given id.
	///
	/// Checkboxes toggle and radios become checked before listeners run; the
	/// change is reverted if a listener prevents the default action.
	pub fn click(&self, id: &str) -> Result<bool> {
		let key = self.resolve(id)?;
		let node = NodeHandle::Memory(key);
		let kind = self
			.attribute(&node, "type")
			.filter(|_| self.state.borrow().element(key).is_some_and(|el| el.tag == "input"));
		let before = self.checked(&node);
		match kind.as_deref() {
			Some("checkbox") => self.set_checked(&node, !before)?,
			Some("radio") => self.set_checked(&node, true)?,
			_ => {}
		}
		let proceed = self.dispatch(&node, "click")?;
		if !proceed && matches!(kind.as_deref(), Some("checkbox" | "radio")) {
			// the listener may have replaced the node
			if self.is_connected(&node) {
				self.set_checked(&node, before)?;
			}
		}
		Ok(proceed)
	}

	/// Sets the value of a form control and dispatches `input`.
	pub fn input_value(&self, id: &str, value: &str) -> Result<bool> {
		let key = self.resolve(id)?;
		let node = NodeHandle::Memory(key);
		self.set_value(&node, value)?;
		self.dispatch(&node, "input")
	}

	/// Number of live listeners in the document.
	pub fn listener_count(&self) -> usize {
		self.state.borrow().listeners.len()
	}

	/// Number of live listeners for `event` on the element with the given id.
	pub fn listeners_on(&self, id: &str, event: &str) -> usize {
		let Ok(key) = self.resolve(id) else {
			return 0;
		};
		self.state
			.borrow()
			.listeners
			.iter()
			.filter(|l| l.node == key && l.event == event)
			.count()
	}

	/// Number of hash-change subscribers.
	pub fn hash_listener_count(&self) -> usize {
		self.state.borrow().hash_listeners.len()
	}

	/// Id of the focused element, if any.
	pub fn active_element_id(&self) -> Option<String> {
		let state = self.state.borrow();
		let key = state.focused?;
		state.element(key)?.attr("id").map(str::to_string)
	}

	/// Number of nodes in the document, roots included.
	pub fn node_count(&self) -> usize {
		self.state.borrow().nodes.len()
	}
}

impl HostDocument for MemoryDocument {
	fn element_by_id(&self, id: &str) -> Option<NodeHandle> {
		if id.is_empty() {
			return None;
		}
		let state = self.state.borrow();
		state
			.elements()
			.into_iter()
			.find(|key| state.element(*key).and_then(|el| el.attr("id")) == Some(id))
			.map(NodeHandle::Memory)
	}

	fn body(&self) -> Option<NodeHandle> {
		Some(NodeHandle::Memory(self.state.borrow().body))
	}

	fn head(&self) -> Option<NodeHandle> {
		Some(NodeHandle::Memory(self.state.borrow().head))
	}

	fn is_connected(&self, node: &NodeHandle) -> bool {
		Self::key(node).is_ok_and(|key| self.state.borrow().is_connected(key))
	}

	fn set_inner_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		let key = Self::key(node)?;
		let parsed = parse_fragment(markup);
		let mut state = self.state.borrow_mut();
		state.element(key).ok_or_else(detached)?;
		state.clear_children(key)?;
		for p in parsed {
			state.insert(p, key);
		}
		Ok(())
	}

	fn set_outer_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		let key = Self::key(node)?;
		let parsed = parse_fragment(markup);
		let mut state = self.state.borrow_mut();
		let parent = state
			.nodes
			.get(&key)
			.ok_or_else(detached)?
			.parent
			.ok_or_else(|| DomError::Host("cannot replace a root node".to_string()))?;
		let position = state
			.nodes
			.get(&parent)
			.and_then(|p| p.children.iter().position(|c| *c == key))
			.ok_or_else(detached)?;
		let inserted: Vec<NodeKey> = parsed.into_iter().map(|p| state.insert(p, parent)).collect();
		if let Some(p) = state.nodes.get_mut(&parent) {
			// insert() appended; move the new nodes into the old one's slot
			p.children.retain(|c| !inserted.contains(c) && *c != key);
			for (offset, new) in inserted.iter().enumerate() {
				p.children.insert(position + offset, *new);
			}
		}
		state.drop_subtree(key);
		Ok(())
	}

	fn append_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		let key = Self::key(node)?;
		let parsed = parse_fragment(markup);
		let mut state = self.state.borrow_mut();
		state.element(key).ok_or_else(detached)?;
		for p in parsed {
			state.insert(p, key);
		}
		Ok(())
	}

	fn remove(&self, node: &NodeHandle) -> Result<()> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		let root = key == state.html || key == state.head || key == state.body;
		if root {
			return Err(DomError::Host("cannot remove a root node".to_string()));
		}
		let parent = state.nodes.get(&key).ok_or_else(detached)?.parent;
		if let Some(p) = parent.and_then(|p| state.nodes.get_mut(&p)) {
			p.children.retain(|c| *c != key);
		}
		state.drop_subtree(key);
		Ok(())
	}

	fn add_listener(
		&self,
		node: &NodeHandle,
		event: &str,
		handler: EventHandler,
	) -> Result<ListenerHandle> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		state.element(key).ok_or_else(detached)?;
		state.next_listener += 1;
		let id = state.next_listener;
		state.listeners.push(Listener {
			id,
			node: key,
			event: event.to_string(),
			handler,
		});
		Ok(ListenerHandle::Memory(id))
	}

	fn remove_listener(&self, _node: &NodeHandle, _event: &str, handle: ListenerHandle) {
		match handle {
			ListenerHandle::Memory(id) => self.state.borrow_mut().listeners.retain(|l| l.id != id),
			#[cfg(target_arch = "wasm32")]
			ListenerHandle::Web(_) => {}
		}
	}

	fn attribute(&self, node: &NodeHandle, name: &str) -> Option<String> {
		let key = Self::key(node).ok()?;
		self.state
			.borrow()
			.element(key)?
			.attr(name)
			.map(str::to_string)
	}

	fn set_attribute(&self, node: &NodeHandle, name: &str, value: &str) -> Result<()> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		let el = state.element_mut(key)?;
		match el.attrs.iter_mut().find(|(k, _)| k == name) {
			Some(slot) => slot.1 = value.to_string(),
			None => el.attrs.push((name.to_string(), value.to_string())),
		}
		Ok(())
	}

	fn remove_attribute(&self, node: &NodeHandle, name: &str) -> Result<()> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		state.element_mut(key)?.attrs.retain(|(k, _)| k != name);
		Ok(())
	}

	fn value(&self, node: &NodeHandle) -> String {
		match Self::key(node) {
			Ok(key) => self.state.borrow().form_value(key),
			Err(_) => String::new(),
		}
	}

	fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()> {
		let key = Self::key(node)?;
		self.state.borrow_mut().element_mut(key)?.value = Some(value.to_string());
		Ok(())
	}

	fn checked(&self, node: &NodeHandle) -> bool {
		Self::key(node).is_ok_and(|key| self.state.borrow().form_checked(key))
	}

	fn set_checked(&self, node: &NodeHandle, checked: bool) -> Result<()> {
		let key = Self::key(node)?;
		self.state.borrow_mut().element_mut(key)?.checked = Some(checked);
		Ok(())
	}

	fn text(&self, node: &NodeHandle) -> String {
		self.text_content(node)
	}

	fn set_text(&self, node: &NodeHandle, text: &str) -> Result<()> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		state.element(key).ok_or_else(detached)?;
		state.clear_children(key)?;
		if !text.is_empty() {
			state.create(NodeData::Text(text.to_string()), Some(key));
		}
		Ok(())
	}

	fn focus(&self, node: &NodeHandle) -> Result<()> {
		let key = Self::key(node)?;
		let mut state = self.state.borrow_mut();
		if !state.is_connected(key) {
			return Err(detached());
		}
		state.focused = Some(key);
		Ok(())
	}

	fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
		let selectors: Vec<Selector> = selector.split(',').filter_map(Selector::parse).collect();
		if selectors.is_empty() {
			return Vec::new();
		}
		let state = self.state.borrow();
		state
			.elements()
			.into_iter()
			.filter(|key| {
				state
					.element(*key)
					.is_some_and(|el| selectors.iter().any(|s| s.matches(el)))
			})
			.map(NodeHandle::Memory)
			.collect()
	}

	fn location_hash(&self) -> String {
		self.state.borrow().hash.clone()
	}

	fn set_location_hash(&self, hash: &str) {
		let normalized = match hash.trim_start_matches('#') {
			"" => String::new(),
			rest => format!("#{}", rest),
		};
		let handlers: Vec<HashHandler> = {
			let mut state = self.state.borrow_mut();
			if state.hash == normalized {
				return;
			}
			state.hash = normalized.clone();
			state.hash_listeners.iter().map(|(_, h)| Rc::clone(h)).collect()
		};
		for handler in handlers {
			handler(normalized.clone());
		}
	}

	fn on_hash_change(&self, handler: HashHandler) -> Result<ListenerHandle> {
		let mut state = self.state.borrow_mut();
		state.next_listener += 1;
		let id = state.next_listener;
		state.hash_listeners.push((id, handler));
		Ok(ListenerHandle::Memory(id))
	}

	fn remove_hash_listener(&self, handle: ListenerHandle) {
		match handle {
			ListenerHandle::Memory(id) => self
				.state
				.borrow_mut()
				.hash_listeners
				.retain(|(listener, _)| *listener != id),
			#[cfg(target_arch = "wasm32")]
			ListenerHandle::Web(_) => {}
		}
	}
}
