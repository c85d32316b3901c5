//! Live element handle bound to a document session.

use std::fmt;

use super::Dom;
use crate::callback::IntoEventHandler;
use crate::error::Result;
use crate::host::NodeHandle;

/// A resolved node together with the session it belongs to.
///
/// Listeners added through [`ElementRef::on`] are keyed `id::event` and
/// attributed to the element's owner, the component whose mount or update
/// hook resolved it. Elements obtained outside a hook have no owner.
#[derive(Clone)]
pub struct ElementRef {
	node: NodeHandle,
	dom: Dom,
	id: String,
	owner: Option<String>,
}

impl fmt::Debug for ElementRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementRef")
			.field("id", &self.id)
			.field("owner", &self.owner)
			.field("node", &self.node)
			.finish()
	}
}

impl ElementRef {
	pub(crate) fn new(node: NodeHandle, dom: Dom, id: impl Into<String>, owner: Option<String>) -> Self {
		Self {
			node,
			dom,
			id: id.into(),
			owner,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn owner(&self) -> Option<&str> {
		self.owner.as_deref()
	}

	pub fn node(&self) -> &NodeHandle {
		&self.node
	}

	/// Attributes listeners added through this handle to `owner`.
	pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
		self.owner = Some(owner.into());
		self
	}

	/// Registers a listener for `event`.
	///
	/// A listener already live under the same key is detached first.
	pub fn on(&self, event: &str, handler: impl IntoEventHandler) -> Result<()> {
		self.dom.attach(
			&self.node,
			&self.id,
			event,
			handler.into_event_handler(),
			self.owner.as_deref(),
		)
	}

	pub fn on_click(&self, handler: impl IntoEventHandler) -> Result<()> {
		self.on("click", handler)
	}

	pub fn attribute(&self, name: &str) -> Option<String> {
		self.dom.host().attribute(&self.node, name)
	}

	pub fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
		self.dom.host().set_attribute(&self.node, name, value)
	}

	pub fn remove_attribute(&self, name: &str) -> Result<()> {
		self.dom.host().remove_attribute(&self.node, name)
	}

	/// Current form value.
	pub fn value(&self) -> String {
		self.dom.host().value(&self.node)
	}

	pub fn set_value(&self, value: &str) -> Result<()> {
		self.dom.host().set_value(&self.node, value)
	}

	/// Current checked state.
	pub fn checked(&self) -> bool {
		self.dom.host().checked(&self.node)
	}

	pub fn set_checked(&self, checked: bool) -> Result<()> {
		self.dom.host().set_checked(&self.node, checked)
	}

	pub fn text(&self) -> String {
		self.dom.host().text(&self.node)
	}

	pub fn set_text(&self, text: &str) -> Result<()> {
		self.dom.host().set_text(&self.node, text)
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.attribute("class")
			.is_some_and(|list| list.split_whitespace().any(|c| c == class))
	}

	pub fn add_class(&self, class: &str) -> Result<()> {
		if self.has_class(class) {
			return Ok(());
		}
		let mut classes = self.classes();
		classes.push(class.to_string());
		self.set_attribute("class", &classes.join(" "))
	}

	pub fn remove_class(&self, class: &str) -> Result<()> {
		let classes: Vec<String> = self
			.classes()
			.into_iter()
			.filter(|c| c != class)
			.collect();
		self.set_attribute("class", &classes.join(" "))
	}

	/// Flips a class and returns whether it is now present.
	pub fn toggle_class(&self, class: &str) -> Result<bool> {
		if self.has_class(class) {
			self.remove_class(class)?;
			Ok(false)
		} else {
			self.add_class(class)?;
			Ok(true)
		}
	}

	fn classes(&self) -> Vec<String> {
		self.attribute("class")
			.map(|list| list.split_whitespace().map(str::to_string).collect())
			.unwrap_or_default()
	}

	pub fn focus(&self) -> Result<()> {
		self.dom.host().focus(&self.node)
	}

	/// Removes the node from the document and drops its cache entry.
	///
	/// Listeners stay registered with their owner and are released when the
	/// owner is unmounted.
	pub fn remove(self) -> Result<()> {
		self.dom.host().remove(&self.node)?;
		self.dom.evict(&self.id);
		self.dom.sweep_cache();
		Ok(())
	}
}
