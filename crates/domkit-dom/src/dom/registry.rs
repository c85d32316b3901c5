//! Identity and listener registry of a document session.
//!
//! Four tables:
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | element cache | id | live node handle |
//! | mounted components | component id | instance |
//! | children | parent id | child component ids of its last render |
//! | listeners | owner id | event keys, plus event key → callback |
//!
//! The registry is plain data. It never calls the host; callers take entries
//! out and release them against the document after the borrow ends.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentRef;
use crate::host::{ListenerHandle, NodeHandle};

/// Builds the key addressing one registered callback.
pub fn event_key(id: &str, event: &str) -> String {
	format!("{}::{}", id, event)
}

/// A live callback and what it is attached to.
pub(crate) struct RegisteredListener {
	pub node: NodeHandle,
	/// Id the node was resolved under.
	pub target: String,
	pub event: String,
	pub handle: ListenerHandle,
	pub owner: Option<String>,
}

#[derive(Default)]
pub(crate) struct Registry {
	elements: HashMap<String, NodeHandle>,
	mounted: HashMap<String, ComponentRef>,
	children: HashMap<String, Vec<String>>,
	owned: HashMap<String, Vec<String>>,
	callbacks: HashMap<String, RegisteredListener>,
	orphans: Vec<String>,
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("elements", &self.elements.len())
			.field("mounted", &self.mounted.len())
			.field("children", &self.children)
			.field("owned", &self.owned)
			.field("orphans", &self.orphans)
			.finish()
	}
}

impl Registry {
	// ------------------------------------------------------------------
	// Element cache
	// ------------------------------------------------------------------

	pub fn cached(&self, id: &str) -> Option<NodeHandle> {
		self.elements.get(id).cloned()
	}

	pub fn cache(&mut self, id: &str, node: NodeHandle) {
		self.elements.insert(id.to_string(), node);
	}

	pub fn evict(&mut self, id: &str) -> bool {
		self.elements.remove(id).is_some()
	}

	pub fn is_cached(&self, id: &str) -> bool {
		self.elements.contains_key(id)
	}

	/// Keeps only the cache entries whose node satisfies `keep`.
	pub fn retain_cached(&mut self, mut keep: impl FnMut(&NodeHandle) -> bool) -> usize {
		let before = self.elements.len();
		self.elements.retain(|_, node| keep(node));
		before - self.elements.len()
	}

	pub fn cached_count(&self) -> usize {
		self.elements.len()
	}

	// ------------------------------------------------------------------
	// Mounted components
	// ------------------------------------------------------------------

	/// Tracks a component. Returns `false` if its id was already tracked, in
	/// which case the table is left as is.
	pub fn track(&mut self, component: ComponentRef) -> bool {
		let id = component.id();
		if self.mounted.contains_key(&id) {
			return false;
		}
		self.mounted.insert(id, component);
		true
	}

	pub fn untrack(&mut self, id: &str) -> Option<ComponentRef> {
		self.mounted.remove(id)
	}

	pub fn mounted(&self, id: &str) -> Option<ComponentRef> {
		self.mounted.get(id).map(Rc::clone)
	}

	pub fn is_tracked(&self, id: &str) -> bool {
		self.mounted.contains_key(id)
	}

	pub fn tracked_count(&self) -> usize {
		self.mounted.len()
	}

	// ------------------------------------------------------------------
	// Children
	// ------------------------------------------------------------------

	/// Replaces the child list of `parent` wholesale.
	pub fn set_children(&mut self, parent: &str, children: Vec<String>) {
		self.children.insert(parent.to_string(), children);
	}

	pub fn push_child(&mut self, parent: &str, child: &str) {
		let list = self.children.entry(parent.to_string()).or_default();
		if !list.iter().any(|c| c == child) {
			list.push(child.to_string());
		}
	}

	pub fn take_children(&mut self, parent: &str) -> Vec<String> {
		self.children.remove(parent).unwrap_or_default()
	}

	pub fn children_of(&self, parent: &str) -> Vec<String> {
		self.children.get(parent).cloned().unwrap_or_default()
	}

	/// Removes `child` from every parent list.
	pub fn forget_child(&mut self, child: &str) {
		for list in self.children.values_mut() {
			list.retain(|c| c != child);
		}
	}

	// ------------------------------------------------------------------
	// Listeners
	// ------------------------------------------------------------------

	/// Records a callback under `key`.
	///
	/// If the key was already live, the previous callback is returned so the
	/// caller can detach it; the key moves to the new owner.
	pub fn register_listener(
		&mut self,
		key: String,
		listener: RegisteredListener,
	) -> Option<RegisteredListener> {
		let previous = self.callbacks.remove(&key);
		if let Some(old) = &previous {
			self.unlink(&key, old.owner.as_deref());
		}
		match &listener.owner {
			Some(owner) => self
				.owned
				.entry(owner.clone())
				.or_default()
				.push(key.clone()),
			None => self.orphans.push(key.clone()),
		}
		self.callbacks.insert(key, listener);
		previous
	}

	fn unlink(&mut self, key: &str, owner: Option<&str>) {
		match owner {
			Some(owner) => {
				if let Some(keys) = self.owned.get_mut(owner) {
					keys.retain(|k| k != key);
					if keys.is_empty() {
						self.owned.remove(owner);
					}
				}
			}
			None => self.orphans.retain(|k| k != key),
		}
	}

	/// Removes and returns every callback owned by `owner`.
	pub fn take_listeners(&mut self, owner: &str) -> Vec<RegisteredListener> {
		self.owned
			.remove(owner)
			.unwrap_or_default()
			.iter()
			.filter_map(|key| self.callbacks.remove(key))
			.collect()
	}

	/// Removes and returns every callback without an owner.
	pub fn take_orphans(&mut self) -> Vec<RegisteredListener> {
		std::mem::take(&mut self.orphans)
			.iter()
			.filter_map(|key| self.callbacks.remove(key))
			.collect()
	}

	/// Removes and returns every callback.
	pub fn take_all_listeners(&mut self) -> Vec<RegisteredListener> {
		self.owned.clear();
		self.orphans.clear();
		self.callbacks.drain().map(|(_, listener)| listener).collect()
	}

	pub fn listener_keys(&self, owner: &str) -> Vec<String> {
		self.owned.get(owner).cloned().unwrap_or_default()
	}

	pub fn listener_count(&self) -> usize {
		self.callbacks.len()
	}

	pub fn orphan_count(&self) -> usize {
		self.orphans.len()
	}

	pub fn has_listener(&self, key: &str) -> bool {
		self.callbacks.contains_key(key)
	}
}
