//! Render, append, hydrate, update and unmount.
//!
//! Every operation resolves the nodes it needs before it changes anything:
//! a not-found failure leaves the document and the registry untouched.
//! Failures reported by the host after markup was swapped in are returned
//! but not rolled back.

use std::collections::HashSet;
use std::rc::Rc;

use super::{Dom, MountContext};
use crate::component::{Component, ComponentRef};
use crate::error::{DomError, Result};
use crate::render::{PendingEvent, RenderOutput};
use crate::{debug_log, dom_log, error_log, warn_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Injection {
	/// Replace the container's content.
	Replace,
	/// Insert after the container's content.
	Append,
	/// The markup is already in the document.
	Hydrate,
}

impl Dom {
	/// Renders `component` as the sole content of `parent_id`.
	///
	/// Components previously rendered into the container are unmounted
	/// first.
	pub fn render(&self, parent_id: &str, component: ComponentRef) -> Result<()> {
		self.inject(parent_id, component, Injection::Replace)
	}

	/// Renders `component` after the existing content of `parent_id`.
	pub fn append(&self, parent_id: &str, component: ComponentRef) -> Result<()> {
		self.inject(parent_id, component, Injection::Append)
	}

	/// Adopts markup already present under `parent_id`.
	///
	/// The component is rendered only to collect its children and event
	/// bindings; the bindings are then wired against the existing nodes.
	pub fn hydrate(&self, parent_id: &str, component: ComponentRef) -> Result<()> {
		self.inject(parent_id, component, Injection::Hydrate)
	}

	/// Re-renders a mounted component in place.
	///
	/// The tracked instance is used, not necessarily `component` itself.
	pub fn update(&self, component: &dyn Component) -> Result<()> {
		self.update_id(&component.id())
	}

	/// Re-renders the mounted component with the given id.
	pub fn update_id(&self, id: &str) -> Result<()> {
		let not_found = || DomError::ComponentNotFound(id.to_string());
		let component = self.inner.registry.borrow().mounted(id).ok_or_else(not_found)?;
		let node = self.get_node(id).ok_or_else(not_found)?;
		debug_log!("updating {}", id);

		let mut released = HashSet::from([id.to_string()]);
		let previous = self.inner.registry.borrow_mut().take_children(id);
		self.release_children(previous, &mut released)?;
		self.cleanup_listeners(id);

		let out = self.renderer().render_component(&component);
		self.report(&out.warnings);
		self.inner.host.set_outer_html(&node, &out.markup)?;
		self.evict(id);
		self.evict_rendered(&out);
		self.sweep_cache();

		self.track_rendered(id, &out);
		let wired = self.wire(&out.pending);

		if let Some(updatable) = component.as_updatable() {
			updatable.on_update(&MountContext::new(self, id));
		}
		let mut mounted = HashSet::from([id.to_string()]);
		for child in &out.components {
			self.mount_recursive(child, &mut mounted);
		}
		self.mount_declared(id, &component, &mut mounted);
		wired
	}

	/// Unmounts a component and everything below it.
	///
	/// The tracked instance is preferred when one exists.
	pub fn unmount(&self, component: &dyn Component) -> Result<()> {
		let tracked = self.inner.registry.borrow().mounted(&component.id());
		let mut released = HashSet::new();
		match tracked {
			Some(tracked) => self.unmount_component(tracked.as_ref(), &mut released),
			None => self.unmount_component(component, &mut released),
		}
	}

	/// Unmounts the tracked component with the given id.
	pub fn unmount_id(&self, id: &str) -> Result<()> {
		let tracked = self
			.inner
			.registry
			.borrow()
			.mounted(id)
			.ok_or_else(|| DomError::ComponentNotFound(id.to_string()))?;
		self.unmount_component(tracked.as_ref(), &mut HashSet::new())
	}

	fn inject(&self, parent_id: &str, component: ComponentRef, mode: Injection) -> Result<()> {
		let parent = self
			.get_node(parent_id)
			.ok_or_else(|| DomError::ParentNotFound(parent_id.to_string()))?;
		let id = self.renderer().ensure_id(&component);
		debug_log!("{:?} {} into {}", mode, id, parent_id);

		if mode == Injection::Replace {
			let previous = self.inner.registry.borrow_mut().take_children(parent_id);
			self.release_children(previous, &mut HashSet::new())?;
		}

		let out = self.renderer().render_component(&component);
		self.report(&out.warnings);
		match mode {
			Injection::Replace => self.inner.host.set_inner_html(&parent, &out.markup)?,
			Injection::Append => self.inner.host.append_html(&parent, &out.markup)?,
			Injection::Hydrate => {}
		}
		self.evict(&id);
		self.evict_rendered(&out);
		if mode == Injection::Replace {
			self.sweep_cache();
		}

		{
			let mut registry = self.inner.registry.borrow_mut();
			registry.track(Rc::clone(&component));
			match mode {
				Injection::Replace => registry.set_children(parent_id, vec![id.clone()]),
				Injection::Append | Injection::Hydrate => registry.push_child(parent_id, &id),
			}
		}
		self.track_rendered(&id, &out);
		let wired = self.wire(&out.pending);

		let mut mounted = HashSet::new();
		self.mount_recursive(&component, &mut mounted);
		for child in &out.components {
			self.mount_recursive(child, &mut mounted);
		}
		dom_log!(self, "mounted {} into {}", id, parent_id);
		wired
	}

	/// Records every component rendered in `out` under the component that
	/// rendered it.
	fn track_rendered(&self, root_id: &str, out: &RenderOutput) {
		for (owner, children) in &out.children_by_owner {
			self.track_children(owner, children);
		}
		if out.children_of(root_id).is_empty() {
			self.inner.registry.borrow_mut().set_children(root_id, Vec::new());
		}
	}

	/// Drops cache entries for every id the fresh markup may have replaced.
	fn evict_rendered(&self, out: &RenderOutput) {
		let mut registry = self.inner.registry.borrow_mut();
		for component in &out.components {
			registry.evict(&component.id());
		}
		for pending in &out.pending {
			registry.evict(&pending.target);
		}
	}

	/// Attaches collected bindings. Every binding is attempted; the first
	/// failure is returned.
	fn wire(&self, pending: &[PendingEvent]) -> Result<()> {
		let mut first_error = None;
		for binding in pending {
			let Some(node) = self.get_node(&binding.target) else {
				warn_log!("no element {} for a {} listener", binding.target, binding.event);
				dom_log!(self, "no element {} for a {} listener", binding.target, binding.event);
				continue;
			};
			if let Err(e) = self.attach(
				&node,
				&binding.target,
				&binding.event,
				Rc::clone(&binding.handler),
				binding.owner.as_deref(),
			) {
				error_log!("failed to wire {}::{}: {}", binding.target, binding.event, e);
				first_error.get_or_insert(e);
			}
		}
		first_error.map_or(Ok(()), Err)
	}

	fn mount_recursive(&self, component: &ComponentRef, mounted: &mut HashSet<String>) {
		let id = self.renderer().ensure_id(component);
		if !mounted.insert(id.clone()) {
			return;
		}
		if let Some(mountable) = component.as_mountable() {
			debug_log!("mount hook for {}", id);
			mountable.on_mount(&MountContext::new(self, &id));
		}
		self.mount_declared(&id, component, mounted);
	}

	/// Tracks the children a component declares, records them under it and
	/// mounts them. They stay updatable even when only the parent's own
	/// markup contains them.
	fn mount_declared(&self, id: &str, component: &ComponentRef, mounted: &mut HashSet<String>) {
		let Some(parent) = component.as_parent() else {
			return;
		};
		for child in parent.children() {
			let child_id = self.renderer().ensure_id(&child);
			{
				let mut registry = self.inner.registry.borrow_mut();
				registry.track(Rc::clone(&child));
				registry.push_child(id, &child_id);
			}
			self.mount_recursive(&child, mounted);
		}
	}

	/// Children first: declared children, then tracked children, then the
	/// component's own hook, listeners and node.
	fn unmount_component(&self, component: &dyn Component, released: &mut HashSet<String>) -> Result<()> {
		let id = component.id();
		if id.is_empty() || !released.insert(id.clone()) {
			return Ok(());
		}

		let mut first_error = None;
		if let Some(parent) = component.as_parent() {
			for child in parent.children() {
				if let Err(e) = self.unmount_component(child.as_ref(), released) {
					first_error.get_or_insert(e);
				}
			}
		}
		let tracked_children = self.inner.registry.borrow_mut().take_children(&id);
		if let Err(e) = self.release_children(tracked_children, released) {
			first_error.get_or_insert(e);
		}

		if let Some(unmountable) = component.as_unmountable() {
			unmountable.on_unmount();
		}
		self.cleanup_listeners(&id);
		let node = self
			.get_node(&id)
			.filter(|node| self.inner.host.is_connected(node));
		if let Some(node) = node
			&& let Err(e) = self.inner.host.remove(&node)
		{
			first_error.get_or_insert(e);
		}
		self.forget(&id);
		self.sweep_cache();
		debug_log!("unmounted {}", id);
		first_error.map_or(Ok(()), Err)
	}

	/// Releases each child. Every child is attempted; the first failure is
	/// returned.
	fn release_children(&self, ids: Vec<String>, released: &mut HashSet<String>) -> Result<()> {
		let mut first_error = None;
		for child in ids {
			if let Err(e) = self.release_child(&child, released) {
				error_log!("failed to release {}: {}", child, e);
				first_error.get_or_insert(e);
			}
		}
		first_error.map_or(Ok(()), Err)
	}

	/// Unmounts a child by id, falling back to listener cleanup when no
	/// instance is tracked for it.
	fn release_child(&self, id: &str, released: &mut HashSet<String>) -> Result<()> {
		let tracked = self.inner.registry.borrow().mounted(id);
		if let Some(component) = tracked {
			return self.unmount_component(component.as_ref(), released);
		}
		if !released.insert(id.to_string()) {
			return Ok(());
		}
		let grandchildren = self.inner.registry.borrow_mut().take_children(id);
		let released_all = self.release_children(grandchildren, released);
		self.cleanup_listeners(id);
		self.forget(id);
		released_all
	}

	fn forget(&self, id: &str) {
		let mut registry = self.inner.registry.borrow_mut();
		registry.evict(id);
		registry.untrack(id);
		registry.forget_child(id);
	}

	fn report(&self, warnings: &[String]) {
		for warning in warnings {
			warn_log!("{}", warning);
			dom_log!(self, "{}", warning);
		}
	}
}
