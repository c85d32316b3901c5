//! Document session.
//!
//! A [`Dom`] owns everything that is "currently live" for one host document:
//! the element cache, the mounted components, the children of each parent,
//! and the listener registry. Every lifecycle operation goes through it, so
//! independent sessions (one per test, for instance) never share state.
//!
//! `Dom` is a cheap `Rc` handle. Event handlers that need the session should
//! capture a [`WeakDom`] so the session can be dropped; dropping the last
//! handle detaches every listener it registered.

mod element_ref;
mod lifecycle;
mod options;
mod registry;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::callback::EventHandler;
use crate::error::{DomError, Result};
use crate::host::{HostDocument, ListenerHandle, NodeHandle};
use crate::render::{IdGenerator, MarkupRenderer};
use crate::{component::ComponentRef, debug_log, dom_log, warn_log};

pub use element_ref::ElementRef;
pub use options::{DomOptions, OrphanPolicy};
pub use registry::event_key;

use registry::{RegisteredListener, Registry};

/// Receives session log messages.
pub type LogSink = Rc<dyn Fn(fmt::Arguments<'_>) + 'static>;

struct DomInner {
	host: Rc<dyn HostDocument>,
	registry: RefCell<Registry>,
	ids: IdGenerator,
	options: DomOptions,
	log_sink: Option<LogSink>,
	hash_handles: RefCell<Vec<ListenerHandle>>,
}

impl Drop for DomInner {
	fn drop(&mut self) {
		for listener in self.registry.get_mut().take_all_listeners() {
			self.host
				.remove_listener(&listener.node, &listener.event, listener.handle);
		}
		for handle in self.hash_handles.get_mut().drain(..) {
			self.host.remove_hash_listener(handle);
		}
	}
}

/// A document session.
#[derive(Clone)]
pub struct Dom {
	inner: Rc<DomInner>,
}

/// A non-owning reference to a [`Dom`].
#[derive(Clone)]
pub struct WeakDom {
	inner: Weak<DomInner>,
}

impl WeakDom {
	pub fn upgrade(&self) -> Option<Dom> {
		self.inner.upgrade().map(|inner| Dom { inner })
	}
}

impl fmt::Debug for WeakDom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakDom")
			.field("alive", &(self.inner.strong_count() > 0))
			.finish()
	}
}

impl fmt::Debug for Dom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dom")
			.field("options", &self.inner.options)
			.field("registry", &self.inner.registry.borrow())
			.field("ids_issued", &self.inner.ids.issued())
			.finish()
	}
}

/// Assembles a [`Dom`].
///
/// ```ignore
/// let dom = Dom::builder()
///     .host(doc.clone())
///     .options(DomOptions::new().orphan_policy(OrphanPolicy::Reject))
///     .log_sink(|args| println!("{}", args))
///     .build()?;
/// ```
#[derive(Default)]
pub struct DomBuilder {
	host: Option<Rc<dyn HostDocument>>,
	options: DomOptions,
	log_sink: Option<LogSink>,
}

impl fmt::Debug for DomBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DomBuilder")
			.field("has_host", &self.host.is_some())
			.field("options", &self.options)
			.field("has_log_sink", &self.log_sink.is_some())
			.finish()
	}
}

impl DomBuilder {
	pub fn host(mut self, host: Rc<dyn HostDocument>) -> Self {
		self.host = Some(host);
		self
	}

	pub fn options(mut self, options: DomOptions) -> Self {
		self.options = options;
		self
	}

	pub fn log_sink(mut self, sink: impl Fn(fmt::Arguments<'_>) + 'static) -> Self {
		self.log_sink = Some(Rc::new(sink));
		self
	}

	/// Builds the session.
	///
	/// Without an explicit host this binds the browser document on `wasm32`
	/// and fails with [`DomError::NoDocument`] elsewhere.
	pub fn build(self) -> Result<Dom> {
		self.options.validate()?;
		let host = match self.host {
			Some(host) => host,
			None => default_host()?,
		};
		Ok(Dom::from_parts(host, self.options, self.log_sink))
	}
}

#[cfg(target_arch = "wasm32")]
fn default_host() -> Result<Rc<dyn HostDocument>> {
	Ok(Rc::new(crate::host::WebDocument::new()?))
}

#[cfg(not(target_arch = "wasm32"))]
fn default_host() -> Result<Rc<dyn HostDocument>> {
	Err(DomError::NoDocument)
}

/// Session handle given to mount and update hooks.
///
/// Elements resolved through it attribute their listeners to the component
/// being mounted, so the listeners are released when it unmounts.
#[derive(Clone, Copy)]
pub struct MountContext<'a> {
	dom: &'a Dom,
	owner: &'a str,
}

impl<'a> MountContext<'a> {
	pub(crate) fn new(dom: &'a Dom, owner: &'a str) -> Self {
		Self { dom, owner }
	}

	pub fn dom(&self) -> &'a Dom {
		self.dom
	}

	/// Id of the component being mounted or updated.
	pub fn owner(&self) -> &'a str {
		self.owner
	}

	/// Resolves an element whose listeners belong to the current component.
	pub fn get(&self, id: &str) -> Option<ElementRef> {
		self.dom
			.get(id)
			.map(|element| element.owned_by(self.owner))
	}
}

impl fmt::Debug for MountContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MountContext")
			.field("owner", &self.owner)
			.finish()
	}
}

impl Dom {
	/// Creates a session over `host` with default options.
	pub fn new(host: Rc<dyn HostDocument>) -> Self {
		Self::from_parts(host, DomOptions::default(), None)
	}

	pub fn builder() -> DomBuilder {
		DomBuilder::default()
	}

	/// Binds the live browser document.
	#[cfg(target_arch = "wasm32")]
	pub fn browser() -> Result<Self> {
		Ok(Self::new(Rc::new(crate::host::WebDocument::new()?)))
	}

	fn from_parts(host: Rc<dyn HostDocument>, options: DomOptions, log_sink: Option<LogSink>) -> Self {
		Self {
			inner: Rc::new(DomInner {
				host,
				registry: Default::default(),
				ids: IdGenerator::new(),
				options,
				log_sink,
				hash_handles: Default::default(),
			}),
		}
	}

	pub fn downgrade(&self) -> WeakDom {
		WeakDom {
			inner: Rc::downgrade(&self.inner),
		}
	}

	pub fn host(&self) -> &dyn HostDocument {
		self.inner.host.as_ref()
	}

	pub fn options(&self) -> &DomOptions {
		&self.inner.options
	}

	/// Forwards a message to the injected log sink, if any.
	pub fn log(&self, args: fmt::Arguments<'_>) {
		if let Some(sink) = &self.inner.log_sink {
			sink(args);
		}
	}

	pub(crate) fn renderer(&self) -> MarkupRenderer<'_> {
		MarkupRenderer::new(&self.inner.ids, &self.inner.options)
	}

	// ------------------------------------------------------------------
	// Element resolution
	// ------------------------------------------------------------------

	/// Resolves an id to a live node, consulting the element cache first.
	///
	/// `"body"` and `"head"` resolve to the document roots.
	pub(crate) fn get_node(&self, id: &str) -> Option<NodeHandle> {
		let cached = self.inner.registry.borrow().cached(id);
		if let Some(node) = cached {
			if !self.inner.options.validate_cache || self.inner.host.is_connected(&node) {
				return Some(node);
			}
			self.inner.registry.borrow_mut().evict(id);
		}
		let node = match id {
			"body" => self.inner.host.body(),
			"head" => self.inner.host.head(),
			_ => self.inner.host.element_by_id(id),
		}?;
		self.inner.registry.borrow_mut().cache(id, node.clone());
		Some(node)
	}

	/// Resolves an element. Not-found is `None`, never an error.
	///
	/// The element has no owner: listeners added through it are unowned
	/// unless [`ElementRef::owned_by`] is used.
	pub fn get(&self, id: &str) -> Option<ElementRef> {
		self.get_node(id)
			.map(|node| ElementRef::new(node, self.clone(), id, None))
	}

	/// Drops the cache entry for `id`. Returns whether one existed.
	pub fn evict(&self, id: &str) -> bool {
		self.inner.registry.borrow_mut().evict(id)
	}

	/// Drops every cache entry whose node left the document. Runs after each
	/// replacement or removal, whatever `validate_cache` says.
	pub(crate) fn sweep_cache(&self) {
		let host = &self.inner.host;
		let dropped = self
			.inner
			.registry
			.borrow_mut()
			.retain_cached(|node| host.is_connected(node));
		if dropped > 0 {
			debug_log!("dropped {} detached cache entries", dropped);
		}
	}

	// ------------------------------------------------------------------
	// Tracking
	// ------------------------------------------------------------------

	/// Tracks a component. Tracking an id twice keeps the first instance.
	pub fn track(&self, component: ComponentRef) -> bool {
		self.inner.registry.borrow_mut().track(component)
	}

	/// Stops tracking `id`. No-op if it is not tracked.
	pub fn untrack(&self, id: &str) -> Option<ComponentRef> {
		self.inner.registry.borrow_mut().untrack(id)
	}

	/// Tracks each child, then replaces the child list of `parent_id`.
	pub fn track_children(&self, parent_id: &str, children: &[ComponentRef]) {
		let mut registry = self.inner.registry.borrow_mut();
		for child in children {
			registry.track(Rc::clone(child));
		}
		registry.set_children(parent_id, children.iter().map(|c| c.id()).collect());
	}

	// ------------------------------------------------------------------
	// Listeners
	// ------------------------------------------------------------------

	/// Attaches `handler` to `node` under the key `id::event`.
	pub(crate) fn attach(
		&self,
		node: &NodeHandle,
		id: &str,
		event: &str,
		handler: EventHandler,
		owner: Option<&str>,
	) -> Result<()> {
		if id.is_empty() {
			return Err(DomError::MissingId {
				event: event.to_string(),
			});
		}
		let key = event_key(id, event);
		if owner.is_none() && self.inner.options.orphan_policy == OrphanPolicy::Reject {
			return Err(DomError::OrphanedListener(key));
		}

		let handle = self.inner.host.add_listener(node, event, handler)?;
		let replaced = self.inner.registry.borrow_mut().register_listener(
			key.clone(),
			RegisteredListener {
				node: node.clone(),
				target: id.to_string(),
				event: event.to_string(),
				handle,
				owner: owner.map(str::to_string),
			},
		);
		if let Some(old) = replaced {
			self.inner.host.remove_listener(&old.node, &old.event, old.handle);
		}
		if owner.is_none() {
			warn_log!("listener {} registered outside any component", key);
			dom_log!(self, "listener {} registered outside any component", key);
		}
		Ok(())
	}

	/// Detaches and releases every listener owned by `owner`.
	///
	/// Safe to call for an id without listeners.
	pub fn cleanup_listeners(&self, owner: &str) {
		let listeners = self.inner.registry.borrow_mut().take_listeners(owner);
		self.release(listeners);
	}

	/// Detaches and releases every unowned listener. Returns how many there
	/// were.
	pub fn release_orphans(&self) -> usize {
		let listeners = self.inner.registry.borrow_mut().take_orphans();
		let count = listeners.len();
		self.release(listeners);
		count
	}

	/// Detaches each listener and drops the cache entry of its target.
	fn release(&self, listeners: Vec<RegisteredListener>) {
		for listener in listeners {
			self.inner.registry.borrow_mut().evict(&listener.target);
			self.inner
				.host
				.remove_listener(&listener.node, &listener.event, listener.handle);
		}
	}

	// ------------------------------------------------------------------
	// Introspection
	// ------------------------------------------------------------------

	pub fn is_tracked(&self, id: &str) -> bool {
		self.inner.registry.borrow().is_tracked(id)
	}

	pub fn tracked_count(&self) -> usize {
		self.inner.registry.borrow().tracked_count()
	}

	/// Child component ids recorded for `parent_id` by its last render.
	pub fn children_of(&self, parent_id: &str) -> Vec<String> {
		self.inner.registry.borrow().children_of(parent_id)
	}

	/// Event keys owned by `owner`.
	pub fn listener_keys(&self, owner: &str) -> Vec<String> {
		self.inner.registry.borrow().listener_keys(owner)
	}

	pub fn has_listener(&self, id: &str, event: &str) -> bool {
		self.inner.registry.borrow().has_listener(&event_key(id, event))
	}

	/// Number of live listeners, owned or not.
	pub fn listener_count(&self) -> usize {
		self.inner.registry.borrow().listener_count()
	}

	pub fn orphan_count(&self) -> usize {
		self.inner.registry.borrow().orphan_count()
	}

	pub fn is_cached(&self, id: &str) -> bool {
		self.inner.registry.borrow().is_cached(id)
	}

	/// Number of element cache entries.
	pub fn cached_count(&self) -> usize {
		self.inner.registry.borrow().cached_count()
	}

	pub(crate) fn push_hash_handle(&self, handle: ListenerHandle) {
		self.inner.hash_handles.borrow_mut().push(handle);
	}
}
