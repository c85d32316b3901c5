//! Lifecycle Integration Tests
//!
//! Drives render, update and unmount against the in-memory document and
//! checks what stays registered afterwards.
//!
//! Test Categories:
//! - Category 1: Tracking and element cache
//! - Category 2: Round-trip counter
//! - Category 3: Children replacement
//! - Category 4: Listener cleanup
//! - Category 5: Mount and update hooks

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use domkit_dom::builder::html::{Child, Element, button, div, li, span, ul};
use domkit_dom::component::{
	ChildProvider, Component, ComponentBase, ComponentRef, HtmlRenderer, Mountable, Unmountable,
	Updatable, View,
};
use domkit_dom::host::{HostDocument, MemoryDocument};
use domkit_dom::{Dom, DomError, DomOptions, Event, MountContext, WeakDom};
use rstest::{fixture, rstest};

#[fixture]
fn doc() -> Rc<MemoryDocument> {
	Rc::new(MemoryDocument::with_body("<div id='root'></div>"))
}

// ============================================================================
// Components
// ============================================================================

/// `<div><span id="X-val">n</span><button id="X-btn">+</button></div>`
struct Counter {
	base: ComponentBase,
	count: Rc<Cell<u32>>,
	dom: WeakDom,
	rename_button: bool,
}

impl Counter {
	fn new(dom: &Dom, rename_button: bool) -> Rc<Self> {
		Rc::new(Self {
			base: ComponentBase::with_id("X"),
			count: Rc::new(Cell::new(0)),
			dom: dom.downgrade(),
			rename_button,
		})
	}

	fn button_id(&self) -> String {
		if self.rename_button {
			format!("X-btn-{}", self.count.get())
		} else {
			"X-btn".to_string()
		}
	}
}

impl View for Counter {
	fn view(&self) -> Element {
		let count = Rc::clone(&self.count);
		let dom = self.dom.clone();
		div()
			.child(span().id("X-val").text(self.count.get().to_string()))
			.child(
				button()
					.id(self.button_id())
					.text("+")
					.on_click(move |_: &Event| {
						count.set(count.get() + 1);
						if let Some(dom) = dom.upgrade() {
							dom.update_id("X").unwrap();
						}
					}),
			)
	}
}

impl Component for Counter {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_view(&self) -> Option<&dyn View> {
		Some(self)
	}
}

/// A leaf with one button, counting its hook calls.
struct Leaf {
	base: ComponentBase,
	mounts: Rc<Cell<u32>>,
	unmounts: Rc<Cell<u32>>,
}

impl Leaf {
	fn new(id: &str) -> Rc<Self> {
		Rc::new(Self {
			base: ComponentBase::with_id(id),
			mounts: Rc::new(Cell::new(0)),
			unmounts: Rc::new(Cell::new(0)),
		})
	}
}

impl View for Leaf {
	fn view(&self) -> Element {
		li().child(
			button()
				.id(format!("{}-btn", self.base.id()))
				.on_click(|_: &Event| {}),
		)
	}
}

impl Mountable for Leaf {
	fn on_mount(&self, _cx: &MountContext<'_>) {
		self.mounts.set(self.mounts.get() + 1);
	}
}

impl Unmountable for Leaf {
	fn on_unmount(&self) {
		self.unmounts.set(self.unmounts.get() + 1);
	}
}

impl Component for Leaf {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_view(&self) -> Option<&dyn View> {
		Some(self)
	}

	fn as_mountable(&self) -> Option<&dyn Mountable> {
		Some(self)
	}

	fn as_unmountable(&self) -> Option<&dyn Unmountable> {
		Some(self)
	}
}

/// Renders its leaves inside a list and also declares them as children.
struct List {
	base: ComponentBase,
	leaves: RefCell<Vec<Rc<Leaf>>>,
}

impl List {
	fn new(ids: &[&str]) -> Rc<Self> {
		Rc::new(Self {
			base: ComponentBase::with_id("list"),
			leaves: RefCell::new(ids.iter().map(|id| Leaf::new(id)).collect()),
		})
	}

	fn leaf(&self, id: &str) -> Rc<Leaf> {
		self.leaves
			.borrow()
			.iter()
			.find(|leaf| leaf.id() == id)
			.cloned()
			.unwrap()
	}
}

impl View for List {
	fn view(&self) -> Element {
		let items: Vec<Child> = self
			.leaves
			.borrow()
			.iter()
			.map(|leaf| Child::component(Rc::clone(leaf)))
			.collect();
		div()
			.child(button().id("list-add").on_click(|_: &Event| {}))
			.child(ul().children(items))
	}
}

impl ChildProvider for List {
	fn children(&self) -> Vec<ComponentRef> {
		self.leaves
			.borrow()
			.iter()
			.map(|leaf| Rc::clone(leaf) as ComponentRef)
			.collect()
	}
}

impl Component for List {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_view(&self) -> Option<&dyn View> {
		Some(self)
	}

	fn as_parent(&self) -> Option<&dyn ChildProvider> {
		Some(self)
	}
}

// ============================================================================
// Category 1: Tracking and element cache
// ============================================================================

#[rstest]
fn test_tracking_is_idempotent(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc);
	let leaf: ComponentRef = Leaf::new("a");

	assert!(dom.track(Rc::clone(&leaf)));
	assert!(!dom.track(Rc::clone(&leaf)));
	assert_eq!(dom.tracked_count(), 1);

	assert!(dom.untrack("a").is_some());
	assert!(dom.untrack("a").is_none());
}

#[rstest]
#[case::validated(true)]
#[case::unvalidated(false)]
fn test_update_invalidates_cache(doc: Rc<MemoryDocument>, #[case] validate: bool) {
	let dom = Dom::builder()
		.host(doc)
		.options(DomOptions::new().validate_cache(validate))
		.build()
		.unwrap();
	let counter = Counter::new(&dom, false);
	dom.render("root", counter.clone()).unwrap();

	let before = dom.get("X").unwrap().node().clone();
	let value_before = dom.get("X-val").unwrap().node().clone();
	counter.count.set(5);
	dom.update(&*counter).unwrap();
	let after = dom.get("X").unwrap().node().clone();
	let value = dom.get("X-val").unwrap();

	assert_ne!(before, after);
	assert_ne!(&value_before, value.node());
	assert_eq!(value.text(), "5");
}

/// A panel whose only button carries no id.
struct Panel {
	base: ComponentBase,
}

impl View for Panel {
	fn view(&self) -> Element {
		div().child(button().text("go").on_click(|_: &Event| {}))
	}
}

impl Component for Panel {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_view(&self) -> Option<&dyn View> {
		Some(self)
	}
}

#[rstest]
#[case::validated(true)]
#[case::unvalidated(false)]
fn test_cache_does_not_outlive_unmounted_tree(doc: Rc<MemoryDocument>, #[case] validate: bool) {
	let dom = Dom::builder()
		.host(doc)
		.options(DomOptions::new().validate_cache(validate))
		.build()
		.unwrap();
	let panel = Rc::new(Panel {
		base: ComponentBase::with_id("panel"),
	});
	dom.render("root", panel.clone()).unwrap();

	let mut seen = Vec::new();
	for _ in 0..3 {
		seen.extend(dom.query_all("button").iter().map(|b| b.id().to_string()));
		dom.update(&*panel).unwrap();
	}
	seen.extend(dom.query_all("button").iter().map(|b| b.id().to_string()));
	assert_eq!(seen.len(), 4);
	// only the latest auto id and the container stay cached while mounted
	assert_eq!(dom.cached_count(), 2);

	dom.unmount(&*panel).unwrap();

	for id in seen.iter().map(String::as_str).chain(["panel"]) {
		assert!(!dom.is_cached(id), "{} is still cached", id);
	}
	assert_eq!(dom.cached_count(), 1);
	assert!(dom.is_cached("root"));
}

#[rstest]
fn test_missing_parent_is_not_tracked(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());

	let render = dom.render("missing", Leaf::new("a"));
	let append = dom.append("missing", Leaf::new("b"));
	let hydrate = dom.hydrate("missing", Leaf::new("c"));

	assert_eq!(render, Err(DomError::ParentNotFound("missing".into())));
	assert!(append.unwrap_err().is_not_found());
	assert!(hydrate.unwrap_err().is_not_found());
	assert_eq!(dom.tracked_count(), 0);
	assert_eq!(doc.listener_count(), 0);
	assert_eq!(
		dom.update_id("a"),
		Err(DomError::ComponentNotFound("a".into()))
	);
}

#[rstest]
fn test_update_after_external_removal_fails(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let counter = Counter::new(&dom, false);
	dom.render("root", counter.clone()).unwrap();

	let node = doc.element_by_id("X").unwrap();
	doc.remove(&node).unwrap();

	assert_eq!(
		dom.update(&*counter),
		Err(DomError::ComponentNotFound("X".into()))
	);
	// nothing was released by the failed call
	assert_eq!(dom.listener_keys("X").len(), 1);
}

// ============================================================================
// Category 2: Round-trip counter
// ============================================================================

#[rstest]
fn test_counter_round_trip_with_stable_button(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let counter = Counter::new(&dom, false);
	dom.render("root", counter.clone()).unwrap();
	assert_eq!(doc.text_by_id("X-val").as_deref(), Some("0"));

	doc.click("X-btn").unwrap();

	assert_eq!(counter.count.get(), 1);
	assert_eq!(doc.text_by_id("X-val").as_deref(), Some("1"));
	assert!(dom.has_listener("X-btn", "click"));
	assert_eq!(doc.listeners_on("X-btn", "click"), 1);

	doc.click("X-btn").unwrap();
	assert_eq!(doc.text_by_id("X-val").as_deref(), Some("2"));
	assert_eq!(doc.listener_count(), 1);
}

#[rstest]
fn test_counter_round_trip_with_renamed_button(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let counter = Counter::new(&dom, true);
	dom.render("root", counter.clone()).unwrap();

	doc.click("X-btn-0").unwrap();

	assert_eq!(doc.text_by_id("X-val").as_deref(), Some("1"));
	assert!(!dom.has_listener("X-btn-0", "click"));
	assert!(dom.has_listener("X-btn-1", "click"));
	assert_eq!(dom.listener_keys("X"), vec!["X-btn-1::click"]);
	assert_eq!(doc.listener_count(), 1);
}

// ============================================================================
// Category 3: Children replacement
// ============================================================================

#[rstest]
fn test_children_are_replaced_not_merged(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let list = List::new(&["A", "B", "C"]);
	dom.render("root", list.clone()).unwrap();
	assert_eq!(dom.children_of("list"), vec!["A", "B", "C"]);
	let b = list.leaf("B");

	list.leaves.borrow_mut().retain(|leaf| leaf.id() != "B");
	dom.update(&*list).unwrap();

	assert_eq!(dom.children_of("list"), vec!["A", "C"]);
	assert!(!dom.is_tracked("B"));
	assert!(dom.listener_keys("B").is_empty());
	assert!(doc.element_by_id("B").is_none());
	assert_eq!(b.unmounts.get(), 1);

	for id in ["A", "C"] {
		assert!(dom.is_tracked(id));
		assert_eq!(doc.listeners_on(&format!("{}-btn", id), "click"), 1);
	}
	// two leaves plus the list's own button
	assert_eq!(doc.listener_count(), 3);
}

#[rstest]
fn test_render_into_occupied_container(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let first = List::new(&["A"]);
	dom.render("root", first.clone()).unwrap();

	let second = Leaf::new("solo");
	dom.render("root", second.clone()).unwrap();

	assert_eq!(dom.children_of("root"), vec!["solo"]);
	assert!(!dom.is_tracked("list"));
	assert!(!dom.is_tracked("A"));
	assert_eq!(first.leaf("A").unmounts.get(), 1);
	assert_eq!(doc.listener_count(), 1);
}

#[rstest]
fn test_failed_release_still_releases_remaining_occupants(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	// "body" resolves to the document root, which the host refuses to remove
	let stuck = Leaf::new("body");
	let other = Leaf::new("b");
	dom.append("root", stuck.clone()).unwrap();
	dom.append("root", other.clone()).unwrap();

	let result = dom.render("root", Leaf::new("c"));

	assert!(matches!(result, Err(DomError::Host(_))));
	assert_eq!(stuck.unmounts.get(), 1);
	assert_eq!(other.unmounts.get(), 1);
	assert!(!dom.is_tracked("b"));
	assert!(dom.listener_keys("b").is_empty());
	assert!(doc.element_by_id("b").is_none());
}

#[rstest]
fn test_append_adds_occupants(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	dom.append("root", Leaf::new("a")).unwrap();
	dom.append("root", Leaf::new("b")).unwrap();

	assert_eq!(dom.children_of("root"), vec!["a", "b"]);
	assert_eq!(
		doc.inner_html_by_id("root").unwrap(),
		"<li id=\"a\"><button id=\"a-btn\"></button></li><li id=\"b\"><button id=\"b-btn\"></button></li>"
	);
}

// ============================================================================
// Category 4: Listener cleanup
// ============================================================================

#[rstest]
fn test_unmount_releases_whole_tree(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let list = List::new(&["A", "B", "C"]);
	dom.render("root", list.clone()).unwrap();
	assert_eq!(doc.listener_count(), 4);

	dom.unmount(&*list).unwrap();

	for id in ["list", "A", "B", "C"] {
		assert!(dom.listener_keys(id).is_empty(), "{} still owns listeners", id);
		assert!(!dom.is_tracked(id));
	}
	assert_eq!(dom.listener_count(), 0);
	assert_eq!(doc.listener_count(), 0);
	assert_eq!(doc.inner_html_by_id("root").as_deref(), Some(""));
	for id in ["A", "B", "C"] {
		assert_eq!(list.leaf(id).unmounts.get(), 1);
	}
}

#[rstest]
fn test_auto_id_is_wired(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let clicked = Rc::new(Cell::new(false));
	let flag = Rc::clone(&clicked);
	let panel = div()
		.class("panel")
		.child(button().text("go").on_click(move |_: &Event| flag.set(true)))
		.into_component();
	dom.render("root", panel).unwrap();

	let buttons = dom.query_all("button");
	assert_eq!(buttons.len(), 1);
	let id = buttons[0].id().to_string();
	assert!(!id.is_empty());
	assert_eq!(dom.listener_keys("dk-1"), vec![format!("{}::click", id)]);

	doc.click(&id).unwrap();
	assert!(clicked.get());
}

// ============================================================================
// Category 5: Mount and update hooks
// ============================================================================

/// Registers a listener from its mount hook and counts updates.
struct Search {
	base: ComponentBase,
	queries: Rc<RefCell<Vec<String>>>,
	updates: Cell<u32>,
}

impl View for Search {
	fn view(&self) -> Element {
		div().child(Element::new("input").id("search-q"))
	}
}

impl Mountable for Search {
	fn on_mount(&self, cx: &MountContext<'_>) {
		let queries = Rc::clone(&self.queries);
		cx.get("search-q")
			.unwrap()
			.on("input", move |event: &Event| {
				queries.borrow_mut().push(event.target_value())
			})
			.unwrap();
	}
}

impl Updatable for Search {
	fn on_update(&self, cx: &MountContext<'_>) {
		self.updates.set(self.updates.get() + 1);
		self.on_mount(cx);
	}
}

impl Component for Search {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_view(&self) -> Option<&dyn View> {
		Some(self)
	}

	fn as_mountable(&self) -> Option<&dyn Mountable> {
		Some(self)
	}

	fn as_updatable(&self) -> Option<&dyn Updatable> {
		Some(self)
	}
}

#[rstest]
fn test_mount_hook_listeners_are_owned(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let search = Rc::new(Search {
		base: ComponentBase::with_id("search"),
		queries: Rc::new(RefCell::new(Vec::new())),
		updates: Cell::new(0),
	});
	dom.render("root", search.clone()).unwrap();

	doc.input_value("search-q", "rust").unwrap();
	assert_eq!(*search.queries.borrow(), vec!["rust"]);
	assert_eq!(dom.listener_keys("search"), vec!["search-q::input"]);
	assert_eq!(dom.orphan_count(), 0);

	dom.update(&*search).unwrap();
	assert_eq!(search.updates.get(), 1);
	assert_eq!(doc.listener_count(), 1);

	doc.input_value("search-q", "wasm").unwrap();
	assert_eq!(*search.queries.borrow(), vec!["rust", "wasm"]);

	dom.unmount(&*search).unwrap();
	assert_eq!(doc.listener_count(), 0);
}

/// Writes its own markup and declares the leaf that markup contains.
struct Shell {
	base: ComponentBase,
	leaf: Rc<Leaf>,
}

impl HtmlRenderer for Shell {
	fn render_html(&self) -> String {
		format!(
			"<section id='{}'><li id='{}'></li></section>",
			self.base.id(),
			self.leaf.id()
		)
	}
}

impl ChildProvider for Shell {
	fn children(&self) -> Vec<ComponentRef> {
		vec![Rc::clone(&self.leaf) as ComponentRef]
	}
}

impl Component for Shell {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn as_html(&self) -> Option<&dyn HtmlRenderer> {
		Some(self)
	}

	fn as_parent(&self) -> Option<&dyn ChildProvider> {
		Some(self)
	}
}

#[rstest]
fn test_declared_child_is_tracked_and_updatable(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc.clone());
	let leaf = Leaf::new("leaf");
	let shell = Rc::new(Shell {
		base: ComponentBase::with_id("shell"),
		leaf: leaf.clone(),
	});
	dom.render("root", shell.clone()).unwrap();

	assert_eq!(leaf.mounts.get(), 1);
	assert!(dom.is_tracked("leaf"));
	assert_eq!(dom.children_of("shell"), vec!["leaf"]);

	dom.update(&*leaf).unwrap();
	assert!(dom.has_listener("leaf-btn", "click"));
	assert_eq!(doc.listeners_on("leaf-btn", "click"), 1);
	assert_eq!(leaf.mounts.get(), 1);

	dom.unmount(&*shell).unwrap();
	assert_eq!(leaf.unmounts.get(), 1);
	assert!(!dom.is_tracked("leaf"));
	assert_eq!(doc.listener_count(), 0);
	assert_eq!(doc.inner_html_by_id("root").as_deref(), Some(""));
}

#[rstest]
fn test_declared_and_rendered_children_mount_once(doc: Rc<MemoryDocument>) {
	let dom = Dom::new(doc);
	let list = List::new(&["A", "B"]);
	dom.render("root", list.clone()).unwrap();

	for id in ["A", "B"] {
		assert_eq!(list.leaf(id).mounts.get(), 1);
	}

	dom.update(&*list).unwrap();
	for id in ["A", "B"] {
		assert_eq!(list.leaf(id).mounts.get(), 2);
		assert_eq!(list.leaf(id).unmounts.get(), 1);
	}
}
