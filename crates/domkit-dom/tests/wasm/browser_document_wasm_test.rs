//! Browser document tests
//!
//! Run with `wasm-pack test --headless --chrome crates/domkit-dom`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use domkit_dom::builder::html::{button, div, span};
use domkit_dom::host::WebDocument;
use domkit_dom::{Dom, Event, HostDocument};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_point(id: &str) -> Dom {
	let doc = WebDocument::new().unwrap();
	let body = doc.document().body().unwrap();
	let container = doc.document().create_element("div").unwrap();
	container.set_id(id);
	body.append_child(&container).unwrap();
	Dom::new(Rc::new(doc))
}

fn click(dom: &Dom, id: &str) {
	let node = dom.get(id).unwrap();
	let domkit_dom::NodeHandle::Web(el) = node.node() else {
		panic!("expected a browser node");
	};
	el.unchecked_ref::<web_sys::HtmlElement>().click();
}

#[wasm_bindgen_test]
fn test_render_and_click() {
	let dom = mount_point("wasm-render");
	let clicks = Rc::new(Cell::new(0));
	let counter = Rc::clone(&clicks);
	let panel = div()
		.child(span().id("wasm-label").text("ready"))
		.child(
			button()
				.id("wasm-btn")
				.on_click(move |_: &Event| counter.set(counter.get() + 1)),
		)
		.into_component();
	dom.render("wasm-render", panel).unwrap();

	assert_eq!(dom.get("wasm-label").unwrap().text(), "ready");
	click(&dom, "wasm-btn");
	assert_eq!(clicks.get(), 1);
}

#[wasm_bindgen_test]
fn test_unmount_detaches_listeners() {
	let dom = mount_point("wasm-unmount");
	let clicks = Rc::new(Cell::new(0));
	let counter = Rc::clone(&clicks);
	let panel = div()
		.child(button().id("wasm-gone").on_click(move |_: &Event| counter.set(counter.get() + 1)))
		.into_component();
	dom.render("wasm-unmount", panel.clone()).unwrap();
	dom.unmount(&*panel).unwrap();

	assert_eq!(dom.listener_count(), 0);
	assert!(dom.get("wasm-gone").is_none());
}

#[wasm_bindgen_test]
fn test_form_value_and_checked() {
	let dom = mount_point("wasm-form");
	let host = dom.host();
	let container = dom.get("wasm-form").unwrap();
	host.set_inner_html(
		container.node(),
		"<input id='wasm-name' value='a'><input id='wasm-box' type='checkbox'>",
	)
	.unwrap();

	let name = dom.get("wasm-name").unwrap();
	assert_eq!(name.value(), "a");
	name.set_value("b").unwrap();
	assert_eq!(name.value(), "b");

	let check = dom.get("wasm-box").unwrap();
	assert!(!check.checked());
	check.set_checked(true).unwrap();
	assert!(check.checked());
}

#[wasm_bindgen_test]
fn test_hash_round_trip() {
	let dom = mount_point("wasm-hash");
	dom.set_hash("#wasm");
	assert_eq!(dom.hash(), "#wasm");
}
