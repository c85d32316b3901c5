//! Browser host document (`wasm32` only).
//!
//! Binds `window.document` through web-sys. Listeners are
//! `Closure<dyn FnMut(web_sys::Event)>` values owned by the returned
//! [`ListenerHandle`]; they are detached with `removeEventListener` and then
//! dropped, which releases the JS function.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{HashHandler, HostDocument, ListenerHandle, NodeHandle};
use crate::callback::EventHandler;
use crate::error::{DomError, Result};
use crate::event::Event;

/// The live browser document.
#[derive(Clone, Debug)]
pub struct WebDocument {
	window: web_sys::Window,
	document: web_sys::Document,
}

impl WebDocument {
	/// Binds the current `window.document`.
	pub fn new() -> Result<Self> {
		let window = web_sys::window().ok_or(DomError::NoDocument)?;
		let document = window.document().ok_or(DomError::NoDocument)?;
		Ok(Self { window, document })
	}

	/// The underlying `web_sys::Document`.
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn element(node: &NodeHandle) -> Result<&web_sys::Element> {
	match node {
		NodeHandle::Web(el) => Ok(el),
		NodeHandle::Memory(_) => Err(DomError::Host(
			"memory node passed to the browser document".to_string(),
		)),
	}
}

fn property(el: &web_sys::Element, name: &str) -> Option<JsValue> {
	js_sys::Reflect::get(el.as_ref(), &JsValue::from_str(name)).ok()
}

fn set_property(el: &web_sys::Element, name: &str, value: &JsValue) -> Result<()> {
	js_sys::Reflect::set(el.as_ref(), &JsValue::from_str(name), value)?;
	Ok(())
}

impl HostDocument for WebDocument {
	fn element_by_id(&self, id: &str) -> Option<NodeHandle> {
		self.document.get_element_by_id(id).map(NodeHandle::Web)
	}

	fn body(&self) -> Option<NodeHandle> {
		self.document
			.body()
			.map(|body| NodeHandle::Web(body.into()))
	}

	fn head(&self) -> Option<NodeHandle> {
		self.document
			.head()
			.map(|head| NodeHandle::Web(head.into()))
	}

	fn is_connected(&self, node: &NodeHandle) -> bool {
		element(node).is_ok_and(|el| el.is_connected())
	}

	fn set_inner_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		element(node)?.set_inner_html(markup);
		Ok(())
	}

	fn set_outer_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		element(node)?.set_outer_html(markup);
		Ok(())
	}

	fn append_html(&self, node: &NodeHandle, markup: &str) -> Result<()> {
		element(node)?.insert_adjacent_html("beforeend", markup)?;
		Ok(())
	}

	fn remove(&self, node: &NodeHandle) -> Result<()> {
		element(node)?.remove();
		Ok(())
	}

	fn add_listener(
		&self,
		node: &NodeHandle,
		event: &str,
		handler: EventHandler,
	) -> Result<ListenerHandle> {
		let el = element(node)?;
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
			handler(&Event::from_web(raw));
		});
		el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		Ok(ListenerHandle::Web(closure))
	}

	fn remove_listener(&self, node: &NodeHandle, event: &str, handle: ListenerHandle) {
		if let (Ok(el), ListenerHandle::Web(closure)) = (element(node), &handle) {
			let _ = el.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		}
		drop(handle);
	}

	fn attribute(&self, node: &NodeHandle, name: &str) -> Option<String> {
		element(node).ok()?.get_attribute(name)
	}

	fn set_attribute(&self, node: &NodeHandle, name: &str, value: &str) -> Result<()> {
		element(node)?.set_attribute(name, value)?;
		Ok(())
	}

	fn remove_attribute(&self, node: &NodeHandle, name: &str) -> Result<()> {
		element(node)?.remove_attribute(name)?;
		Ok(())
	}

	fn value(&self, node: &NodeHandle) -> String {
		element(node)
			.ok()
			.and_then(|el| property(el, "value"))
			.and_then(|v| v.as_string())
			.unwrap_or_default()
	}

	fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()> {
		set_property(element(node)?, "value", &JsValue::from_str(value))
	}

	fn checked(&self, node: &NodeHandle) -> bool {
		element(node)
			.ok()
			.and_then(|el| property(el, "checked"))
			.and_then(|v| v.as_bool())
			.unwrap_or(false)
	}

	fn set_checked(&self, node: &NodeHandle, checked: bool) -> Result<()> {
		set_property(element(node)?, "checked", &JsValue::from_bool(checked))
	}

	fn text(&self, node: &NodeHandle) -> String {
		element(node)
			.ok()
			.and_then(|el| el.text_content())
			.unwrap_or_default()
	}

	fn set_text(&self, node: &NodeHandle, text: &str) -> Result<()> {
		element(node)?.set_text_content(Some(text));
		Ok(())
	}

	fn focus(&self, node: &NodeHandle) -> Result<()> {
		let el = element(node)?
			.dyn_ref::<web_sys::HtmlElement>()
			.ok_or_else(|| DomError::Host("element cannot take focus".to_string()))?;
		el.focus()?;
		Ok(())
	}

	fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
		let Ok(list) = self.document.query_selector_all(selector) else {
			return Vec::new();
		};
		(0..list.length())
			.filter_map(|i| list.item(i))
			.filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
			.map(NodeHandle::Web)
			.collect()
	}

	fn location_hash(&self) -> String {
		self.window.location().hash().unwrap_or_default()
	}

	fn set_location_hash(&self, hash: &str) {
		let _ = self.window.location().set_hash(hash);
	}

	fn on_hash_change(&self, handler: HashHandler) -> Result<ListenerHandle> {
		let window = self.window.clone();
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
			handler(window.location().hash().unwrap_or_default());
		});
		self.window
			.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
		Ok(ListenerHandle::Web(closure))
	}

	fn remove_hash_listener(&self, handle: ListenerHandle) {
		if let ListenerHandle::Web(closure) = &handle {
			let _ = self
				.window
				.remove_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
		}
		drop(handle);
	}
}
