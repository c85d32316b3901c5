//! Hash routing and document queries.
//!
//! A thin pass-through to the host document. Hash subscriptions live as long
//! as the session that created them.

use std::rc::Rc;

use crate::callback::Callback;
use crate::dom::{Dom, ElementRef};
use crate::error::Result;
use crate::host::HashHandler;

impl Dom {
	/// The current fragment identifier, `#` included, or an empty string.
	pub fn hash(&self) -> String {
		self.host().location_hash()
	}

	/// Navigates to a fragment. A leading `#` is optional.
	pub fn set_hash(&self, hash: &str) {
		self.host().set_location_hash(hash);
	}

	/// Subscribes to fragment changes.
	///
	/// ```ignore
	/// dom.on_hash_change(Callback::new(move |hash: String| {
	///     show_route(&hash);
	/// }))?;
	/// ```
	pub fn on_hash_change(&self, callback: Callback<String>) -> Result<()> {
		let handler: HashHandler = Rc::new(move |hash: String| callback.call(hash));
		let handle = self.host().on_hash_change(handler)?;
		self.push_hash_handle(handle);
		Ok(())
	}

	/// Every element matching `selector`, in document order.
	///
	/// The results have no owner.
	pub fn query_all(&self, selector: &str) -> Vec<ElementRef> {
		self.host()
			.query_all(selector)
			.into_iter()
			.map(|node| {
				let id = self.host().attribute(&node, "id").unwrap_or_default();
				ElementRef::new(node, self.clone(), id, None)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use crate::callback::Callback;
	use crate::dom::Dom;
	use crate::host::MemoryDocument;
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[rstest]
	fn test_hash_round_trip() {
		let doc = Rc::new(MemoryDocument::new());
		let dom = Dom::new(doc.clone());
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		dom.on_hash_change(Callback::new(move |hash: String| sink.borrow_mut().push(hash)))
			.unwrap();

		assert_eq!(dom.hash(), "");
		dom.set_hash("settings");
		dom.set_hash("#settings");
		dom.set_hash("#about");
		assert_eq!(dom.hash(), "#about");
		assert_eq!(*seen.borrow(), vec!["#settings", "#about"]);

		drop(dom);
		assert_eq!(doc.hash_listener_count(), 0);
	}

	#[rstest]
	fn test_query_all_reads_ids() {
		let doc = Rc::new(MemoryDocument::with_body(
			"<ul><li id='a' class='item'>a</li><li class='item'>b</li><li id='c'>c</li></ul>",
		));
		let dom = Dom::new(doc);
		let found: Vec<String> = dom
			.query_all("li.item")
			.iter()
			.map(|el| el.id().to_string())
			.collect();
		assert_eq!(found, vec!["a", ""]);
		assert!(dom.query_all("li.item").iter().all(|el| el.owner().is_none()));
	}
}
