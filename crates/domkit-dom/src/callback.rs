//! Callback types and event handler conversion traits.
//!
//! This module provides the cloneable [`Callback`] wrapper and the
//! [`IntoEventHandler`] trait used by the element builders and by
//! [`ElementRef::on`](crate::ElementRef::on).
//!
//! Everything here is single-threaded: handlers live in `Rc`, matching the
//! cooperative, event-driven execution model of the document session.
//!
//! ## Example
//!
//! ```ignore
//! use domkit_dom::{Callback, html::button};
//!
//! let on_click = Callback::new(|event: &Event| event.prevent_default());
//! let node = button().text("Save").on_click(on_click);
//! ```

use std::rc::Rc;

use crate::event::Event;

/// Shared event handler stored on elements and in the listener registry.
pub type EventHandler = Rc<dyn Fn(&Event) + 'static>;

/// A cloneable callback wrapper.
///
/// `Callback` wraps a function in an `Rc`, making it cheap to clone into
/// several closures while keeping a single allocation.
///
/// ## Type Parameters
///
/// - `Args`: The argument type the callback receives
/// - `Ret`: The return type of the callback (defaults to `()`)
pub struct Callback<Args, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

/// Trait for converting various handler types to [`EventHandler`].
///
/// Implemented for closures taking `&Event`, for [`Callback<Event>`] and for
/// [`EventHandler`] itself.
pub trait IntoEventHandler {
	/// Converts self into an [`EventHandler`].
	fn into_event_handler(self) -> EventHandler;
}

impl<F> IntoEventHandler for F
where
	F: Fn(&Event) + 'static,
{
	fn into_event_handler(self) -> EventHandler {
		Rc::new(self)
	}
}

impl IntoEventHandler for Callback<Event> {
	fn into_event_handler(self) -> EventHandler {
		Rc::new(move |event: &Event| self.call(event.clone()))
	}
}

impl IntoEventHandler for EventHandler {
	fn into_event_handler(self) -> EventHandler {
		self
	}
}

/// Converts any supported handler into an [`EventHandler`].
pub fn into_event_handler<H: IntoEventHandler>(handler: H) -> EventHandler {
	handler.into_event_handler()
}

/// Event handler helper with a concrete argument type, so closures need no
/// parameter annotation.
///
/// ```ignore
/// let handler = event_handler(|event| event.stop_propagation());
/// ```
pub fn event_handler(f: impl Fn(&Event) + 'static) -> EventHandler {
	Rc::new(f)
}
