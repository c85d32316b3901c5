//! Typed form element builders.
//!
//! [`Input`], [`Form`], [`Select`] and [`Textarea`] wrap an [`Element`] and
//! add the semantic setters of their tag while keeping the typed chain: the
//! common setters (`id`, `class`, `attr`, `on`) are shadowed so that
//! `Input::email("email").id("e").required()` still yields an `Input`.
//!
//! ## Example
//!
//! ```ignore
//! let signup = Form::new()
//!     .action("/signup")
//!     .on_submit(|event| event.prevent_default())
//!     .child(Input::email("email").placeholder("you@example.com").required())
//!     .child(Input::submit().value("Join"));
//! ```

use super::html::{Child, Element, IntoChild};
use crate::callback::IntoEventHandler;

macro_rules! typed_element {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Debug)]
		pub struct $name {
			element: Element,
		}

		impl $name {
			/// Returns the underlying element.
			pub fn as_element(&self) -> &Element {
				&self.element
			}

			/// Unwraps the underlying element.
			pub fn into_element(self) -> Element {
				self.element
			}

			/// Sets the id.
			pub fn id(mut self, id: impl Into<String>) -> Self {
				self.element = self.element.id(id);
				self
			}

			/// Adds one or more classes.
			pub fn class(mut self, class: &str) -> Self {
				self.element = self.element.class(class);
				self
			}

			/// Sets an attribute (last write wins).
			pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
				self.element = self.element.attr(name, value);
				self
			}

			/// Adds an event binding.
			pub fn on(mut self, event: impl Into<String>, handler: impl IntoEventHandler) -> Self {
				self.element = self.element.on(event, handler);
				self
			}

			fn flag(self, name: &str) -> Self {
				self.attr(name, "")
			}
		}

		impl From<$name> for Element {
			fn from(typed: $name) -> Self {
				typed.element
			}
		}

		impl IntoChild for $name {
			fn into_child(self) -> Child {
				Child::Element(self.element)
			}
		}
	};
}

typed_element!(
	/// An `<input>` element.
	Input
);

typed_element!(
	/// A `<form>` element.
	Form
);

typed_element!(
	/// A `<select>` element.
	Select
);

typed_element!(
	/// A `<textarea>` element (`rows="3"` unless set).
	Textarea
);

/// Creates an `<input>` of the given type.
pub fn input(input_type: &str) -> Input {
	Input::new(input_type)
}

/// Creates a `<form>`.
pub fn form() -> Form {
	Form::new()
}

/// Creates a named `<select>`.
pub fn select(name: &str) -> Select {
	Select::new(name)
}

/// Creates a named `<textarea>`.
pub fn textarea(name: &str) -> Textarea {
	Textarea::new(name)
}

impl Input {
	/// Creates an input of the given type.
	pub fn new(input_type: &str) -> Self {
		Self {
			element: Element::new("input").attr("type", input_type),
		}
	}

	fn named(input_type: &str, name: &str) -> Self {
		Self::new(input_type).name(name)
	}

	/// `<input type="text">`
	pub fn text(name: &str) -> Self {
		Self::named("text", name)
	}

	/// `<input type="email">`
	pub fn email(name: &str) -> Self {
		Self::named("email", name)
	}

	/// `<input type="password">`
	pub fn password(name: &str) -> Self {
		Self::named("password", name)
	}

	/// `<input type="number">`
	pub fn number(name: &str) -> Self {
		Self::named("number", name)
	}

	/// `<input type="checkbox">`
	pub fn checkbox(name: &str) -> Self {
		Self::named("checkbox", name)
	}

	/// `<input type="radio">` with its value.
	pub fn radio(name: &str, value: &str) -> Self {
		Self::named("radio", name).value(value)
	}

	/// `<input type="file">`
	pub fn file(name: &str) -> Self {
		Self::named("file", name)
	}

	/// `<input type="date">`
	pub fn date(name: &str) -> Self {
		Self::named("date", name)
	}

	/// `<input type="hidden">` with its value.
	pub fn hidden(name: &str, value: &str) -> Self {
		Self::named("hidden", name).value(value)
	}

	/// `<input type="search">`
	pub fn search(name: &str) -> Self {
		Self::named("search", name)
	}

	/// `<input type="tel">`
	pub fn tel(name: &str) -> Self {
		Self::named("tel", name)
	}

	/// `<input type="url">`
	pub fn url(name: &str) -> Self {
		Self::named("url", name)
	}

	/// `<input type="range">`
	pub fn range(name: &str) -> Self {
		Self::named("range", name)
	}

	/// `<input type="color">`
	pub fn color(name: &str) -> Self {
		Self::named("color", name)
	}

	/// `<input type="submit">`
	pub fn submit() -> Self {
		Self::new("submit")
	}

	/// `<input type="reset">`
	pub fn reset() -> Self {
		Self::new("reset")
	}

	pub fn name(self, name: &str) -> Self {
		self.attr("name", name)
	}

	pub fn value(self, value: &str) -> Self {
		self.attr("value", value)
	}

	pub fn placeholder(self, placeholder: &str) -> Self {
		self.attr("placeholder", placeholder)
	}

	pub fn required(self) -> Self {
		self.flag("required")
	}

	pub fn disabled(self) -> Self {
		self.flag("disabled")
	}

	pub fn readonly(self) -> Self {
		self.flag("readonly")
	}

	pub fn checked(self) -> Self {
		self.flag("checked")
	}

	pub fn min(self, min: &str) -> Self {
		self.attr("min", min)
	}

	pub fn max(self, max: &str) -> Self {
		self.attr("max", max)
	}

	pub fn step(self, step: &str) -> Self {
		self.attr("step", step)
	}

	pub fn pattern(self, pattern: &str) -> Self {
		self.attr("pattern", pattern)
	}

	pub fn autocomplete(self, value: &str) -> Self {
		self.attr("autocomplete", value)
	}

	/// Adds an input event binding.
	pub fn on_input(self, handler: impl IntoEventHandler) -> Self {
		self.on("input", handler)
	}

	/// Adds a change event binding.
	pub fn on_change(self, handler: impl IntoEventHandler) -> Self {
		self.on("change", handler)
	}
}

impl Form {
	pub fn new() -> Self {
		Self {
			element: Element::new("form"),
		}
	}

	pub fn action(self, url: &str) -> Self {
		self.attr("action", url)
	}

	pub fn method(self, method: &str) -> Self {
		self.attr("method", method)
	}

	pub fn no_validate(self) -> Self {
		self.flag("novalidate")
	}

	/// Adds a submit event binding.
	pub fn on_submit(self, handler: impl IntoEventHandler) -> Self {
		self.on("submit", handler)
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoChild) -> Self {
		self.element = self.element.child(child);
		self
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}

impl Select {
	pub fn new(name: &str) -> Self {
		Self {
			element: Element::new("select").attr("name", name),
		}
	}

	pub fn name(self, name: &str) -> Self {
		self.attr("name", name)
	}

	pub fn required(self) -> Self {
		self.flag("required")
	}

	pub fn disabled(self) -> Self {
		self.flag("disabled")
	}

	pub fn multiple(self) -> Self {
		self.flag("multiple")
	}

	/// Appends an `<option value=..>label</option>`.
	pub fn option(mut self, value: &str, label: &str) -> Self {
		self.element = self
			.element
			.child(Element::new("option").attr("value", value).text(label));
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoChild) -> Self {
		self.element = self.element.child(child);
		self
	}

	/// Adds a change event binding.
	pub fn on_change(self, handler: impl IntoEventHandler) -> Self {
		self.on("change", handler)
	}
}

impl Textarea {
	pub fn new(name: &str) -> Self {
		Self {
			element: Element::new("textarea")
				.attr("name", name)
				.attr("rows", "3"),
		}
	}

	pub fn name(self, name: &str) -> Self {
		self.attr("name", name)
	}

	pub fn rows(self, rows: u32) -> Self {
		self.attr("rows", rows.to_string())
	}

	pub fn cols(self, cols: u32) -> Self {
		self.attr("cols", cols.to_string())
	}

	pub fn placeholder(self, placeholder: &str) -> Self {
		self.attr("placeholder", placeholder)
	}

	pub fn required(self) -> Self {
		self.flag("required")
	}

	pub fn readonly(self) -> Self {
		self.flag("readonly")
	}

	pub fn max_length(self, max: u32) -> Self {
		self.attr("maxlength", max.to_string())
	}

	/// Sets the initial content.
	pub fn value(mut self, value: &str) -> Self {
		self.element = self.element.text(value);
		self
	}

	/// Adds an input event binding.
	pub fn on_input(self, handler: impl IntoEventHandler) -> Self {
		self.on("input", handler)
	}
}
