//! HTML Builder API
//!
//! This module provides a fluent API for describing markup elements.
//!
//! ## Features
//!
//! - **Fluent API**: Chain method calls for readable element construction
//! - **Event shortcuts**: Convenient methods like `.on_click()` for common events
//! - **Typed form controls**: `Input`, `Form`, `Select` and `Textarea` keep
//!   their own setters through the chain
//!
//! ## Example
//!
//! ```ignore
//! use domkit_dom::builder::html::{button, div, span};
//!
//! let counter = div()
//!     .class("counter")
//!     .child(span().id("count").text("0"))
//!     .child(button().text("+").on_click(|event: &Event| event.prevent_default()));
//! ```

pub mod form;
pub mod html;

// Re-exports for convenience
pub use form::{Form, Input, Select, Textarea};
pub use html::{Child, Element, IntoChild};
