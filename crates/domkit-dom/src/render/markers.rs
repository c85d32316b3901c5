//! Identifier generation for rendered nodes and components.
//!
//! Each document session owns one [`IdGenerator`]; identifiers are unique
//! within the session and never reused.

use std::cell::Cell;

/// Default prefix for generated component identifiers.
pub const DEFAULT_ID_PREFIX: &str = "dk";

/// Default prefix for identifiers of event-bearing nodes without an id.
pub const DEFAULT_AUTO_ID_PREFIX: &str = "auto";

/// Monotonic counter producing `{prefix}-{n}` identifiers.
#[derive(Debug, Default)]
pub struct IdGenerator {
	counter: Cell<u64>,
}

impl IdGenerator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Generates the next identifier with the given prefix.
	pub fn next(&self, prefix: &str) -> String {
		let n = self.counter.get() + 1;
		self.counter.set(n);
		format!("{}-{}", prefix, n)
	}

	/// Number of identifiers handed out so far.
	pub fn issued(&self) -> u64 {
		self.counter.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ids_are_sequential_across_prefixes() {
		let ids = IdGenerator::new();
		assert_eq!(ids.next(DEFAULT_ID_PREFIX), "dk-1");
		assert_eq!(ids.next(DEFAULT_AUTO_ID_PREFIX), "auto-2");
		assert_eq!(ids.next("card"), "card-3");
		assert_eq!(ids.issued(), 3);
	}
}
