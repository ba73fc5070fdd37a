//! Macros for ergonomic declaration of process-wide shared instances.
//!
//! - [`shared_instance!`] macro: Shorthand for declaring a `static`
//!   [`LazyHolder`](crate::LazyHolder).
//!
//! # Example
//! ```
//! use lasi::shared_instance;
//!
//! struct Registry {
//!     entries: Vec<String>,
//! }
//!
//! shared_instance!(REGISTRY, Registry, Registry { entries: Vec::new() });
//!
//! assert!(REGISTRY.entries.is_empty());
//! ```

/// Declare a `static` holder whose instance is constructed on first access.
///
/// - `shared_instance!(NAME, Type, init_expr)`: private static.
/// - `shared_instance!(pub NAME, Type, init_expr)`: any visibility prefix works.
///
/// Requires the `thread-safe` feature (a `static` holder must be shareable
/// across threads); the payload type must be `Send + Sync`.
#[macro_export]
macro_rules! shared_instance {
    ($vis:vis $name:ident, $ty:ty, $construct:expr) => {
        /// Lazily-constructed process-wide shared instance.
        $vis static $name: $crate::LazyHolder<$ty> = $crate::LazyHolder::new(|| $construct);
    };
}

#[cfg(all(test, feature = "thread-safe"))]
mod tests {
    use crate::runtime::Shared;

    shared_instance!(SEQUENCE, Vec<i32>, vec![1, 2, 3]);

    shared_instance!(pub GREETING, String, String::from("hello"));

    #[test]
    fn macro_declares_a_working_static() {
        assert_eq!(SEQUENCE.len(), 3);
        let first = SEQUENCE.instance();
        let second = SEQUENCE.instance();
        assert!(Shared::ptr_eq(&first, &second));
        assert_eq!(SEQUENCE.constructions(), 1);
    }

    #[test]
    fn macro_accepts_a_visibility() {
        assert_eq!(GREETING.as_str(), "hello");
    }
}
