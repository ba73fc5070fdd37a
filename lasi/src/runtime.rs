//! Runtime type definitions for shared ownership and interior mutability.
//!
//! This module provides conditional type aliases based on the `thread-safe` feature flag:
//!
//! - When `thread-safe` is enabled: Uses thread-safe types (`Arc`, `RwLock`, atomics, `OnceLock`)
//! - When `thread-safe` is disabled: Uses single-threaded types (`Rc`, `RefCell`, `Cell`, `OnceCell`)
//!
//! # Type Aliases
//!
//! - [`Shared<T>`]: Smart pointer for shared ownership (the handle callers receive)
//! - [`Store<T>`]: Container providing interior mutability (the instance slot)
//! - [`Flag`]: Boolean state cell (the published marker of a holder)
//! - [`Counter`]: Integer state cell (the construction counter of a holder)
//! - [`Once<T>`]: Write-once cell with internal first-access arbitration
//!
//! # Examples
//!
//! ```
//! use lasi::runtime::{Shared, Store};
//!
//! // An empty instance slot behind interior mutability
//! let slot: Store<Option<Shared<u32>>> = Store::new(None);
//! ```

#[cfg(feature = "thread-safe")]
use std::sync::{
    Arc, OnceLock, RwLock,
    atomic::{AtomicBool, AtomicUsize},
};

#[cfg(not(feature = "thread-safe"))]
use std::{
    cell::{Cell, OnceCell, RefCell},
    rc::Rc,
};

/// Type alias for shared ownership of data.
///
/// When the `thread-safe` feature is enabled, this is [`Arc<T>`] (thread-safe reference counting).
/// When disabled, this is [`Rc<T>`] (single-threaded reference counting).
///
/// Every caller of a holder receives a `Shared<T>` handle to the same underlying
/// instance; identity can be checked with `Shared::ptr_eq`.
///
/// # Examples
///
/// ```
/// use lasi::runtime::Shared;
///
/// let instance = Shared::new(vec![1, 2, 3]);
/// let handle = Shared::clone(&instance);
/// assert!(Shared::ptr_eq(&instance, &handle));
/// ```
#[cfg(feature = "thread-safe")]
pub type Shared<T> = Arc<T>;
#[cfg(not(feature = "thread-safe"))]
pub type Shared<T> = Rc<T>;

/// Type alias for interior mutability with runtime access checking.
///
/// When the `thread-safe` feature is enabled, this is [`RwLock<T>`] (thread-safe read-write lock).
/// When disabled, this is [`RefCell<T>`] (single-threaded interior mutability).
///
/// A holder keeps its instance slot in a `Store`: many concurrent readers on the
/// warm path, one exclusive writer during construction.
#[cfg(feature = "thread-safe")]
pub type Store<T> = RwLock<T>;
#[cfg(not(feature = "thread-safe"))]
pub type Store<T> = RefCell<T>;

/// Type alias for a mutable boolean state cell.
///
/// [`AtomicBool`] when `thread-safe` is enabled, [`Cell<bool>`] otherwise.
/// Holders use it as the published marker: it flips to `true` only after the
/// instance is fully constructed and stored.
#[cfg(feature = "thread-safe")]
pub type Flag = AtomicBool;
#[cfg(not(feature = "thread-safe"))]
pub type Flag = Cell<bool>;

/// Type alias for a mutable integer state cell.
///
/// [`AtomicUsize`] when `thread-safe` is enabled, [`Cell<usize>`] otherwise.
/// Holders use it as the construction counter: incremented exactly once per
/// successful construction.
#[cfg(feature = "thread-safe")]
pub type Counter = AtomicUsize;
#[cfg(not(feature = "thread-safe"))]
pub type Counter = Cell<usize>;

/// Type alias for a write-once cell that arbitrates racing first writers itself.
///
/// [`OnceLock<T>`] when `thread-safe` is enabled, [`OnceCell<T>`] otherwise.
/// [`LazyHolder`](crate::LazyHolder) delegates once-only construction to this
/// primitive instead of carrying its own lock bookkeeping.
#[cfg(feature = "thread-safe")]
pub type Once<T> = OnceLock<T>;
#[cfg(not(feature = "thread-safe"))]
pub type Once<T> = OnceCell<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_can_be_cloned() {
        let instance = Shared::new(100);
        let handle = Shared::clone(&instance);

        #[cfg(feature = "thread-safe")]
        assert_eq!(Arc::strong_count(&instance), 2);

        #[cfg(not(feature = "thread-safe"))]
        assert_eq!(Rc::strong_count(&instance), 2);

        assert!(Shared::ptr_eq(&instance, &handle));

        drop(handle);

        #[cfg(feature = "thread-safe")]
        assert_eq!(Arc::strong_count(&instance), 1);

        #[cfg(not(feature = "thread-safe"))]
        assert_eq!(Rc::strong_count(&instance), 1);
    }

    #[test]
    fn test_store_holds_a_slot() {
        let slot: Store<Option<Shared<u32>>> = Store::new(None);

        #[cfg(feature = "thread-safe")]
        {
            assert!(slot.read().unwrap().is_none());
            {
                let mut value = slot.write().unwrap();
                *value = Some(Shared::new(42));
            }
            assert_eq!(**slot.read().unwrap().as_ref().unwrap(), 42);
        }

        #[cfg(not(feature = "thread-safe"))]
        {
            assert!(slot.borrow().is_none());
            {
                let mut value = slot.borrow_mut();
                *value = Some(Shared::new(42));
            }
            assert_eq!(**slot.borrow().as_ref().unwrap(), 42);
        }
    }

    #[test]
    fn test_flag_and_counter_start_cleared() {
        let flag = Flag::new(false);
        let counter = Counter::new(0);

        #[cfg(feature = "thread-safe")]
        {
            use std::sync::atomic::Ordering;
            assert!(!flag.load(Ordering::Acquire));
            counter.fetch_add(1, Ordering::Relaxed);
            assert_eq!(counter.load(Ordering::Relaxed), 1);
        }

        #[cfg(not(feature = "thread-safe"))]
        {
            assert!(!flag.get());
            counter.set(counter.get() + 1);
            assert_eq!(counter.get(), 1);
        }
    }

    #[test]
    fn test_once_initializes_exactly_once() {
        let cell: Once<Shared<String>> = Once::new();
        assert!(cell.get().is_none());

        let first = cell.get_or_init(|| Shared::new("built".to_string())).clone();
        let second = cell.get_or_init(|| Shared::new("ignored".to_string())).clone();

        assert!(Shared::ptr_eq(&first, &second));
        assert_eq!(*first, "built");
    }
}
