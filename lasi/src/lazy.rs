//! Deferred holder backed by the standard library's once-cell.
//!
//! [`LazyHolder`] stores its construction closure at declaration time and
//! delegates once-only arbitration, blocking, and publication to
//! [`Once`](crate::runtime::Once). Semantically equivalent to
//! [`Holder`](crate::Holder) for infallible construction, with no manual lock
//! bookkeeping; use `Holder` when construction can fail.

use std::any::type_name;
use std::ops::Deref;

#[cfg(feature = "thread-safe")]
use std::sync::atomic::Ordering;

use crate::construct_guard::ConstructGuard;
use crate::runtime::{Counter, Once, Shared};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A shared instance constructed on first access by a stored closure.
///
/// Like `std::sync::LazyLock`, the constructor is `const`, so a `LazyHolder`
/// can live in `static` position; unlike it, callers receive [`Shared<T>`]
/// handles and the holder exposes its construction counter.
///
/// # Examples
///
/// ```
/// use lasi::LazyHolder;
///
/// static LIMITS: LazyHolder<Vec<u32>> = LazyHolder::new(|| vec![16, 64, 256]);
///
/// assert_eq!(LIMITS.constructions(), 0);
/// assert_eq!(LIMITS.len(), 3); // deref forces construction
/// assert_eq!(LIMITS.constructions(), 1);
/// ```
pub struct LazyHolder<T, F = fn() -> T> {
    cell: Once<Shared<T>>,
    constructions: Counter,
    construct: F,
}

impl<T, F> LazyHolder<T, F> {
    /// Creates an empty holder that will construct its instance with
    /// `construct` on first access.
    pub const fn new(construct: F) -> Self {
        Self {
            cell: Once::new(),
            constructions: Counter::new(0),
            construct,
        }
    }
}

#[cfg(feature = "thread-safe")]
impl<T, F: Fn() -> T> LazyHolder<T, F> {
    fn force(&self) -> &Shared<T> {
        if let Some(value) = self.cell.get() {
            return value;
        }

        // The once-cell would deadlock on same-thread re-entry; fail loudly
        // instead.
        let _guard = match ConstructGuard::enter(self as *const Self as usize, type_name::<T>()) {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        };

        self.cell.get_or_init(|| {
            #[cfg(feature = "tracing")]
            debug!("constructing shared instance of {}", type_name::<T>());

            let value = Shared::new((self.construct)());
            self.constructions.fetch_add(1, Ordering::Relaxed);
            value
        })
    }

    /// Returns the instance, constructing it on first access.
    ///
    /// Racing callers are arbitrated by the underlying once-cell: one runs
    /// the closure, the rest block until it finishes, and all receive the
    /// same instance.
    pub fn instance(&self) -> Shared<T> {
        self.force().clone()
    }

    /// Returns a handle to the instance, or `None` if it has not been
    /// constructed yet. Never constructs.
    pub fn get(&self) -> Option<Shared<T>> {
        self.cell.get().cloned()
    }

    /// Whether the instance has been constructed.
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// How many times the construction closure has completed. 0 or 1.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }
}

#[cfg(not(feature = "thread-safe"))]
impl<T, F: Fn() -> T> LazyHolder<T, F> {
    fn force(&self) -> &Shared<T> {
        if let Some(value) = self.cell.get() {
            return value;
        }

        let _guard = match ConstructGuard::enter(self as *const Self as usize, type_name::<T>()) {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        };

        self.cell.get_or_init(|| {
            #[cfg(feature = "tracing")]
            debug!("constructing shared instance of {}", type_name::<T>());

            let value = Shared::new((self.construct)());
            self.constructions.set(self.constructions.get() + 1);
            value
        })
    }

    /// Returns the instance, constructing it on first access.
    pub fn instance(&self) -> Shared<T> {
        self.force().clone()
    }

    /// Returns a handle to the instance, or `None` if it has not been
    /// constructed yet. Never constructs.
    pub fn get(&self) -> Option<Shared<T>> {
        self.cell.get().cloned()
    }

    /// Whether the instance has been constructed.
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// How many times the construction closure has completed. 0 or 1.
    pub fn constructions(&self) -> usize {
        self.constructions.get()
    }
}

impl<T, F: Fn() -> T> Deref for LazyHolder<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        &**self.force()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_until_first_access() {
        let holder = LazyHolder::new(|| "instance".to_string());
        assert!(!holder.is_ready());
        assert_eq!(holder.constructions(), 0);
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_instance_constructs_exactly_once() {
        let holder = LazyHolder::new(|| vec![1, 2, 3]);

        let first = holder.instance();
        let second = holder.instance();

        assert!(Shared::ptr_eq(&first, &second));
        assert_eq!(holder.constructions(), 1);
        assert!(holder.is_ready());
    }

    #[test]
    fn test_deref_forces_construction() {
        let holder = LazyHolder::new(|| String::from("forced"));
        assert_eq!(holder.as_str(), "forced");
        assert_eq!(holder.constructions(), 1);
    }

    #[test]
    fn test_get_after_construction() {
        let holder = LazyHolder::new(|| 42u32);
        let constructed = holder.instance();
        let fetched = holder.get().unwrap();
        assert!(Shared::ptr_eq(&constructed, &fetched));
    }

    #[cfg(feature = "thread-safe")]
    mod concurrent {
        use super::*;
        use std::sync::Barrier;
        use std::thread;

        static SHARED_SEQUENCE: LazyHolder<Vec<u64>> = LazyHolder::new(|| (0..32).collect());

        #[test]
        fn test_racing_callers_share_one_instance() {
            let barrier = Barrier::new(16);

            let handles: Vec<Shared<Vec<u64>>> = thread::scope(|s| {
                let joins: Vec<_> = (0..16)
                    .map(|_| {
                        s.spawn(|| {
                            barrier.wait();
                            let handle = SHARED_SEQUENCE.instance();
                            assert_eq!(SHARED_SEQUENCE.constructions(), 1);
                            handle
                        })
                    })
                    .collect();
                joins.into_iter().map(|j| j.join().unwrap()).collect()
            });

            assert_eq!(SHARED_SEQUENCE.constructions(), 1);
            let first = &handles[0];
            assert!(handles.iter().all(|h| Shared::ptr_eq(first, h)));
        }

        static SELF_REFERENTIAL: LazyHolder<u32> = LazyHolder::new(|| *SELF_REFERENTIAL.instance());

        #[test]
        #[should_panic(expected = "Recursive construction detected")]
        fn test_recursive_construction_panics_instead_of_deadlocking() {
            SELF_REFERENTIAL.instance();
        }
    }
}
