//! Double-checked lazy holder for a single shared instance.
//!
//! This module defines [`Holder`], the manual-publication primitive: a
//! nullable slot guarded by a lock, a published flag for the warm path, and a
//! construction counter proving the constructor ran exactly once.
//!
//! # Overview
//!
//! A holder starts empty. The first call to [`get_or_init`](Holder::get_or_init)
//! (or its fallible sibling [`get_or_try_init`](Holder::get_or_try_init))
//! constructs the instance; every call, from any thread, returns a handle to
//! that same instance for the life of the holder. Callers need no external
//! synchronization.
//!
//! The slow path acquires the exclusive lock and **re-checks the slot** before
//! constructing: a caller that lost the construction race finds the winner's
//! instance there and returns it. The warm path never takes the exclusive
//! lock.
//!
//! # Feature Flags
//!
//! The holder implementation varies based on the `thread-safe` feature:
//! - **With `thread-safe`**: the slot is a read-write lock, the published flag
//!   and counter are atomics, and handles are `Arc`s
//! - **Without `thread-safe`**: single-threaded cells and `Rc` handles
//!
//! # Examples
//!
//! ```
//! use lasi::Holder;
//!
//! static REGISTRY: Holder<Vec<&'static str>> = Holder::new();
//!
//! let first = REGISTRY.get_or_init(|| vec!["a", "b"]);
//! let second = REGISTRY.get_or_init(|| unreachable!("already constructed"));
//!
//! assert!(lasi::runtime::Shared::ptr_eq(&first, &second));
//! assert_eq!(REGISTRY.constructions(), 1);
//! ```

use std::any::type_name;

#[cfg(feature = "thread-safe")]
use std::sync::{PoisonError, atomic::Ordering};

use crate::construct_guard::ConstructGuard;
use crate::error::Error;
use crate::runtime::{Counter, Flag, Shared, Store};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A lazily-constructed, exactly-once shared instance.
///
/// The holder owns the instance; callers receive [`Shared<T>`] handles. Only
/// the holder ever writes the slot, and only after the construction closure
/// has completed, so no caller can observe a partially-constructed value.
///
/// # Construction failure
///
/// [`get_or_try_init`](Holder::get_or_try_init) accepts a fallible closure.
/// On failure nothing is cached: the error goes to the caller whose attempt
/// failed and the next call runs construction again.
///
/// # Examples
///
/// ```
/// use lasi::Holder;
///
/// struct Service {
///     endpoint: String,
/// }
///
/// let holder = Holder::new();
/// let service = holder.get_or_init(|| Service {
///     endpoint: "localhost:9000".to_string(),
/// });
///
/// assert_eq!(service.endpoint, "localhost:9000");
/// assert!(holder.is_ready());
/// ```
pub struct Holder<T> {
    published: Flag,
    slot: Store<Option<Shared<T>>>,
    constructions: Counter,
}

impl<T> Holder<T> {
    /// Creates an empty holder.
    ///
    /// This is a `const fn`, so a holder can live in `static` position and
    /// exist before any concurrent access begins; the instance itself is
    /// only constructed on first demand.
    pub const fn new() -> Self {
        Self {
            published: Flag::new(false),
            slot: Store::new(None),
            constructions: Counter::new(0),
        }
    }
}

impl<T> Default for Holder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "thread-safe")]
impl<T> Holder<T> {
    /// Returns a handle to the instance, or `None` if it has not been
    /// constructed yet. Never constructs.
    pub fn get(&self) -> Option<Shared<T>> {
        if !self.published.load(Ordering::Acquire) {
            return None;
        }
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the instance, constructing it with `construct` if this is the
    /// first access.
    ///
    /// Callable concurrently from any number of threads; the closure runs at
    /// most once regardless of how many callers race here. Losers of the race
    /// block until the winner has finished, then receive the winner's
    /// instance.
    ///
    /// # Panics
    ///
    /// Panics if `construct` re-enters this holder on the same thread, which
    /// would otherwise deadlock on the internal lock.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasi::Holder;
    ///
    /// let holder = Holder::new();
    /// let value = holder.get_or_init(|| 42u32);
    /// assert_eq!(*value, 42);
    /// ```
    pub fn get_or_init<F>(&self, construct: F) -> Shared<T>
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok(construct())) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`get_or_init`](Holder::get_or_init).
    ///
    /// If `construct` returns an error, the holder stays empty, the error is
    /// returned to this caller, and a later call retries construction.
    /// Concurrent callers blocked on the failing attempt find the slot still
    /// empty and run their own attempt.
    pub fn get_or_try_init<F>(&self, construct: F) -> Result<Shared<T>, Error>
    where
        F: FnOnce() -> Result<T, Error>,
    {
        // Warm path: the Acquire load pairs with the Release store below, so
        // a published flag guarantees a fully-written slot and counter.
        if self.published.load(Ordering::Acquire) {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = slot.as_ref() {
                return Ok(value.clone());
            }
        }

        let _guard = ConstructGuard::enter(self as *const Self as usize, type_name::<T>())?;

        // A closure that panicked mid-construction leaves the lock poisoned
        // but the slot untouched; recovering the guard keeps the holder
        // retryable.
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

        // Re-check under the lock: another caller may have constructed while
        // this one waited. Skipping this check would construct twice.
        if let Some(value) = slot.as_ref() {
            return Ok(value.clone());
        }

        #[cfg(feature = "tracing")]
        debug!("constructing shared instance of {}", type_name::<T>());

        let value = Shared::new(construct()?);
        *slot = Some(value.clone());
        self.constructions.fetch_add(1, Ordering::Relaxed);
        // Publish last: everything above is sequenced before this store.
        self.published.store(true, Ordering::Release);

        Ok(value)
    }

    /// Whether the instance has been constructed.
    pub fn is_ready(&self) -> bool {
        self.published.load(Ordering::Acquire)
    }

    /// How many times the construction closure has completed successfully.
    ///
    /// 0 before first access, 1 forever after, at any concurrency level.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }
}

#[cfg(not(feature = "thread-safe"))]
impl<T> Holder<T> {
    /// Returns a handle to the instance, or `None` if it has not been
    /// constructed yet. Never constructs.
    pub fn get(&self) -> Option<Shared<T>> {
        self.slot.borrow().clone()
    }

    /// Returns the instance, constructing it with `construct` if this is the
    /// first access.
    ///
    /// This is the single-threaded variant: once-only construction and
    /// identity hold without any locking.
    ///
    /// # Panics
    ///
    /// Panics if `construct` re-enters this holder.
    pub fn get_or_init<F>(&self, construct: F) -> Shared<T>
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok(construct())) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`get_or_init`](Holder::get_or_init).
    ///
    /// If `construct` returns an error, the holder stays empty and a later
    /// call retries construction.
    pub fn get_or_try_init<F>(&self, construct: F) -> Result<Shared<T>, Error>
    where
        F: FnOnce() -> Result<T, Error>,
    {
        if let Some(value) = self.slot.borrow().as_ref() {
            return Ok(value.clone());
        }

        let _guard = ConstructGuard::enter(self as *const Self as usize, type_name::<T>())?;

        #[cfg(feature = "tracing")]
        debug!("constructing shared instance of {}", type_name::<T>());

        let value = Shared::new(construct()?);
        *self.slot.borrow_mut() = Some(value.clone());
        self.constructions.set(self.constructions.get() + 1);
        self.published.set(true);

        Ok(value)
    }

    /// Whether the instance has been constructed.
    pub fn is_ready(&self) -> bool {
        self.published.get()
    }

    /// How many times the construction closure has completed successfully.
    pub fn constructions(&self) -> usize {
        self.constructions.get()
    }
}
