//! Thread-local guard for detecting re-entrant construction.
//!
//! This module provides [`ConstructGuard`], which tracks the holders whose
//! construction is currently in flight on the calling thread. A construction
//! closure that loops back into the holder being built would otherwise
//! deadlock on the holder's non-reentrant lock; the guard turns that into a
//! reported error carrying the chain of payload type names.
//!
//! Holders are tracked by address, so nesting the construction of *different*
//! holders (even holders of the same payload type) is allowed.
//!
//! # Example
//! ```
//! use lasi::{ConstructGuard, ErrorKind};
//!
//! // Entering two different holders nests fine
//! let _g1 = ConstructGuard::enter(0x1000, "A").unwrap();
//! let _g2 = ConstructGuard::enter(0x2000, "B").unwrap();
//! // Entering the first one again is re-entrant construction
//! let err = ConstructGuard::enter(0x1000, "A").unwrap_err();
//! assert!(matches!(err.kind, ErrorKind::RecursiveConstruction));
//! ```

use std::cell::RefCell;

use crate::Error;

thread_local! {
    // Holders under construction on this thread: (holder address, payload type name).
    static CONSTRUCT_STACK: RefCell<Vec<(usize, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the last entered holder from the thread-local stack on drop.
///
/// Used to track the constructions in flight on the current thread.
#[derive(Debug)]
pub struct ConstructGuard {
    pub type_name: &'static str,
}

impl ConstructGuard {
    /// Try to mark the holder at `key` as under construction on this thread.
    ///
    /// Returns `Err(Error::recursive_construction(..))` if that holder is
    /// already being constructed here. Otherwise, returns a guard that will
    /// unmark the holder on drop.
    pub fn enter(key: usize, type_name: &'static str) -> Result<Self, Error> {
        CONSTRUCT_STACK.with(|stack| {
            let mut v = stack.borrow_mut();
            if v.iter().any(|(k, _)| *k == key) {
                // Build chain: constructions in flight + the repeated one
                let mut chain: Vec<&str> = v.iter().map(|(_, name)| *name).collect();
                chain.push(type_name);
                return Err(Error::recursive_construction(&chain));
            }
            v.push((key, type_name));
            Ok(ConstructGuard { type_name })
        })
    }
}

impl Drop for ConstructGuard {
    fn drop(&mut self) {
        CONSTRUCT_STACK.with(|stack| {
            let mut v = stack.borrow_mut();
            v.pop();
        });
    }
}
