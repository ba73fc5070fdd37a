//! Error types for lazy shared-instance construction.
//!
//! This module defines a lightweight error model used by the holders to
//! describe failures that can occur while constructing the shared instance.
//!
//! # Design
//!
//! - `ErrorKind` captures the error category.
//! - `Error` stores the category and a human-readable message.
//!
//! The helpers in `Error` are provided to keep call sites concise and to
//! maintain consistent error messages.
//!
//! # Feature Flags
//!
//! - `tracing`: logs errors when they are created.
//! - `debug`: enables extra diagnostic formatting in `Display`.
//!
//! # Examples
//!
//! ```
//! use lasi::error::Error;
//!
//! let err = Error::construction_failed("Registry", "backing file missing");
//! assert!(err.message.contains("Registry"));
//! ```

use core::fmt;

#[cfg(feature = "tracing")]
use tracing::error;

/// Error categories for shared-instance construction.
///
/// These variants are intentionally coarse-grained: a holder either failed to
/// build its instance, or its construction closure looped back into the
/// holder being built.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub enum ErrorKind {
    /// The construction closure reported a failure. Nothing is cached; a
    /// later call will run construction again.
    ConstructionFailed,
    /// The construction closure re-entered the holder it is constructing
    /// on the same thread.
    RecursiveConstruction,
}

/// Holder error structure.
///
/// `kind` enables programmatic handling, while `message` is human-readable.
#[derive(Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// If the `tracing` feature is enabled, the error is automatically logged.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let error = Self {
            kind: kind.clone(),
            message: message.into(),
        };

        #[cfg(feature = "tracing")]
        error!("{}", error);

        error
    }

    /// Construction of the shared instance failed.
    ///
    /// `reason` comes from the construction closure; the holder stays empty
    /// and the next call retries.
    pub fn construction_failed(type_name: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ConstructionFailed,
            format!("Failed to construct shared instance of {}: {}", type_name, reason),
        )
    }

    /// The construction closure re-entered its own holder.
    ///
    /// `construction_chain` lists the payload types whose construction was in
    /// flight on this thread, outermost first, ending with the repeated one.
    pub fn recursive_construction(construction_chain: &[&str]) -> Self {
        Self::new(
            ErrorKind::RecursiveConstruction,
            format!(
                "Recursive construction detected: {}",
                construction_chain.join(" -> ")
            ),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "debug")]
        {
            write!(f, "({:?}) - {}", self.kind, self.message)
        }
        #[cfg(not(feature = "debug"))]
        {
            write!(f, "{}", self.message)
        }
    }
}

#[cfg(feature = "debug")]
impl std::error::Error for Error {}
