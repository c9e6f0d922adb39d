#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]

//! FFI-bindings for GMP. This crate provides a C ABI over a small slice of
//! the GNU Multiple Precision library, suitable for loading from a managed
//! runtime (Dart FFI, C# P/Invoke and friends).
//!
//! Two things cross the boundary: GMP's static version string, and the
//! decimal rendering of 2^256 - 1. The latter is allocated by GMP and owned
//! by the caller once it is returned; hand it back to [`free_big_number`]
//! to release it through the same allocator that produced it.
//!
//! Releasing with C `free` still works, since GMP's default allocator is
//! `malloc`, but the bridge cannot see it: the double-release check in
//! [`free_big_number`] and the count from [`outstanding_big_numbers`] only
//! hold for callers that never mix in C `free`.
//!
//! The release tests are worth running under AddressSanitizer on nightly:
//!
//! ```text
//! RUSTFLAGS="-Zsanitizer=address" cargo +nightly test -p gmp_bridge \
//!     --target x86_64-unknown-linux-gnu
//! ```
//!
//! Everything is synchronous and runs on the caller's thread.

mod allocation_handler;
pub mod big_number;
mod errors;
mod exports;
mod gmp_string;
mod logging;
pub mod version;

pub use errors::{BridgeError, BridgeStatus};
pub use exports::{calculate_big_number, free_big_number, get_gmp_version, outstanding_big_numbers};
pub use gmp_string::GmpString;
pub use logging::{setup_logging, LogVerbosity};
