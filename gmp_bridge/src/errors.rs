//! Error types for the bridge. Rust callers get a [`BridgeError`]; the
//! C ABI flattens it into a [`BridgeStatus`] code, since nothing richer
//! survives the trip into the managed runtime.

use strum::FromRepr;
use thiserror::Error;

/// Everything that can go wrong inside the bridge. GMP allocation failure
/// is not listed: GMP aborts the process and we don't intercept it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// GMP only renders bases 2 through 62.
    #[error("radix {0} is outside GMP's supported range 2..=62")]
    InvalidRadix(i32),

    /// `mpz_get_str` handed back a null pointer.
    #[error("GMP returned no string while rendering a big number")]
    RenderFailed,

    /// A null pointer was passed where an issued string was expected.
    #[error("a null pointer was passed for release")]
    NullPointer,

    /// The pointer was never issued by this bridge, or has already been
    /// released.
    #[error("pointer {0:#x} was not issued by this bridge or has already been released")]
    UnknownPointer(usize),

    /// Another global `tracing` subscriber got there first.
    #[error("could not install the logging subscriber: {0}")]
    LoggingUnavailable(String),
}

/// Status codes returned over the C ABI. Zero is success, everything
/// else is negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromRepr)]
#[repr(i32)]
pub enum BridgeStatus {
    /// The call succeeded.
    Ok = 0,
    /// A null pointer was supplied.
    NullPointer = -1,
    /// The pointer is unknown, most likely a double release.
    UnknownPointer = -2,
    /// Logging could not be installed.
    LoggingUnavailable = -3,
    /// GMP failed to render a string.
    RenderFailed = -4,
    /// The requested radix is not supported by GMP.
    InvalidRadix = -5,
}

impl From<&BridgeError> for BridgeStatus {
    fn from(error: &BridgeError) -> Self {
        match error {
            BridgeError::InvalidRadix(_) => Self::InvalidRadix,
            BridgeError::RenderFailed => Self::RenderFailed,
            BridgeError::NullPointer => Self::NullPointer,
            BridgeError::UnknownPointer(_) => Self::UnknownPointer,
            BridgeError::LoggingUnavailable(_) => Self::LoggingUnavailable,
        }
    }
}

impl BridgeStatus {
    /// Collapse a result into the code handed to the foreign caller.
    pub fn from_result<T>(result: &Result<T, BridgeError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.into(),
        }
    }
}
