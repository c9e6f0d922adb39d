//! GMP's version string. It lives in GMP's static data, so nothing here
//! allocates and nothing is ever freed.

use gmp_mpfr_sys::gmp;
use once_cell::sync::Lazy;
use std::ffi::CStr;

/// The version of the linked GMP library, e.g. `6.3.0`.
pub fn gmp_version() -> &'static CStr {
    // Safety: `gmp_version` is a NUL-terminated constant that GMP defines
    // once at link time and never mutates.
    unsafe { CStr::from_ptr(gmp::version) }
}

static VERSION_STR: Lazy<String> = Lazy::new(|| gmp_version().to_string_lossy().to_string());

/// [`gmp_version`] decoded as UTF-8, for logging and Rust callers.
pub fn gmp_version_str() -> &'static str {
    VERSION_STR.as_str()
}
