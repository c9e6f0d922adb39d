//! Strings allocated by GMP's allocator. They have to go back through
//! GMP's free function (with the size they were allocated at), not
//! through Rust's allocator, so they get their own owning type.

use gmp_mpfr_sys::gmp;
use std::ffi::{c_char, c_void, CStr};
use std::fmt;
use std::ptr::NonNull;
use std::str::Utf8Error;

/// An owned, NUL-terminated string allocated by GMP. Dropping it releases
/// the buffer through GMP's registered free function.
pub struct GmpString {
    ptr: NonNull<c_char>,
    /// Allocation size in bytes, NUL included.
    size: usize,
}

// Safety: the buffer is uniquely owned and GMP's default free function is
// safe to call from any thread.
unsafe impl Send for GmpString {}
unsafe impl Sync for GmpString {}

impl GmpString {
    /// Take ownership of a string returned by `mpz_get_str(NULL, ..)`.
    /// GMP sizes that block at exactly `strlen + 1` bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a NUL-terminated buffer allocated by GMP's
    /// current allocate function, and nobody else may free it.
    pub(crate) unsafe fn from_gmp(ptr: *mut c_char) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        let size = CStr::from_ptr(ptr.as_ptr()).to_bytes_with_nul().len();
        Some(Self { ptr, size })
    }

    /// Rebuild a string previously split by [`GmpString::into_raw`].
    ///
    /// # Safety
    ///
    /// `ptr` and `size` must come from the same `into_raw` call, and the
    /// buffer must not have been released in the meantime.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<c_char>, size: usize) -> Self {
        Self { ptr, size }
    }

    /// Give up ownership. The buffer is no longer released on drop; the
    /// returned pointer and size are needed to release it later.
    pub fn into_raw(self) -> (*mut c_char, usize) {
        let parts = (self.ptr.as_ptr(), self.size);
        std::mem::forget(self);
        parts
    }

    /// Borrow as a C string.
    pub fn as_c_str(&self) -> &CStr {
        // Safety: the buffer is NUL-terminated and lives as long as self.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Borrow as UTF-8. GMP only emits ASCII digits, letters and `-`.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        self.as_c_str().to_str()
    }

    /// Number of characters, NUL excluded.
    pub fn len(&self) -> usize {
        self.size - 1
    }

    /// True for the empty string. GMP never produces one.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for GmpString {
    fn drop(&mut self) {
        tracing::trace!(size = self.size, "Releasing GMP string");
        // Safety: we own the buffer and it was allocated by GMP.
        unsafe { gmp_free(self.ptr.as_ptr().cast(), self.size) };
    }
}

impl fmt::Display for GmpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_c_str().to_string_lossy())
    }
}

impl fmt::Debug for GmpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GmpString").field(&self.as_c_str()).finish()
    }
}

impl PartialEq<str> for GmpString {
    fn eq(&self, other: &str) -> bool {
        self.as_c_str().to_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for GmpString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Release a block through whatever free function GMP currently has
/// registered. With the defaults this is C `free`.
unsafe fn gmp_free(ptr: *mut c_void, size: usize) {
    let mut free_fn: gmp::free_function = None;
    gmp::get_memory_functions(std::ptr::null_mut(), std::ptr::null_mut(), &mut free_fn);
    match free_fn {
        Some(free_fn) => free_fn(ptr, size),
        None => tracing::error!("GMP reported no free function; leaking {size} bytes"),
    }
}
