//! Handing raw strings to a foreign caller is error-prone: the caller has
//! to free them exactly once, with the right allocator. This handler keeps
//! a table of every string that is currently out with the caller, so a
//! release can be checked before anything is actually freed.

use crate::errors::BridgeError;
use crate::gmp_string::GmpString;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::c_char;
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

pub(crate) struct AllocationHandler {
    /// Address -> allocation size (NUL included).
    live: Mutex<HashMap<usize, usize>>,
}

impl AllocationHandler {
    pub(crate) fn new() -> Self {
        Self {
            live: Mutex::new(HashMap::new()),
        }
    }

    // Every critical section is a single insert or remove, so a poisoned
    // map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<usize, usize>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand a string over to the caller. The returned pointer stays valid
    /// until it comes back through [`AllocationHandler::release`].
    pub(crate) fn issue(&self, string: GmpString) -> *mut c_char {
        let (ptr, size) = string.into_raw();
        // A caller that freed an earlier string with its own `free` leaves
        // a stale entry behind; if GMP reuses the address we just overwrite.
        self.lock().insert(ptr as usize, size);
        debug!(address = ptr as usize, size, "Issued big number string");
        ptr
    }

    /// Take back ownership of an issued string. Pointers that are not in
    /// the table are refused and left untouched.
    pub(crate) fn reclaim(&self, ptr: *mut c_char) -> Result<GmpString, BridgeError> {
        let Some(non_null) = NonNull::new(ptr) else {
            return Err(BridgeError::NullPointer);
        };
        let address = ptr as usize;
        let Some(size) = self.lock().remove(&address) else {
            error!(address, "Refusing to release a pointer this bridge did not issue (double free?)");
            return Err(BridgeError::UnknownPointer(address));
        };
        // Safety: the entry was created by `issue` from this exact pointer
        // and size, and removing it guarantees we are the only reclaimer.
        Ok(unsafe { GmpString::from_raw_parts(non_null, size) })
    }

    /// Release an issued string through GMP's allocator.
    pub(crate) fn release(&self, ptr: *mut c_char) -> Result<(), BridgeError> {
        let string = self.reclaim(ptr)?;
        debug!(address = ptr as usize, size = string.len() + 1, "Releasing big number string");
        drop(string);
        Ok(())
    }

    /// How many issued strings have not been released yet.
    pub(crate) fn outstanding(&self) -> usize {
        self.lock().len()
    }
}

// This is a static to keep the interface sane.
static ALLOCATIONS: Lazy<AllocationHandler> = Lazy::new(AllocationHandler::new);

pub(crate) fn allocations() -> &'static AllocationHandler {
    &ALLOCATIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::big_number::power_minus_one;
    use std::ffi::CString;

    #[test]
    fn issue_then_release_balances() {
        let handler = AllocationHandler::new();
        let ptr = handler.issue(power_minus_one(10, 2, 10).expect("compute"));
        assert_eq!(handler.outstanding(), 1);
        assert_eq!(handler.release(ptr), Ok(()));
        assert_eq!(handler.outstanding(), 0);
    }

    #[test]
    fn reclaimed_string_is_intact() {
        let handler = AllocationHandler::new();
        let ptr = handler.issue(power_minus_one(2, 10, 10).expect("compute"));
        let back = handler.reclaim(ptr).expect("reclaim");
        assert_eq!(back, "1023");
    }

    #[test]
    fn null_is_refused() {
        let handler = AllocationHandler::new();
        assert_eq!(handler.release(std::ptr::null_mut()), Err(BridgeError::NullPointer));
    }

    #[test]
    fn foreign_pointer_is_refused_and_not_freed() {
        let handler = AllocationHandler::new();
        let foreign = CString::new("123").expect("cstring");
        let ptr = foreign.as_ptr() as *mut c_char;
        assert_eq!(handler.release(ptr), Err(BridgeError::UnknownPointer(ptr as usize)));
        // Still ours, still readable.
        assert_eq!(foreign.to_str(), Ok("123"));
    }

    #[test]
    fn handlers_do_not_share_entries() {
        let first = AllocationHandler::new();
        let second = AllocationHandler::new();
        let ptr = first.issue(power_minus_one(3, 3, 10).expect("compute"));
        assert_eq!(second.outstanding(), 0);
        assert!(matches!(second.release(ptr), Err(BridgeError::UnknownPointer(_))));
        assert_eq!(first.release(ptr), Ok(()));
    }
}
