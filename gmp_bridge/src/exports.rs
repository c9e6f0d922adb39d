//! Module containing all the FFI exports for GMP.
//! These are using the C ABI and are intended to be used by other languages.

use crate::allocation_handler::allocations;
use crate::big_number::compute_constant;
use crate::errors::BridgeStatus;
use crate::version::gmp_version;
use std::ffi::c_char;

/// Returns the version of the linked GMP library.
///
/// The string belongs to GMP and lives for the whole process. Do **not**
/// free it.
#[no_mangle]
pub extern "C" fn get_gmp_version() -> *const c_char {
    gmp_version().as_ptr()
}

/// Calculates 2^256 - 1 and returns it as a NUL-terminated decimal string.
///
/// The caller owns the returned string and must release it exactly once,
/// preferably with [`free_big_number`]. It is allocated by GMP's default
/// allocator, so older callers that release it with C `free` keep working;
/// mixing the two for the same pointer is undefined behaviour.
///
/// Return values:
/// - The digits, or null if GMP could not render them.
#[no_mangle]
pub extern "C" fn calculate_big_number() -> *mut c_char {
    match compute_constant() {
        Ok(digits) => allocations().issue(digits),
        Err(e) => {
            tracing::error!("Error calculating big number: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Releases a string returned by [`calculate_big_number`].
///
/// Parameters:
/// - `digits`: the pointer exactly as it was returned.
///
/// Return values:
/// - 0 if the string was released.
/// - -1 if `digits` is null.
/// - -2 if `digits` was not issued by this library or was already released.
///   Nothing is freed in that case.
///
/// The double-release check only holds for callers that never release
/// results with C `free`. A string freed that way stays in the table, and
/// once the allocator reuses its address for something else, passing that
/// address here would free the unrelated block.
#[no_mangle]
pub extern "C" fn free_big_number(digits: *mut c_char) -> i32 {
    let result = allocations().release(digits);
    if let Err(e) = &result {
        tracing::warn!("free_big_number: {e}");
    }
    BridgeStatus::from_result(&result) as i32
}

/// Number of strings from [`calculate_big_number`] that have not been
/// released through [`free_big_number`] yet. Useful for leak checks.
///
/// Strings released with C `free` are never subtracted, so the count only
/// means something for callers that use [`free_big_number`] exclusively.
#[no_mangle]
pub extern "C" fn outstanding_big_numbers() -> u64 {
    allocations().outstanding() as u64
}
