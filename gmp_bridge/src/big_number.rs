//! The arithmetic side of the bridge. All of the actual math is GMP's;
//! this module only owns an `mpz_t` for the duration of one computation
//! and makes sure it is cleared on every way out.

use crate::errors::BridgeError;
use crate::gmp_string::GmpString;
use gmp_mpfr_sys::gmp;
use std::ffi::{c_int, c_ulong};
use std::mem::MaybeUninit;
use tracing::debug;

/// Base of the exported constant.
pub const CONSTANT_BASE: u32 = 2;

/// Exponent of the exported constant.
pub const CONSTANT_EXPONENT: u32 = 256;

/// The exported constant is rendered in decimal.
pub const DECIMAL_RADIX: i32 = 10;

/// 2^256 - 1, as the bridge must render it.
pub const EXPECTED_CONSTANT: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// An initialized GMP integer that is cleared when it goes out of scope.
pub(crate) struct ScopedMpz {
    raw: gmp::mpz_t,
}

impl ScopedMpz {
    /// A fresh integer with value zero.
    pub(crate) fn new() -> Self {
        let mut raw = MaybeUninit::<gmp::mpz_t>::uninit();
        // Safety: mpz_init fully initializes the struct. mpz_t holds no
        // pointers into itself, so moving it afterwards is fine.
        unsafe {
            gmp::mpz_init(raw.as_mut_ptr());
            Self { raw: raw.assume_init() }
        }
    }

    /// self = base^exponent
    pub(crate) fn assign_ui_pow_ui(&mut self, base: u32, exponent: u32) {
        unsafe { gmp::mpz_ui_pow_ui(&mut self.raw, c_ulong::from(base), c_ulong::from(exponent)) };
    }

    /// self = self - rhs
    pub(crate) fn sub_assign_ui(&mut self, rhs: u32) {
        let raw: *mut gmp::mpz_t = &mut self.raw;
        unsafe { gmp::mpz_sub_ui(raw, raw, c_ulong::from(rhs)) };
    }

    /// Number of significant bits in the absolute value.
    pub(crate) fn bit_len(&self) -> usize {
        unsafe { gmp::mpz_sizeinbase(&self.raw, 2) }
    }

    /// Render in `radix` into a freshly GMP-allocated string.
    pub(crate) fn to_string_radix(&self, radix: i32) -> Result<GmpString, BridgeError> {
        if !(2..=62).contains(&radix) {
            return Err(BridgeError::InvalidRadix(radix));
        }
        // Safety: a null destination makes GMP allocate the block itself,
        // sized strlen + 1.
        let ptr = unsafe { gmp::mpz_get_str(std::ptr::null_mut(), radix as c_int, &self.raw) };
        unsafe { GmpString::from_gmp(ptr) }.ok_or(BridgeError::RenderFailed)
    }
}

impl Drop for ScopedMpz {
    fn drop(&mut self) {
        unsafe { gmp::mpz_clear(&mut self.raw) };
    }
}

/// Compute `base^exponent - 1` and render it in `radix`. The intermediate
/// integer is released before this returns, whether or not rendering
/// succeeded; only the string escapes.
pub fn power_minus_one(base: u32, exponent: u32, radix: i32) -> Result<GmpString, BridgeError> {
    let mut value = ScopedMpz::new();
    value.assign_ui_pow_ui(base, exponent);
    value.sub_assign_ui(1);
    debug!(base, exponent, bits = value.bit_len(), "Computed power minus one");
    value.to_string_radix(radix)
}

/// 2^256 - 1 in decimal.
pub fn compute_constant() -> Result<GmpString, BridgeError> {
    power_minus_one(CONSTANT_BASE, CONSTANT_EXPONENT, DECIMAL_RADIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_matches_the_known_digits() {
        let digits = compute_constant().expect("compute");
        assert_eq!(digits, EXPECTED_CONSTANT);
        assert_eq!(digits.len(), 78);
        assert!(digits.as_c_str().to_bytes().iter().all(u8::is_ascii_digit));
    }

    #[test]
    fn constant_is_all_ones_in_binary() {
        let bits = power_minus_one(2, 256, 2).expect("compute");
        assert_eq!(bits.len(), 256);
        assert!(bits.as_c_str().to_bytes().iter().all(|b| *b == b'1'));
    }

    #[test]
    fn other_powers_and_radices() {
        assert_eq!(power_minus_one(10, 3, 10).expect("compute"), "999");
        assert_eq!(power_minus_one(2, 64, 16).expect("compute"), "ffffffffffffffff");
        assert_eq!(power_minus_one(2, 0, 10).expect("compute"), "0");
        assert_eq!(power_minus_one(0, 3, 10).expect("compute"), "-1");
        assert_eq!(power_minus_one(62, 1, 62).expect("compute"), "z");
    }

    #[test]
    fn unsupported_radix_is_rejected() {
        assert_eq!(power_minus_one(2, 8, 1).unwrap_err(), BridgeError::InvalidRadix(1));
        assert_eq!(power_minus_one(2, 8, 63).unwrap_err(), BridgeError::InvalidRadix(63));
        assert_eq!(power_minus_one(2, 8, -16).unwrap_err(), BridgeError::InvalidRadix(-16));
    }

    #[test]
    fn scoped_value_tracks_bit_length() {
        let mut z = ScopedMpz::new();
        assert_eq!(z.to_string_radix(10).expect("render"), "0");
        z.assign_ui_pow_ui(2, 256);
        assert_eq!(z.bit_len(), 257);
        z.sub_assign_ui(1);
        assert_eq!(z.bit_len(), 256);
    }
}
