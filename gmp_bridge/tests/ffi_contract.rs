//! Exercises the exported C symbols the way a foreign caller would:
//! through raw pointers only.

use gmp_bridge::big_number::EXPECTED_CONSTANT;
use gmp_bridge::{calculate_big_number, free_big_number, get_gmp_version, BridgeStatus};
use std::ffi::CStr;
use std::thread;

fn take_digits() -> String {
    let ptr = calculate_big_number();
    assert!(!ptr.is_null());
    let digits = unsafe { CStr::from_ptr(ptr) }.to_str().expect("ascii").to_string();
    assert_eq!(free_big_number(ptr), BridgeStatus::Ok as i32);
    digits
}

#[test]
fn version_is_static_and_repeatable() {
    let first = get_gmp_version();
    let second = get_gmp_version();
    assert!(!first.is_null());
    assert_eq!(first, second);
    let text = unsafe { CStr::from_ptr(first) };
    assert!(!text.to_bytes().is_empty());
    assert_eq!(text, unsafe { CStr::from_ptr(second) });
}

#[test]
fn big_number_is_two_to_the_256_minus_one() {
    let digits = take_digits();
    assert_eq!(digits, EXPECTED_CONSTANT);
    assert_eq!(digits.len(), 78);
    assert!(!digits.starts_with('0'));
    assert!(!digits.starts_with('-'));
    assert!(digits.bytes().all(|b| b.is_ascii_digit()));
}

#[test]
fn every_call_returns_a_fresh_buffer() {
    let a = calculate_big_number();
    let b = calculate_big_number();
    assert_ne!(a, b);
    assert_eq!(free_big_number(a), BridgeStatus::Ok as i32);
    assert_eq!(free_big_number(b), BridgeStatus::Ok as i32);
}

#[test]
fn concurrent_callers_all_see_the_right_value() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..200 {
                    assert_eq!(take_digits(), EXPECTED_CONSTANT);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

#[test]
fn null_release_is_reported() {
    assert_eq!(free_big_number(std::ptr::null_mut()), BridgeStatus::NullPointer as i32);
}
