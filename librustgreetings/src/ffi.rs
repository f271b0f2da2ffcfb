//! C ABI of the greeting core
//!
//! Ownership rules:
//! * name bytes stay owned by the caller and are only read during the call
//! * every non-null string returned by [`rustgreetings_say_hello`] or [`rust_greeting`]
//!   is owned by the caller and must be passed to [`rust_greeting_free`] exactly once
//! * strings from [`rustgreetings_status_message`] are static and must not be released
//!
//! All exported functions use the default configuration and keep no state between calls.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use crate::error::{GreetingError, GreetingStatus};
use crate::service::{GreetingRequest, GreetingResult, GreetingService};

/// Bumped on every incompatible change of the exported symbols.
pub const ABI_VERSION: u32 = 1;

#[no_mangle]
pub extern "C" fn rustgreetings_abi_version() -> u32 {
    ABI_VERSION
}

/// Greets `len` bytes of UTF-8 at `name`, storing the result into `*out`.
///
/// Returns a [`GreetingStatus`] code. On success `*out` holds the greeting,
/// otherwise `*out` is set to null and nothing needs to be released.
/// A null `name` with zero `len` is an empty name.
///
/// # Safety
/// `name` must be readable for `len` bytes (or null with `len == 0`),
/// `out` must be null or valid for a pointer write.
#[no_mangle]
pub unsafe extern "C" fn rustgreetings_say_hello(name: *const u8, len: usize, out: *mut *mut c_char) -> u32 {
    if out.is_null() {
        log::debug!("rustgreetings_say_hello: null output pointer");
        return GreetingStatus::InvalidArgument as u32;
    }
    out.write(ptr::null_mut());
    let bytes: &[u8] = match (name.is_null(), len) {
        (true, 0) => &[],
        (true, _) => {
            log::debug!("rustgreetings_say_hello: null name with len={len}");
            return GreetingError::InvalidArgument("null name").status() as u32;
        }
        (false, _) => std::slice::from_raw_parts(name, len),
    };
    match GreetingService::DEFAULT.say_hello(GreetingRequest::new(bytes)) {
        Ok(greeting) => {
            out.write(greeting.into_raw());
            GreetingStatus::Ok as u32
        }
        Err(e) => e.status() as u32,
    }
}

/// Greets a NUL-terminated name; returns null on any failure.
///
/// # Safety
/// `to` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn rust_greeting(to: *const c_char) -> *mut c_char {
    if to.is_null() {
        return ptr::null_mut();
    }
    let name = CStr::from_ptr(to);
    match GreetingService::DEFAULT.say_hello(GreetingRequest::new(name.to_bytes())) {
        Ok(greeting) => greeting.into_raw(),
        Err(e) => {
            log::debug!("rust_greeting: {e}");
            ptr::null_mut()
        }
    }
}

/// Releases a greeting returned by this library. Null is ignored.
///
/// # Safety
/// `s` must come from [`rust_greeting`] or [`rustgreetings_say_hello`] and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn rust_greeting_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    drop(GreetingResult::from_raw(s));
}

/// Static, NUL-terminated description of a status code.
#[no_mangle]
pub extern "C" fn rustgreetings_status_message(status: u32) -> *const c_char {
    GreetingStatus::raw_message(status)
}
