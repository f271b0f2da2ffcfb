//! Runtime binding of the shared library "rustgreetings"
//!
//! The version symbol is probed on its own first; the full API is only bound
//! once the library reports an ABI version we understand.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::ptr;

use dlopen2::wrapper::Container;
use dlopen2::wrapper::WrapperApi;
use rustgreetings::ffi::ABI_VERSION;
use rustgreetings::GreetingStatus;

use crate::error::{self, GreetError};

#[derive(dlopen2_derive::WrapperApi)]
pub struct GreetingsVersionBindings {
    #[dlopen2_name = "rustgreetings_abi_version"]
    abi_version: unsafe extern "C" fn() -> u32,
}

#[derive(dlopen2_derive::WrapperApi)]
pub struct GreetingsBindings {
    #[dlopen2_name = "rustgreetings_abi_version"]
    abi_version: unsafe extern "C" fn() -> u32,
    #[dlopen2_name = "rustgreetings_say_hello"]
    say_hello: unsafe extern "C" fn(name: *const u8, len: usize, out: *mut *mut c_char) -> u32,
    #[dlopen2_name = "rust_greeting"]
    greeting: unsafe extern "C" fn(to: *const c_char) -> *mut c_char,
    #[dlopen2_name = "rust_greeting_free"]
    greeting_free: unsafe extern "C" fn(s: *mut c_char),
    #[dlopen2_name = "rustgreetings_status_message"]
    status_message: unsafe extern "C" fn(status: u32) -> *const c_char,
}

pub struct GreetingsLibrary {
    api: Container<GreetingsBindings>,
    path: PathBuf,
    abi_version: u32,
}

impl GreetingsLibrary {

    pub fn open<P: AsRef<Path>>(libname: P) -> error::Result<Self> {
        let path = libname.as_ref().canonicalize()?;
        log::debug!("Opening library: '{}'", path.display());
        let version_api: Container<GreetingsVersionBindings> = unsafe { Container::load(&path) }?;
        let abi_version = unsafe { version_api.abi_version() };
        if abi_version != ABI_VERSION {
            return Err(GreetError::UnsupportedAbi(path.display().to_string(), abi_version));
        }
        log::debug!("ABI version: {abi_version}");
        let api: Container<GreetingsBindings> = unsafe { Container::load(&path) }?;
        Ok(Self { api, path, abi_version })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Greets raw name bytes; the library validates the encoding.
    pub fn say_hello(&self, name: &[u8]) -> error::Result<Greeting<'_>> {
        let mut out = ptr::null_mut();
        let code = unsafe { self.api.say_hello(name.as_ptr(), name.len(), &mut out) };
        log::trace!("rustgreetings_say_hello(len={}) -> {code}", name.len());
        match GreetingStatus::from_raw(code) {
            Some(GreetingStatus::Ok) if !out.is_null() => Ok(Greeting { lib: self, ptr: out }),
            Some(GreetingStatus::Ok) => Err(GreetError::Rejected(GreetingStatus::AllocationFailure)),
            Some(status) => Err(GreetError::Rejected(status)),
            None => Err(GreetError::UnknownStatus(code)),
        }
    }

    /// The single-call form; `None` is the only failure signal it has.
    pub fn greet(&self, name: &CStr) -> Option<Greeting<'_>> {
        let ptr = unsafe { self.api.greeting(name.as_ptr()) };
        if ptr.is_null() {
            None
        } else {
            Some(Greeting { lib: self, ptr })
        }
    }

    pub fn status_message(&self, status: u32) -> Cow<str> {
        unsafe { CStr::from_ptr(self.api.status_message(status)) }.to_string_lossy()
    }
}

/// Greeting text owned by the library's allocator, released on drop.
pub struct Greeting<'a> {
    lib: &'a GreetingsLibrary,
    ptr: *mut c_char,
}

impl<'a> Greeting<'a> {
    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: non-null and NUL-terminated until we release it in `drop`.
        unsafe { CStr::from_ptr(self.ptr) }
    }

    pub fn to_str(&self) -> error::Result<&str> {
        Ok(self.as_c_str().to_str()?)
    }

    pub fn to_string_lossy(&self) -> Cow<str> {
        self.as_c_str().to_string_lossy()
    }
}

impl<'a> fmt::Display for Greeting<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<'a> fmt::Debug for Greeting<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Greeting").field(&self.as_c_str()).finish()
    }
}

impl<'a> Drop for Greeting<'a> {
    fn drop(&mut self) {
        log::trace!("calling rust_greeting_free()");
        unsafe { self.lib.api.greeting_free(self.ptr) }
    }
}
