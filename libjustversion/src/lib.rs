//! A dynamic library exposing only function `rustgreetings_abi_version`
//!
//! The host probes this single symbol before binding the rest of the API,
//! so loading this library passes the version check and then fails on the missing symbols.

#[no_mangle]
pub extern "C" fn rustgreetings_abi_version() -> u32 {
    1
}
