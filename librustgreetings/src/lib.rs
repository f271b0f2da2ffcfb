//! Greeting core with a C-compatible boundary
//!
//! The Rust API lives in [`service`]; the exported symbols live in [`ffi`].
//! Every string handed out through the C ABI must be released exactly once
//! with `rust_greeting_free`.

pub use config::GreetingConfig;
pub use error::{GreetingError, GreetingStatus, Result};
pub use service::{GreetingRequest, GreetingResult, GreetingService};

pub mod config;
mod error;
pub mod ffi;
pub mod service;
