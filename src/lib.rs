//! Host side of the rustgreetings boundary
//!
//! Loads the core as a shared library and calls it the same way a mobile UI does:
//! one call per greeting, one release per returned string.

pub use error::{GreetError, Result};
pub use greetings_library::{Greeting, GreetingsLibrary};

mod error;
pub mod greetings_library;
