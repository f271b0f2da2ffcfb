//! The greeting computation itself
//!
//! Pure and stateless: a [`GreetingService`] only holds its immutable configuration,
//! so one instance can be shared between threads without coordination.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::config::GreetingConfig;
use crate::error::{GreetingError, Result};

/// Caller-owned name bytes, borrowed for the duration of one call.
#[derive(Copy, Clone, Debug)]
pub struct GreetingRequest<'a> {
    name: &'a [u8],
}

impl<'a> GreetingRequest<'a> {
    pub fn new(name: &'a [u8]) -> Self {
        Self { name }
    }

    pub fn name_bytes(&self) -> &'a [u8] {
        self.name
    }
}

impl<'a> From<&'a str> for GreetingRequest<'a> {
    fn from(name: &'a str) -> Self {
        Self::new(name.as_bytes())
    }
}

/// A freshly allocated, NUL-free greeting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingResult {
    text: CString,
}

impl GreetingResult {
    pub fn as_str(&self) -> &str {
        // SAFETY: the text is only ever built from validated UTF-8 (see `GreetingService::say_hello`).
        unsafe { std::str::from_utf8_unchecked(self.text.to_bytes()) }
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.as_str().to_string()
    }

    /// Hands the allocation over to a foreign caller.
    /// It must come back through [`GreetingResult::from_raw`] exactly once.
    pub fn into_raw(self) -> *mut c_char {
        self.text.into_raw()
    }

    /// Reclaims a pointer produced by [`GreetingResult::into_raw`].
    ///
    /// # Safety
    /// `ptr` must originate from `into_raw` and must not have been reclaimed before.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Self { text: CString::from_raw(ptr) }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GreetingService {
    config: GreetingConfig,
}

impl GreetingService {
    /// Service with the default configuration; needs no allocation.
    pub const DEFAULT: GreetingService = GreetingService { config: GreetingConfig::DEFAULT };

    pub fn new(config: GreetingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    pub fn say_hello(&self, request: GreetingRequest<'_>) -> Result<GreetingResult> {
        let bytes = request.name_bytes();
        log::trace!("say_hello: {} bytes", bytes.len());
        let name = std::str::from_utf8(bytes).map_err(|e| {
            log::debug!("rejecting malformed name: {e}");
            GreetingError::InvalidEncoding { valid_up_to: e.valid_up_to() }
        })?;
        if let Some(position) = name.bytes().position(|b| b == 0) {
            log::debug!("rejecting name with NUL at {position}");
            return Err(GreetingError::InteriorNul { position });
        }
        let max = self.config.max_name_chars;
        // a name never has more characters than bytes
        if bytes.len() > max {
            let chars = name.chars().count();
            if chars > max {
                log::debug!("rejecting name of {chars} characters");
                return Err(GreetingError::InputTooLong { chars, max });
            }
        }
        let name = if name.is_empty() { self.config.fallback_name.as_ref() } else { name };
        self.compose(name)
    }

    pub fn say_hello_str(&self, name: &str) -> Result<GreetingResult> {
        self.say_hello(GreetingRequest::from(name))
    }

    fn compose(&self, name: &str) -> Result<GreetingResult> {
        let GreetingConfig { prefix, suffix, .. } = &self.config;
        let len = prefix.len() + name.len() + suffix.len();
        let mut buf = Vec::new();
        // room for the terminator too, so that CString::new does not reallocate
        buf.try_reserve_exact(len + 1)?;
        buf.extend_from_slice(prefix.as_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(suffix.as_bytes());
        // the name is already NUL-free, so a NUL here came from the configuration
        let text = CString::new(buf).map_err(|_| GreetingError::InvalidConfig)?;
        Ok(GreetingResult { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GreetingService {
        GreetingService::default()
    }

    #[test]
    fn greets_by_name() {
        let greeting = service().say_hello_str("dcm").unwrap();
        assert_eq!("Hello, dcm!", greeting.as_str());
    }

    #[test]
    fn contains_name_after_prefix() {
        for name in ["a", "Dương Thành Đạt", "名前", "  spaced  ", "🦀"] {
            let text = service().say_hello_str(name).unwrap().into_string();
            assert!(text.starts_with("Hello, "), "{text}");
            assert!(text.contains(name), "{text}");
        }
    }

    #[test]
    fn empty_name_gets_fallback() {
        let greeting = service().say_hello_str("").unwrap();
        assert_eq!("Hello, there!", greeting.as_str());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let svc = service();
        let first = svc.say_hello_str("dcm").unwrap();
        let second = svc.say_hello_str("dcm").unwrap();
        assert_eq!(first.as_c_str().to_bytes_with_nul(), second.as_c_str().to_bytes_with_nul());
    }

    #[test]
    fn length_bound_is_inclusive() {
        let svc = service();
        let max = svc.config().max_name_chars;
        let at_limit = "x".repeat(max);
        assert!(svc.say_hello_str(&at_limit).is_ok());
        let over = "x".repeat(max + 1);
        assert_eq!(
            GreetingError::InputTooLong { chars: max + 1, max },
            svc.say_hello_str(&over).unwrap_err()
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        let svc = GreetingService::new(GreetingConfig::default().with_max_name_chars(3));
        // 3 characters, 7 bytes
        assert_eq!("Hello, ĐạĐ!", svc.say_hello_str("ĐạĐ").unwrap().as_str());
        assert!(matches!(
            svc.say_hello_str("ĐạĐa"),
            Err(GreetingError::InputTooLong { chars: 4, max: 3 })
        ));
    }

    #[test]
    fn malformed_bytes_are_rejected() {
        let err = service().say_hello(GreetingRequest::new(b"ab\xff\xfe")).unwrap_err();
        assert_eq!(GreetingError::InvalidEncoding { valid_up_to: 2 }, err);
        // truncated multi-byte sequence
        let err = service().say_hello(GreetingRequest::new(&[0xC4])).unwrap_err();
        assert_eq!(GreetingError::InvalidEncoding { valid_up_to: 0 }, err);
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = service().say_hello(GreetingRequest::new(b"d\0cm")).unwrap_err();
        assert_eq!(GreetingError::InteriorNul { position: 1 }, err);
    }

    #[test]
    fn custom_shape() {
        let cfg = GreetingConfig::default()
            .with_prefix("Ahoj ")
            .with_suffix(".")
            .with_fallback_name("svete");
        let svc = GreetingService::new(cfg);
        assert_eq!("Ahoj dcm.", svc.say_hello_str("dcm").unwrap().as_str());
        assert_eq!("Ahoj svete.", svc.say_hello_str("").unwrap().as_str());
    }

    #[test]
    fn nul_in_configuration_is_not_blamed_on_the_name() {
        let svc = GreetingService::new(GreetingConfig::default().with_prefix("Hi\0 "));
        assert_eq!(GreetingError::InvalidConfig, svc.say_hello_str("dcm").unwrap_err());
        let svc = GreetingService::new(GreetingConfig::default().with_fallback_name("no\0body"));
        let err = svc.say_hello_str("").unwrap_err();
        assert_eq!(GreetingError::InvalidConfig, err);
        assert_eq!(crate::GreetingStatus::InvalidArgument, err.status());
    }

    #[test]
    fn raw_round_trip_releases_the_same_text() {
        let ptr = service().say_hello_str("dcm").unwrap().into_raw();
        let back = unsafe { GreetingResult::from_raw(ptr) };
        assert_eq!("Hello, dcm!", back.as_str());
    }

    #[test]
    fn usable_from_many_threads() {
        let svc = std::sync::Arc::new(service());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = svc.clone();
                std::thread::spawn(move || svc.say_hello_str(&format!("t{i}")).unwrap().into_string())
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(format!("Hello, t{i}!"), h.join().unwrap());
        }
    }
}
