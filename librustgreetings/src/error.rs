use std::collections::TryReserveError;
use std::fmt;
use std::os::raw::c_char;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, GreetingError>;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum GreetingError {
    #[error("name is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },
    #[error("name contains a NUL character at byte {position}")]
    InteriorNul { position: usize },
    #[error("name has {chars} characters, the limit is {max}")]
    InputTooLong { chars: usize, max: usize },
    #[error("cannot allocate the greeting")]
    AllocationFailure,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("greeting configuration contains a NUL character")]
    InvalidConfig,
}

impl GreetingError {
    /// Code reported to C callers.
    pub fn status(&self) -> GreetingStatus {
        match self {
            GreetingError::InvalidEncoding { .. } | GreetingError::InteriorNul { .. } => {
                GreetingStatus::InvalidEncoding
            }
            GreetingError::InputTooLong { .. } => GreetingStatus::InputTooLong,
            GreetingError::AllocationFailure => GreetingStatus::AllocationFailure,
            GreetingError::InvalidArgument(_) | GreetingError::InvalidConfig => {
                GreetingStatus::InvalidArgument
            }
        }
    }
}

impl From<TryReserveError> for GreetingError {
    fn from(_: TryReserveError) -> Self {
        GreetingError::AllocationFailure
    }
}

/// Stable status codes crossing the C boundary. Never renumber.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GreetingStatus {
    Ok = 0,
    InvalidEncoding = 1,
    InputTooLong = 2,
    AllocationFailure = 3,
    InvalidArgument = 4,
}

const MESSAGES: [&str; 6] = [
    "ok\0",
    "name is not well-formed UTF-8 text\0",
    "name exceeds the maximum length\0",
    "greeting could not be allocated\0",
    "invalid argument\0",
    "unknown status\0",
];

impl GreetingStatus {
    pub fn from_raw(code: u32) -> Option<Self> {
        match code {
            0 => Some(GreetingStatus::Ok),
            1 => Some(GreetingStatus::InvalidEncoding),
            2 => Some(GreetingStatus::InputTooLong),
            3 => Some(GreetingStatus::AllocationFailure),
            4 => Some(GreetingStatus::InvalidArgument),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        MESSAGES[self as usize].trim_end_matches('\0')
    }

    /// NUL-terminated message for `code`; static, must not be released.
    pub(crate) fn raw_message(code: u32) -> *const c_char {
        let index = match Self::from_raw(code) {
            Some(status) => status as usize,
            None => MESSAGES.len() - 1,
        };
        MESSAGES[index].as_ptr() as *const c_char
    }
}

impl fmt::Display for GreetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GreetingStatus::Ok as u32, 0);
        assert_eq!(GreetingStatus::InvalidEncoding as u32, 1);
        assert_eq!(GreetingStatus::InputTooLong as u32, 2);
        assert_eq!(GreetingStatus::AllocationFailure as u32, 3);
        assert_eq!(GreetingStatus::InvalidArgument as u32, 4);
        for code in 0..5 {
            assert_eq!(code, GreetingStatus::from_raw(code).unwrap() as u32);
        }
        assert_eq!(None, GreetingStatus::from_raw(5));
    }

    #[test]
    fn interior_nul_is_reported_as_encoding_problem() {
        let err = GreetingError::InteriorNul { position: 3 };
        assert_eq!(GreetingStatus::InvalidEncoding, err.status());
    }

    #[test]
    fn raw_messages_are_terminated() {
        let msg = unsafe { CStr::from_ptr(GreetingStatus::raw_message(2)) };
        assert_eq!("name exceeds the maximum length", msg.to_str().unwrap());
        let unknown = unsafe { CStr::from_ptr(GreetingStatus::raw_message(77)) };
        assert_eq!("unknown status", unknown.to_str().unwrap());
    }
}
