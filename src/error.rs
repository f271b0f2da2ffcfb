use std::ffi::NulError;
use std::str::Utf8Error;
use rustgreetings::GreetingStatus;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, GreetError>;

#[derive(ThisError, Debug)]
pub enum GreetError {
    #[error("IO Error")]
    IoError(#[from] std::io::Error),
    #[error("DlOpen Error")]
    DlOpenError(#[from] dlopen2::Error),
    #[error("{0}: Unsupported ABI version {1}")]
    UnsupportedAbi(String, u32),
    #[error("Greeting rejected: {0}")]
    Rejected(GreetingStatus),
    #[error("Unknown status code {0}")]
    UnknownStatus(u32),
    #[error("Null Error")]
    NulError(#[from] NulError),
    #[error("Greeting is not valid UTF-8")]
    InvalidUtf8(#[from] Utf8Error),
}
