#![forbid(unsafe_code)]

//! Demo error type.

use std::fmt;

/// Errors the demo binary can exit with.
#[derive(Debug)]
pub enum DemoError {
    /// I/O failure during terminal operations or log setup.
    Io(std::io::Error),
    /// Bad command-line flag or environment override.
    Config(String),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "invalid option: {msg}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for DemoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;
