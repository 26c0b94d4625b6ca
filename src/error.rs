//! Error types for csdkit commands.

use std::fmt;
use thiserror::Error;

/// Broad failure category of a command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name does not map to a live window
    Resolution,
    /// Named image does not exist
    NotFound,
    /// Malformed or unrecognized argument (including argument count)
    InvalidArgument,
    /// Windowing system refused or failed a pixel read
    Capture,
    /// Pixel buffer allocation failed
    OutOfMemory,
    /// Property write, event send or flush failed on the connection
    WindowSystem,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ErrorKind::Resolution => "ResolutionError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Capture => "CaptureError",
            ErrorKind::OutOfMemory => "OutOfMemory",
            ErrorKind::WindowSystem => "WindowSystemError",
        };
        write!(f, "{}", value)
    }
}

/// Terminal result of a failed command, carrying the kind and the host-facing message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_window_path(name: &str) -> Self {
        Self::new(
            ErrorKind::Resolution,
            format!("bad window path name \"{}\"", name),
        )
    }

    pub fn photo_not_found(name: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("photo \"{}\" not found", name))
    }

    pub fn wrong_num_args(command: &str, usage: &str) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("wrong # args: should be \"{} {}\"", command, usage),
        )
    }

    pub fn expected_integer(text: &str) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("expected integer but got \"{}\"", text),
        )
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("invalid command name \"{}\"", name),
        )
    }

    pub fn out_of_memory() -> Self {
        Self::new(ErrorKind::OutOfMemory, "Memory allocation failed")
    }

    /// Wrap a window-system failure, keeping its cause chain in the message
    pub fn window_system(context: &str, err: &anyhow::Error) -> Self {
        Self::new(ErrorKind::WindowSystem, format!("{}: {:#}", context, err))
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;
