//! csdkit - Client-side decoration and capture helpers for X11 toolkits
//!
//! This library provides the window-manager requests a toolkit needs to draw
//! its own decorations, plus window/root capture into a host photo image.

// Configuration constants
pub mod config;

// Structured command errors
pub mod error;

// Windowing system seam and the X11 backend
pub mod window_system;

// Host toolkit seam (window names, photo images)
pub mod host;

// Decoration suppression and WM-driven move/resize
pub mod decorations;

// Region capture and pixel conversion
pub mod capture;
pub mod pixels;

// Command table and registration
pub mod commands;

// Ambient infrastructure
pub mod logging;
pub mod settings;

// Re-export commonly used types
pub use capture::{capture_region, WindowRef};
pub use commands::{register_all, CommandContext, CommandTable};
pub use decorations::{begin_move, begin_resize, suppress_decorations, Direction};
pub use error::{CommandError, ErrorKind};
pub use host::{HostToolkit, PhotoImage, StandaloneHost, WindowHandle};
pub use window_system::{CaptureRect, Snapshot, WindowSystem, X11WindowSystem};
