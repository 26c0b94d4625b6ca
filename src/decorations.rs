//! Client-side decoration helpers
//!
//! Three window-manager requests a toolkit needs to draw its own titlebar:
//! drop the server-side frame (Motif hints), start an interactive move, and
//! start an interactive resize from one of eight edges (`_NET_WM_MOVERESIZE`).
//! The window manager does all geometry work; these functions only ask.

use std::fmt;
use std::str::FromStr;

use crate::config::{atoms, events, motif, moveresize};
use crate::error::{CommandError, ErrorKind, Result};
use crate::host::WindowHandle;
use crate::window_system::{ClientMessage, WindowSystem};

/// Resize edge or corner, in `_NET_WM_MOVERESIZE` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
    ];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Direction::NorthWest => "nw",
            Direction::North => "north",
            Direction::NorthEast => "ne",
            Direction::East => "east",
            Direction::SouthEast => "se",
            Direction::South => "south",
            Direction::SouthWest => "sw",
            Direction::West => "west",
        }
    }

    /// Protocol edge code
    pub fn edge_code(self) -> u32 {
        match self {
            Direction::NorthWest => moveresize::SIZE_TOPLEFT,
            Direction::North => moveresize::SIZE_TOP,
            Direction::NorthEast => moveresize::SIZE_TOPRIGHT,
            Direction::East => moveresize::SIZE_RIGHT,
            Direction::SouthEast => moveresize::SIZE_BOTTOMRIGHT,
            Direction::South => moveresize::SIZE_BOTTOM,
            Direction::SouthWest => moveresize::SIZE_BOTTOMLEFT,
            Direction::West => moveresize::SIZE_LEFT,
        }
    }

    /// Message listing every accepted name
    pub fn invalid_message() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|d| d.name()).collect();
        format!("invalid direction: use {}", names.join(" "))
    }
}

impl FromStr for Direction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| CommandError::new(ErrorKind::InvalidArgument, Self::invalid_message()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `_MOTIF_WM_HINTS` property value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotifWmHints {
    pub flags: u32,
    pub functions: u32,
    pub decorations: u32,
    pub input_mode: i32,
    pub status: u32,
}

impl MotifWmHints {
    /// Only the decorations field is set, and it asks for none
    pub fn no_decorations() -> Self {
        Self {
            flags: motif::HINTS_DECORATIONS,
            decorations: 0,
            ..Self::default()
        }
    }

    pub fn to_words(self) -> [u32; motif::HINTS_LEN] {
        [
            self.flags,
            self.functions,
            self.decorations,
            self.input_mode as u32,
            self.status,
        ]
    }
}

/// Interactive operation requested from the window manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResize {
    Move,
    Resize(Direction),
}

impl MoveResize {
    pub fn action_code(self) -> u32 {
        match self {
            MoveResize::Move => moveresize::MOVE,
            MoveResize::Resize(direction) => direction.edge_code(),
        }
    }

    /// Client-message data: root x, root y, action, button, source indication
    pub fn payload(self) -> [u32; 5] {
        [
            moveresize::UNUSED_ROOT_COORD,
            moveresize::UNUSED_ROOT_COORD,
            self.action_code(),
            moveresize::PRIMARY_BUTTON,
            moveresize::SOURCE_INDICATION,
        ]
    }
}

/// Ask the window manager to stop drawing a frame around `window`
pub fn suppress_decorations(ws: &dyn WindowSystem, window: WindowHandle) -> Result<()> {
    let hints = MotifWmHints::no_decorations();
    let write = || -> anyhow::Result<()> {
        let prop = ws.intern_atom(atoms::MOTIF_WM_HINTS)?;
        // The property's type is the hints atom itself
        ws.change_property32(window.id(), prop, prop, &hints.to_words())?;
        ws.flush()
    };
    write().map_err(|e| CommandError::window_system("failed to set decoration hints", &e))?;

    tracing::debug!(window = window.id(), "Requested undecorated window");
    Ok(())
}

/// Start a window-manager driven move of `window`, as if its titlebar was grabbed
pub fn begin_move(ws: &dyn WindowSystem, window: WindowHandle) -> Result<()> {
    request_move_resize(ws, window, MoveResize::Move)
}

/// Start a window-manager driven resize of `window` from `direction`
pub fn begin_resize(
    ws: &dyn WindowSystem,
    window: WindowHandle,
    direction: Direction,
) -> Result<()> {
    request_move_resize(ws, window, MoveResize::Resize(direction))
}

fn request_move_resize(ws: &dyn WindowSystem, window: WindowHandle, op: MoveResize) -> Result<()> {
    let send = || -> anyhow::Result<()> {
        let message = ClientMessage {
            window: window.id(),
            message_type: ws.intern_atom(atoms::NET_WM_MOVERESIZE)?,
            data: op.payload(),
        };
        // Only the WM holds SubstructureRedirect on the root, so it gets the message
        ws.send_client_message(ws.root_window(), events::WM_REQUEST_MASK, message)?;
        ws.flush()
    };
    send().map_err(|e| CommandError::window_system("failed to send move/resize request", &e))?;

    tracing::debug!(window = window.id(), action = op.action_code(), "Sent _NET_WM_MOVERESIZE");
    Ok(())
}
