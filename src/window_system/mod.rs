// window_system/mod.rs - Windowing System Client Seam
//
// The command adapters talk to the window system only through the
// `WindowSystem` trait. The X11 implementation lives in its own submodule.

pub mod x11;
pub use x11::X11WindowSystem;

/// Native window identifier (an X11 `Window` XID)
pub type WindowId = u32;

/// Interned atom identifier
pub type Atom = u32;

/// Screen region to read, relative to the source window's origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A 32-bit-format client message (`format = 32`, five data items)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMessage {
    /// Window the message is about (not necessarily the destination)
    pub window: WindowId,
    pub message_type: Atom,
    pub data: [u32; 5],
}

/// Pixels read back from the window system
///
/// Dropping a snapshot releases it; nothing else owns the underlying data.
pub trait Snapshot {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Packed native pixel value at (x, y)
    ///
    /// Callers stay within `width() x height()`.
    fn pixel(&self, x: u32, y: u32) -> u32;
}

/// Trait for the windowing-system client library
pub trait WindowSystem {
    /// Default root window of the connected screen
    fn root_window(&self) -> WindowId;

    /// Intern an atom, creating it if it doesn't exist yet
    fn intern_atom(&self, name: &str) -> anyhow::Result<Atom>;

    /// Replace a 32-bit-format property on `window`
    fn change_property32(
        &self,
        window: WindowId,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> anyhow::Result<()>;

    /// Deliver a synthetic client message to `destination` with `event_mask`
    fn send_client_message(
        &self,
        destination: WindowId,
        event_mask: u32,
        message: ClientMessage,
    ) -> anyhow::Result<()>;

    /// Read a rectangle of `window` as packed pixels
    fn get_image(
        &self,
        window: WindowId,
        rect: CaptureRect,
    ) -> anyhow::Result<Box<dyn Snapshot + '_>>;

    /// Push buffered requests to the server
    fn flush(&self) -> anyhow::Result<()>;
}
