//! X11 implementation of [`WindowSystem`] on top of `x11rb`.

use anyhow::{bail, Context, Result};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ClientMessageEvent, ConnectionExt as _, EventMask, ImageFormat, ImageOrder, PropMode,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::{Atom, CaptureRect, ClientMessage, Snapshot, WindowId, WindowSystem};
use crate::config;

/// Connection to an X server plus the default screen's root window
pub struct X11WindowSystem {
    conn: RustConnection,
    root: WindowId,
}

impl X11WindowSystem {
    /// Connect to `display`, or to `$DISPLAY` when `None`
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display).with_context(|| {
            format!(
                "Failed to connect to X display {}",
                display.unwrap_or("$DISPLAY")
            )
        })?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .with_context(|| format!("X server reported no screen {}", screen_num))?;

        tracing::debug!(screen = screen_num, root, "Connected to X server");
        Ok(Self { conn, root })
    }
}

impl WindowSystem for X11WindowSystem {
    fn root_window(&self) -> WindowId {
        self.root
    }

    fn intern_atom(&self, name: &str) -> Result<Atom> {
        let atom = self
            .conn
            .intern_atom(false, name.as_bytes())?
            .reply()
            .with_context(|| format!("InternAtom {}", name))?
            .atom;
        log::trace!("Interned {} = {}", name, atom);
        Ok(atom)
    }

    fn change_property32(
        &self,
        window: WindowId,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        self.conn
            .change_property32(PropMode::REPLACE, window, property, type_, data)
            .context("ChangeProperty")?;
        Ok(())
    }

    fn send_client_message(
        &self,
        destination: WindowId,
        event_mask: u32,
        message: ClientMessage,
    ) -> Result<()> {
        let event = ClientMessageEvent::new(
            config::events::CLIENT_MESSAGE_FORMAT,
            message.window,
            message.message_type,
            message.data,
        );
        self.conn
            .send_event(false, destination, EventMask::from(event_mask), event)
            .context("SendEvent")?;
        Ok(())
    }

    fn get_image(&self, window: WindowId, rect: CaptureRect) -> Result<Box<dyn Snapshot + '_>> {
        // The server answers zero-sized GetImage requests with BadValue
        if rect.is_empty() {
            return Ok(Box::new(X11Snapshot::empty(rect.width, rect.height)));
        }

        let x = i16::try_from(rect.x).context("capture x outside the protocol range")?;
        let y = i16::try_from(rect.y).context("capture y outside the protocol range")?;
        let width = u16::try_from(rect.width).context("capture width outside the protocol range")?;
        let height =
            u16::try_from(rect.height).context("capture height outside the protocol range")?;

        let reply = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                window,
                x,
                y,
                width,
                height,
                config::capture::ALL_PLANES,
            )?
            .reply()
            .context("GetImage")?;

        let setup = self.conn.setup();
        let format = setup
            .pixmap_formats
            .iter()
            .find(|f| f.depth == reply.depth)
            .with_context(|| format!("no pixmap format for depth {}", reply.depth))?;

        let snapshot = X11Snapshot::new(
            reply.data,
            rect.width,
            rect.height,
            reply.depth,
            format.bits_per_pixel,
            format.scanline_pad,
            setup.image_byte_order == ImageOrder::MSB_FIRST,
        )?;
        log::trace!(
            "GetImage {}x{} depth={} bpp={}",
            rect.width,
            rect.height,
            reply.depth,
            format.bits_per_pixel
        );
        Ok(Box::new(snapshot))
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush().context("Failed to flush X connection")?;
        Ok(())
    }
}

/// ZPixmap image data returned by `GetImage`
#[derive(Debug)]
pub struct X11Snapshot {
    data: Vec<u8>,
    width: u32,
    height: u32,
    depth: u8,
    bytes_per_pixel: usize,
    stride: usize,
    msb_first: bool,
}

impl X11Snapshot {
    /// Wrap raw ZPixmap data, checking it covers `width x height`
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        depth: u8,
        bits_per_pixel: u8,
        scanline_pad: u8,
        msb_first: bool,
    ) -> Result<Self> {
        if !matches!(bits_per_pixel, 8 | 16 | 24 | 32) {
            bail!("unsupported bits per pixel: {}", bits_per_pixel);
        }
        let pad = usize::from(scanline_pad.max(8));
        let row_bits = width as usize * usize::from(bits_per_pixel);
        let stride = row_bits.div_ceil(pad) * pad / 8;

        let needed = stride * height as usize;
        if data.len() < needed {
            bail!(
                "GetImage returned {} bytes, expected at least {}",
                data.len(),
                needed
            );
        }

        Ok(Self {
            data,
            width,
            height,
            depth,
            bytes_per_pixel: usize::from(bits_per_pixel / 8),
            stride,
            msb_first,
        })
    }

    fn empty(width: u32, height: u32) -> Self {
        Self {
            data: Vec::new(),
            width,
            height,
            depth: 24,
            bytes_per_pixel: 4,
            stride: 0,
            msb_first: false,
        }
    }
}

impl Snapshot for X11Snapshot {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        let start = y as usize * self.stride + x as usize * self.bytes_per_pixel;
        let bytes = &self.data[start..start + self.bytes_per_pixel];

        let pixel = if self.msb_first {
            bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
        } else {
            bytes.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
        };

        // Padding bits above the depth are not part of the pixel
        if self.depth < 32 {
            pixel & ((1u32 << self.depth) - 1)
        } else {
            pixel
        }
    }
}
