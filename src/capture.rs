// capture.rs - Region Capture
//
// Copies a rectangle of a window (or the root window) into a host photo.
// The photo is only touched once the converted buffer is complete, so a
// failed capture leaves it exactly as it was.

use crate::commands::parse_long;
use crate::config::capture::{BYTES_PER_PIXEL, CHANNEL_OFFSETS, ROOT_SENTINEL};
use crate::error::{CommandError, ErrorKind, Result};
use crate::host::{CompositeRule, PhotoBlock, PhotoImage};
use crate::pixels;
use crate::window_system::{CaptureRect, WindowId, WindowSystem};

/// Window to read pixels from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRef {
    /// Default root window (the whole screen)
    Root,
    /// Native window id, used as-is without checking it exists
    Id(WindowId),
}

impl WindowRef {
    /// Parse `root` or an integer window id
    pub fn parse(text: &str) -> Result<Self> {
        if text == ROOT_SENTINEL {
            return Ok(WindowRef::Root);
        }
        let value = parse_long(text).ok_or_else(|| {
            CommandError::new(
                ErrorKind::Resolution,
                format!("expected integer but got \"{}\"", text),
            )
        })?;
        WindowId::try_from(value).map(WindowRef::Id).map_err(|_| {
            CommandError::new(
                ErrorKind::Resolution,
                format!("window id \"{}\" is not a valid native window", text),
            )
        })
    }

    pub fn resolve(self, ws: &dyn WindowSystem) -> WindowId {
        match self {
            WindowRef::Root => ws.root_window(),
            WindowRef::Id(id) => id,
        }
    }
}

/// Capture `rect` of `window` into `photo`, replacing its size and contents
pub fn capture_region(
    ws: &dyn WindowSystem,
    photo: &mut dyn PhotoImage,
    window: WindowRef,
    rect: CaptureRect,
) -> Result<()> {
    let native = window.resolve(ws);

    let snapshot = ws.get_image(native, rect).map_err(|e| {
        CommandError::new(ErrorKind::Capture, format!("XGetImage failed: {:#}", e))
    })?;

    // An allocation failure returns here and drops (releases) the snapshot
    let data = pixels::rgba_from_snapshot(&*snapshot, rect.width, rect.height)?;
    drop(snapshot);

    photo.set_size(rect.width, rect.height)?;

    let block = PhotoBlock {
        pixels: &data,
        width: rect.width,
        height: rect.height,
        pitch: rect.width as usize * BYTES_PER_PIXEL,
        pixel_size: BYTES_PER_PIXEL,
        offsets: CHANNEL_OFFSETS,
    };
    photo.put_block(&block, 0, 0, rect.width, rect.height, CompositeRule::Set)?;

    tracing::debug!(
        window = native,
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "Captured region"
    );
    Ok(())
}
