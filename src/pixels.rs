//! Pixel format conversion
//!
//! Native snapshots are read assuming a 24-bit TrueColor layout
//! (red in bits 16-23, green in 8-15, blue in 0-7). The visual's real
//! channel masks are not consulted, so displays with another layout
//! (e.g. 16-bit 565) come out with wrong colors.

use crate::config::capture::{BYTES_PER_PIXEL, OPAQUE_ALPHA};
use crate::error::{CommandError, Result};
use crate::window_system::Snapshot;

/// Convert a packed 0x00RRGGBB pixel to opaque RGBA
pub fn unpack_rgb24(pixel: u32) -> [u8; 4] {
    [
        ((pixel >> 16) & 0xFF) as u8, // R
        ((pixel >> 8) & 0xFF) as u8,  // G
        (pixel & 0xFF) as u8,         // B
        OPAQUE_ALPHA,                 // A
    ]
}

/// Byte length of a `width x height` RGBA buffer, or `None` on overflow
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Allocate an empty buffer able to hold `width x height` RGBA pixels
///
/// Fails with `OutOfMemory` instead of aborting when the size is unreachable.
pub fn alloc_rgba(width: u32, height: u32) -> Result<Vec<u8>> {
    let len = rgba_len(width, height).ok_or_else(CommandError::out_of_memory)?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| CommandError::out_of_memory())?;
    Ok(buf)
}

/// Convert the top-left `width x height` of `snapshot` to RGBA, row by row
pub fn rgba_from_snapshot(snapshot: &dyn Snapshot, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = alloc_rgba(width, height)?;
    for y in 0..height {
        for x in 0..width {
            buf.extend_from_slice(&unpack_rgb24(snapshot.pixel(x, y)));
        }
    }
    Ok(buf)
}
