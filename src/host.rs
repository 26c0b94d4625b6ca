//! Host toolkit seam
//!
//! The adapters never own toolkit objects. They resolve window names and photo
//! images through [`HostToolkit`] and write pixels through [`PhotoImage`].
//! [`StandaloneHost`] is a self-contained host used by the command line tool
//! and the tests.

use std::collections::HashMap;

use crate::commands::parse_long;
use crate::error::{CommandError, ErrorKind, Result};
use crate::window_system::WindowId;

/// A window the host has resolved to a live native window
///
/// Borrowed: nothing is released when the handle goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle {
    id: WindowId,
}

impl WindowHandle {
    pub fn resolved(id: WindowId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }
}

/// How block pixels combine with what is already in the photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeRule {
    /// Overwrite destination pixels
    Set,
    /// Alpha-blend over destination pixels
    Overlay,
}

/// Packed pixel data handed to a photo in one block
#[derive(Debug, Clone, Copy)]
pub struct PhotoBlock<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes between the starts of consecutive rows
    pub pitch: usize,
    /// Bytes between consecutive pixels in a row
    pub pixel_size: usize,
    /// Byte offsets of red, green, blue and alpha inside one pixel
    pub offsets: [usize; 4],
}

impl<'a> PhotoBlock<'a> {
    /// Tightly packed RGBA block
    pub fn rgba(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            pitch: width as usize * 4,
            pixel_size: 4,
            offsets: [0, 1, 2, 3],
        }
    }

    /// Bytes the geometry needs: full rows up to the last, then one row of pixels
    pub fn required_len(&self) -> Option<usize> {
        let last_row = (self.height as usize).checked_sub(1)?;
        self.pitch
            .checked_mul(last_row)?
            .checked_add((self.width as usize).checked_mul(self.pixel_size)?)
    }

    /// RGBA value of block pixel (x, y)
    ///
    /// Panics when (x, y) lies outside `pixels`; callers check
    /// [`required_len`](Self::required_len) first.
    pub fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        let base = y as usize * self.pitch + x as usize * self.pixel_size;
        [
            self.pixels[base + self.offsets[0]],
            self.pixels[base + self.offsets[1]],
            self.pixels[base + self.offsets[2]],
            self.pixels[base + self.offsets[3]],
        ]
    }
}

/// Mutable image object owned by the host
pub trait PhotoImage {
    /// Current (width, height)
    fn size(&self) -> (u32, u32);

    /// Resize to exactly `width x height`
    fn set_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Write `block` into the region at (x, y) of size `width x height`
    ///
    /// The block is tiled when the region is larger than the block.
    fn put_block(
        &mut self,
        block: &PhotoBlock<'_>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rule: CompositeRule,
    ) -> Result<()>;
}

/// Name resolution provided by the host toolkit
pub trait HostToolkit {
    /// Whether the host has a display (main window) to work against
    fn has_display(&self) -> bool {
        true
    }

    /// Resolve a window path name to a live window
    fn window_by_name(&self, name: &str) -> Option<WindowHandle>;

    /// Look up an existing photo image by name
    fn photo_mut(&mut self, name: &str) -> Option<&mut dyn PhotoImage>;
}

/// In-memory RGBA photo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPhoto {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl MemoryPhoto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn resize_keeping_content(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(CommandError::out_of_memory)?;

        let mut resized = Vec::new();
        resized
            .try_reserve_exact(len)
            .map_err(|_| CommandError::out_of_memory())?;
        resized.resize(len, 0);

        let keep_w = width.min(self.width) as usize * 4;
        for row in 0..height.min(self.height) as usize {
            let src = row * self.width as usize * 4;
            let dst = row * width as usize * 4;
            resized[dst..dst + keep_w].copy_from_slice(&self.pixels[src..src + keep_w]);
        }

        self.width = width;
        self.height = height;
        self.pixels = resized;
        Ok(())
    }
}

fn blend(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let a = u32::from(src[3]);
    match a {
        255 => src,
        0 => dst,
        _ => {
            let inv = 255 - a;
            let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv + 127) / 255) as u8;
            let out_a = a + (u32::from(dst[3]) * inv + 127) / 255;
            [
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                out_a.min(255) as u8,
            ]
        }
    }
}

impl PhotoImage for MemoryPhoto {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.resize_keeping_content(width, height)
    }

    fn put_block(
        &mut self,
        block: &PhotoBlock<'_>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rule: CompositeRule,
    ) -> Result<()> {
        if block.width == 0 || block.height == 0 || width == 0 || height == 0 {
            return Ok(());
        }
        if block.offsets.iter().any(|&o| o >= block.pixel_size) {
            return Err(CommandError::new(
                ErrorKind::InvalidArgument,
                "channel offset outside pixel",
            ));
        }
        match block.required_len() {
            Some(len) if len <= block.pixels.len() => {}
            _ => {
                return Err(CommandError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "pixel block of {} bytes is too short for {}x{} with pitch {}",
                        block.pixels.len(),
                        block.width,
                        block.height,
                        block.pitch
                    ),
                ));
            }
        }

        let right = x.checked_add(width).ok_or_else(CommandError::out_of_memory)?;
        let bottom = y.checked_add(height).ok_or_else(CommandError::out_of_memory)?;
        if right > self.width || bottom > self.height {
            self.resize_keeping_content(right.max(self.width), bottom.max(self.height))?;
        }

        let stride = self.width as usize * 4;
        for row in 0..height {
            for col in 0..width {
                let src = block.sample(col % block.width, row % block.height);
                let i = (y + row) as usize * stride + (x + col) as usize * 4;
                let dst = &mut self.pixels[i..i + 4];
                let out = match rule {
                    CompositeRule::Set => src,
                    CompositeRule::Overlay => blend(src, [dst[0], dst[1], dst[2], dst[3]]),
                };
                dst.copy_from_slice(&out);
            }
        }
        Ok(())
    }
}

/// Host with a window-name registry and named in-memory photos
#[derive(Debug, Clone)]
pub struct StandaloneHost {
    windows: HashMap<String, WindowId>,
    photos: HashMap<String, MemoryPhoto>,
    display_available: bool,
}

impl Default for StandaloneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StandaloneHost {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            photos: HashMap::new(),
            display_available: true,
        }
    }

    pub fn register_window(&mut self, name: impl Into<String>, id: WindowId) {
        self.windows.insert(name.into(), id);
    }

    /// Create (or reset) a named photo
    pub fn create_photo(&mut self, name: impl Into<String>) -> &mut MemoryPhoto {
        let slot = self.photos.entry(name.into()).or_default();
        *slot = MemoryPhoto::new();
        slot
    }

    pub fn photo(&self, name: &str) -> Option<&MemoryPhoto> {
        self.photos.get(name)
    }

    pub fn take_photo(&mut self, name: &str) -> Option<MemoryPhoto> {
        self.photos.remove(name)
    }

    pub fn set_display_available(&mut self, available: bool) {
        self.display_available = available;
    }
}

impl HostToolkit for StandaloneHost {
    fn has_display(&self) -> bool {
        self.display_available
    }

    fn window_by_name(&self, name: &str) -> Option<WindowHandle> {
        if let Some(&id) = self.windows.get(name) {
            return Some(WindowHandle::resolved(id));
        }
        // Unregistered names may be native ids as printed by xwininfo/xdotool
        parse_long(name)
            .and_then(|id| WindowId::try_from(id).ok())
            .filter(|&id| id != 0)
            .map(WindowHandle::resolved)
    }

    fn photo_mut(&mut self, name: &str) -> Option<&mut dyn PhotoImage> {
        self.photos
            .get_mut(name)
            .map(|photo| photo as &mut dyn PhotoImage)
    }
}
