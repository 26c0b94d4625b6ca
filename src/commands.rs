//! Command table
//!
//! Commands are plain functions registered by name into an explicit
//! [`CommandTable`]. Nothing is registered globally; a bootstrap builds a
//! table with [`register_all`] (or the per-package functions) and dispatches
//! through [`CommandTable::invoke`].

use std::collections::BTreeMap;

use crate::capture::{self, WindowRef};
use crate::config::packages::{
    CMD_CAPTURE, CMD_MOVE, CMD_NODECTK, CMD_RESIZE, CSD_PACKAGE, CSD_VERSION, XGETIMAGE_PACKAGE,
    XGETIMAGE_VERSION,
};
use crate::decorations::{self, Direction};
use crate::error::{CommandError, ErrorKind, Result};
use crate::host::{HostToolkit, WindowHandle};
use crate::window_system::{CaptureRect, WindowSystem};

/// Collaborators a command runs against
pub struct CommandContext<'a> {
    pub ws: &'a dyn WindowSystem,
    pub host: &'a mut dyn HostToolkit,
}

impl<'a> CommandContext<'a> {
    pub fn new(ws: &'a dyn WindowSystem, host: &'a mut dyn HostToolkit) -> Self {
        Self { ws, host }
    }

    fn window(&self, name: &str) -> Result<WindowHandle> {
        self.host
            .window_by_name(name)
            .ok_or_else(|| CommandError::bad_window_path(name))
    }
}

/// Handler signature; `args` excludes the command name
pub type CommandFn = fn(&mut CommandContext<'_>, &[&str]) -> Result<()>;

/// Named commands plus the packages that provided them
#[derive(Clone, Default)]
pub struct CommandTable {
    commands: BTreeMap<String, CommandFn>,
    packages: BTreeMap<String, String>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every command this crate provides
    pub fn with_all() -> Self {
        let mut table = Self::new();
        register_all(&mut table);
        table
    }

    pub fn register(&mut self, name: &str, handler: CommandFn) {
        self.commands.insert(name.to_string(), handler);
    }

    pub fn provide(&mut self, package: &str, version: &str) {
        self.packages.insert(package.to_string(), version.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn package_version(&self, package: &str) -> Option<&str> {
        self.packages.get(package).map(String::as_str)
    }

    /// Run `name` with `args`
    pub fn invoke(&self, ctx: &mut CommandContext<'_>, name: &str, args: &[&str]) -> Result<()> {
        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::unknown_command(name))?;

        tracing::debug!(command = name, ?args, "Invoking command");
        let result = handler(ctx, args);
        if let Err(e) = &result {
            tracing::debug!(command = name, kind = %e.kind, error = %e, "Command failed");
        }
        result
    }
}

/// Register `csd::nodectk`, `csd::move` and `csd::resize`
pub fn register_csd(table: &mut CommandTable) {
    table.register(CMD_NODECTK, nodectk_cmd);
    table.register(CMD_MOVE, move_cmd);
    table.register(CMD_RESIZE, resize_cmd);
    table.provide(CSD_PACKAGE, CSD_VERSION);
}

/// Register `xgetimage::capture`
pub fn register_xgetimage(table: &mut CommandTable) {
    table.register(CMD_CAPTURE, capture_cmd);
    table.provide(XGETIMAGE_PACKAGE, XGETIMAGE_VERSION);
}

pub fn register_all(table: &mut CommandTable) {
    register_csd(table);
    register_xgetimage(table);
}

fn nodectk_cmd(ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<()> {
    let [window] = args else {
        return Err(CommandError::wrong_num_args(CMD_NODECTK, "window"));
    };
    let window = ctx.window(window)?;
    decorations::suppress_decorations(ctx.ws, window)
}

fn move_cmd(ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<()> {
    let [window] = args else {
        return Err(CommandError::wrong_num_args(CMD_MOVE, "window"));
    };
    let window = ctx.window(window)?;
    decorations::begin_move(ctx.ws, window)
}

fn resize_cmd(ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<()> {
    let [window, direction] = args else {
        return Err(CommandError::wrong_num_args(CMD_RESIZE, "window direction"));
    };
    // Direction first: a bad spelling never reaches the window system
    let direction: Direction = direction.parse()?;
    let window = ctx.window(window)?;
    decorations::begin_resize(ctx.ws, window, direction)
}

fn capture_cmd(ctx: &mut CommandContext<'_>, args: &[&str]) -> Result<()> {
    let [photo_name, window, x, y, width, height] = args else {
        return Err(CommandError::wrong_num_args(
            CMD_CAPTURE,
            "photo root|window x y width height",
        ));
    };

    if ctx.host.photo_mut(photo_name).is_none() {
        return Err(CommandError::photo_not_found(photo_name));
    }
    if !ctx.host.has_display() {
        return Err(CommandError::new(ErrorKind::Resolution, "no display connection"));
    }

    let window = WindowRef::parse(window)?;
    let x = parse_int(x)?;
    let y = parse_int(y)?;
    let width = parse_dimension(width)?;
    let height = parse_dimension(height)?;

    let photo = ctx
        .host
        .photo_mut(photo_name)
        .ok_or_else(|| CommandError::photo_not_found(photo_name))?;
    capture::capture_region(ctx.ws, photo, window, CaptureRect::new(x, y, width, height))
}

/// Parse an integer the way toolkit command arguments are written:
/// optional sign, then decimal or a `0x`/`0o`/`0b` prefixed literal.
/// Surrounding whitespace is ignored.
pub fn parse_long(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a 32-bit integer argument
///
/// Magnitudes up to `u32::MAX` are accepted and wrap to their low 32 bits,
/// so `4294967295` reads as `-1`.
pub fn parse_int(text: &str) -> Result<i32> {
    let limit = i64::from(u32::MAX);
    parse_long(text)
        .filter(|v| (-limit..=limit).contains(v))
        .map(|v| v as i32)
        .ok_or_else(|| CommandError::expected_integer(text))
}

fn parse_dimension(text: &str) -> Result<u32> {
    let value = parse_int(text)?;
    u32::try_from(value).map_err(|_| {
        CommandError::new(
            ErrorKind::InvalidArgument,
            format!("bad dimension \"{}\": must not be negative", text),
        )
    })
}
