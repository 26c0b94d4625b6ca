//! Application Configuration Constants
//!
//! Centralized configuration for protocol atoms, hint flags, event masks and defaults.
//! Everything the adapters send over the wire is defined here.

/// Atom names interned on the X server
pub mod atoms {
    /// Motif window-manager hints property (vendor extension honoured by most WMs)
    pub const MOTIF_WM_HINTS: &str = "_MOTIF_WM_HINTS";

    /// EWMH interactive move/resize request
    pub const NET_WM_MOVERESIZE: &str = "_NET_WM_MOVERESIZE";
}

/// Motif WM hints record layout
pub mod motif {
    /// `decorations` field of the record is valid
    pub const HINTS_DECORATIONS: u32 = 1 << 1;

    /// Number of 32-bit words in the hints record
    /// (flags, functions, decorations, input_mode, status)
    pub const HINTS_LEN: usize = 5;

    /// Property format (bits per item)
    pub const PROPERTY_FORMAT: u8 = 32;
}

/// `_NET_WM_MOVERESIZE` action codes and payload fields
pub mod moveresize {
    pub const SIZE_TOPLEFT: u32 = 0;
    pub const SIZE_TOP: u32 = 1;
    pub const SIZE_TOPRIGHT: u32 = 2;
    pub const SIZE_RIGHT: u32 = 3;
    pub const SIZE_BOTTOMRIGHT: u32 = 4;
    pub const SIZE_BOTTOM: u32 = 5;
    pub const SIZE_BOTTOMLEFT: u32 = 6;
    pub const SIZE_LEFT: u32 = 7;

    /// Interactive move (titlebar drag)
    pub const MOVE: u32 = 8;

    /// Button1, the button the WM treats as held during the operation
    pub const PRIMARY_BUTTON: u32 = 1;

    /// Root pointer coordinates are left for the WM to query
    pub const UNUSED_ROOT_COORD: u32 = 0;

    /// Source indication: 0 = legacy/unspecified
    pub const SOURCE_INDICATION: u32 = 0;
}

/// Core protocol event masks used when sending synthetic events
pub mod events {
    pub const SUBSTRUCTURE_NOTIFY: u32 = 1 << 19;
    pub const SUBSTRUCTURE_REDIRECT: u32 = 1 << 20;

    /// Mask used for every client message routed to the window manager
    pub const WM_REQUEST_MASK: u32 = SUBSTRUCTURE_REDIRECT | SUBSTRUCTURE_NOTIFY;

    /// Format of client-message data (32-bit items)
    pub const CLIENT_MESSAGE_FORMAT: u8 = 32;
}

/// Capture Configuration
pub mod capture {
    /// Window reference meaning "the default root window"
    pub const ROOT_SENTINEL: &str = "root";

    /// Plane mask requesting every bit plane
    pub const ALL_PLANES: u32 = u32::MAX;

    /// Bytes per pixel in the destination buffer (R, G, B, A)
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Alpha written for every captured pixel
    pub const OPAQUE_ALPHA: u8 = 255;

    /// Channel offsets inside one destination pixel
    pub const CHANNEL_OFFSETS: [usize; 4] = [0, 1, 2, 3];
}

/// Command and package names exposed to the host
pub mod packages {
    pub const CSD_PACKAGE: &str = "csd";
    pub const CSD_VERSION: &str = "0.1";
    pub const XGETIMAGE_PACKAGE: &str = "xgetimage";
    pub const XGETIMAGE_VERSION: &str = "0.1";

    pub const CMD_NODECTK: &str = "csd::nodectk";
    pub const CMD_MOVE: &str = "csd::move";
    pub const CMD_RESIZE: &str = "csd::resize";
    pub const CMD_CAPTURE: &str = "xgetimage::capture";
}

/// Logging defaults
pub mod logging {
    /// Level used when settings don't name a valid one
    pub const DEFAULT_LOG_LEVEL: &str = "warn";

    /// Log retention period in days
    pub const LOG_RETENTION_DAYS: u32 = 14;

    /// Rolling log file prefix
    pub const LOG_FILE_NAME: &str = "csdkit.log";
}

/// Environment overrides
pub mod env {
    /// Overrides `log_level` from settings.json
    pub const LOG_LEVEL_ENV: &str = "CSDKIT_LOG_LEVEL";

    /// Overrides `display` from settings.json
    pub const DISPLAY_ENV: &str = "CSDKIT_DISPLAY";
}

/// Directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "csdkit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wm_request_mask_has_both_substructure_bits() {
        assert_eq!(events::WM_REQUEST_MASK, 0x0018_0000);
    }

    #[test]
    fn resize_edges_precede_move() {
        assert_eq!(moveresize::SIZE_TOPLEFT, 0);
        assert_eq!(moveresize::SIZE_LEFT, 7);
        assert_eq!(moveresize::MOVE, 8);
    }
}
