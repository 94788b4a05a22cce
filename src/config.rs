// TalkClock — System Configuration

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const POLL_INTERVAL_MS: u64 = 10; // 100 Hz input poll
pub const CLOCK_UPDATE_MS: u64 = 250; // display / ambient-speech cadence
pub const DEBOUNCE_MS: u64 = 50;
pub const LONG_PRESS_MS: u64 = 1000; // 1-second hold
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 400;

// ---------------------------------------------------------------------------
// Clock display palette (bright/dim pairs, 0xRRGGBB)
// ---------------------------------------------------------------------------
pub const CLOCK_COLORS: [u32; 14] = [
    0x0000FF, 0x00003F,
    0x00FF00, 0x003F00,
    0xFF0000, 0x3F0000,
    0xFF00FF, 0x3F003F,
    0x00FFFF, 0x003F3F,
    0xFFFF00, 0x3F3F00,
    0xFFFFFF, 0x3F3F3F,
];

pub const COLOR_WHITE: u32 = 0xFFFFFF;
pub const COLOR_GREEN: u32 = 0x00FF00;
pub const COLOR_RED: u32 = 0xFF0000;

// ---------------------------------------------------------------------------
// Volume domain (mixer level = volume / 10)
// ---------------------------------------------------------------------------
pub const VOLUME_MIN: u8 = 1;
pub const VOLUME_MAX: u8 = 10;

// ---------------------------------------------------------------------------
// Toast easter egg
// ---------------------------------------------------------------------------
pub const TOAST_WINDOW_MS: u64 = 60 * 60 * 1000; // toast
pub const TOAST_RETRY_MS: u64 = 5 * 60 * 1000;
pub const TOAST_CHANCE: f64 = 0.01;
