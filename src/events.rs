// TalkClock — Events & Data Types

use std::fmt;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Buttons (fixed set on the appliance face)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    A,
    B,
    C,
    D,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [ButtonId::A, ButtonId::B, ButtonId::C, ButtonId::D];

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Gestures — classified button interactions
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    ShortPress,
    DoubleShortPress,
    LongPress,
}

/// One completed button interaction.  Produced once by a gesture detector,
/// consumed exactly once by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct GestureEvent {
    pub button: ButtonId,
    pub kind: GestureKind,
    pub at: Instant,
}

// ---------------------------------------------------------------------------
// Wall-clock snapshot (from the external time source)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    /// 0–23
    pub hour: u8,
    /// 0–59
    pub minute: u8,
}

impl TimeValue {
    pub fn new(hour: u8, minute: u8) -> Self {
        debug_assert!(hour < 24 && minute < 60);
        Self { hour, minute }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// Announcement triggers
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementTrigger {
    /// Button A — always speaks, regardless of settings.
    UserRequested,
    /// Top or bottom of the hour — gated on the SPEAK setting.
    HalfHourAmbient,
}
