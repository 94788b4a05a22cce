// TalkClock — Button Gesture Detector
//
// Debounced per-button handler with short-press, double-short-press, and
// long-press classification.  Designed to be polled at ~100 Hz from the
// control loop; all windows are resolved by comparing injected timestamps,
// never by blocking.

use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::config::*;
use crate::events::{ButtonId, GestureEvent, GestureKind};

pub struct GestureDetector {
    button: ButtonId,
    gesture_tx: Sender<GestureEvent>,

    // Debounce state
    last_raw: bool,
    last_change: Instant,

    // Press tracking
    press_start: Option<Instant>,
    button_down: bool,

    // Double-press state machine
    waiting_for_second_press: bool,
    first_press_time: Instant,
}

impl GestureDetector {
    pub fn new(button: ButtonId, gesture_tx: Sender<GestureEvent>) -> Self {
        let now = Instant::now();
        Self {
            button,
            gesture_tx,
            last_raw: false, // idle = released
            last_change: now,
            press_start: None,
            button_down: false,
            waiting_for_second_press: false,
            first_press_time: now,
        }
    }

    /// Feed one raw sample (`true` = pressed) at time `now`.  Call every
    /// poll cycle; completed gestures are sent on the channel.
    pub fn feed(&mut self, pressed: bool, now: Instant) {
        // ---- debounce filter ----
        if pressed != self.last_raw {
            self.last_change = now;
        }
        self.last_raw = pressed;

        // Resolve the double-press window before classifying any edge: a
        // release accepted after the window expired must start a fresh
        // press, not complete a stale double.
        self.check_double_press_timeout(now);

        let stable_ms = now.duration_since(self.last_change).as_millis() as u64;
        if stable_ms < DEBOUNCE_MS {
            // Signal still bouncing — wait.
            return;
        }

        // ---- press edge ----
        if pressed && !self.button_down {
            self.button_down = true;
            self.press_start = Some(now);
        }

        // ---- release edge ----
        if !pressed && self.button_down {
            self.button_down = false;
            let hold_ms = self
                .press_start
                .take()
                .map(|t| now.duration_since(t).as_millis() as u64)
                .unwrap_or(0);

            if hold_ms >= LONG_PRESS_MS {
                self.emit(GestureKind::LongPress, now);
                self.waiting_for_second_press = false;
            } else if self.waiting_for_second_press {
                // Second short release within the window → double press.
                self.emit(GestureKind::DoubleShortPress, now);
                self.waiting_for_second_press = false;
            } else {
                // First short release — open the double-press window.
                self.waiting_for_second_press = true;
                self.first_press_time = now;
            }
        }
    }

    /// If the double-press window expires, the pending first release becomes
    /// a single short press.  A press still held at this point is untouched;
    /// it will be classified on its own release.
    fn check_double_press_timeout(&mut self, now: Instant) {
        if self.waiting_for_second_press {
            let elapsed = now.duration_since(self.first_press_time).as_millis() as u64;
            if elapsed > DOUBLE_PRESS_WINDOW_MS {
                self.emit(GestureKind::ShortPress, now);
                self.waiting_for_second_press = false;
            }
        }
    }

    fn emit(&self, kind: GestureKind, at: Instant) {
        let _ = self.gesture_tx.send(GestureEvent {
            button: self.button,
            kind,
            at,
        });
    }
}
