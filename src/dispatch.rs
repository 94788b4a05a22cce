// TalkClock — Dispatcher
//
// Routes gestures to direct actions while the menu is closed and into the
// menu state machine while it is open; owns the committed settings record
// and the announcement scheduler.  Side effects come back as values so the
// core drives no hardware — the control loop hands them to the playback
// and display collaborators.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::config::*;
use crate::events::{AnnouncementTrigger, ButtonId, GestureEvent, GestureKind, TimeValue};
use crate::menu::{MenuMachine, MenuOutcome, MenuUpdate};
use crate::phrase::{PhraseSequence, SampleId, TOAST_SAMPLE};
use crate::settings::{SettingsRecord, SettingsStore};
use crate::speech::Scheduler;

/// What the surrounding loop should do after a dispatcher call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the sequence to the audio playback collaborator, in order.
    Speak(PhraseSequence),
    /// Show a transient message on the display collaborator.
    ShowMessage { text: String, color: u32 },
    /// Line-oriented parameter report for the serial/debug collaborator.
    Report(String),
}

impl Effect {
    fn message(text: impl Into<String>, color: u32) -> Self {
        Self::ShowMessage {
            text: text.into(),
            color,
        }
    }
}

pub struct Dispatcher {
    store: SettingsStore,
    settings: SettingsRecord,
    menu: MenuMachine,
    scheduler: Scheduler,
    toast_at: Option<Instant>,
}

impl Dispatcher {
    pub fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        Self {
            store,
            settings,
            menu: MenuMachine::new(),
            scheduler: Scheduler::new(),
            toast_at: None,
        }
    }

    /// The committed record (what the display renders from).
    pub fn settings(&self) -> &SettingsRecord {
        &self.settings
    }

    pub fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Route one completed gesture.  `clock` is the current wall-clock
    /// snapshot, or `None` when the time source is unavailable.
    pub fn handle_gesture(&mut self, ev: GestureEvent, clock: Option<TimeValue>) -> Vec<Effect> {
        if self.menu.is_open() {
            return self.handle_menu(&ev);
        }

        match (ev.button, ev.kind) {
            (ButtonId::A, GestureKind::ShortPress) => {
                let Some(now) = clock else {
                    log::warn!("Time source unavailable — skipping spoken time");
                    return Vec::new();
                };
                log::info!("Button A pressed — speaking time {now}");
                match self
                    .scheduler
                    .on_tick(now, AnnouncementTrigger::UserRequested, &self.settings)
                {
                    Some(seq) => vec![Effect::Speak(seq)],
                    None => Vec::new(),
                }
            }
            (ButtonId::B, GestureKind::ShortPress) => {
                vec![Effect::message("Butn B", COLOR_WHITE)]
            }
            (ButtonId::B, GestureKind::DoubleShortPress) => {
                vec![Effect::message("Dbl B", COLOR_WHITE)]
            }
            (ButtonId::B, GestureKind::LongPress) => {
                let update = self.menu.open(self.settings);
                vec![Self::show(update)]
            }
            (ButtonId::C, GestureKind::ShortPress) => {
                vec![
                    Effect::message("Butn C", COLOR_WHITE),
                    Effect::Report(self.dump_parameters()),
                ]
            }
            (ButtonId::D, GestureKind::ShortPress) => {
                vec![Effect::message("Butn D", COLOR_WHITE)]
            }
            (ButtonId::D, GestureKind::DoubleShortPress) => {
                vec![Effect::message("Dbl D", COLOR_WHITE)]
            }
            (button, kind) => {
                // No mapped action; worth a trace but nothing more.
                log::debug!("Unmapped gesture {kind:?} on button {button}");
                Vec::new()
            }
        }
    }

    /// Periodic decision point: ambient half-hour announcements, plus the
    /// hourly toast lottery.  Call at the display cadence.
    pub fn tick(&mut self, clock: Option<TimeValue>, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(t) = clock {
            if let Some(seq) =
                self.scheduler
                    .on_tick(t, AnnouncementTrigger::HalfHourAmbient, &self.settings)
            {
                effects.push(Effect::Speak(seq));
            }
        }

        effects.extend(self.check_toast(now));
        effects
    }

    /// Current settings and derived state, one line each.
    pub fn dump_parameters(&self) -> String {
        let s = &self.settings;
        let mut out = String::new();
        let _ = writeln!(out, "use ampm is {}", s.ampm);
        let _ = writeln!(out, "speaking time on :00 and :30 is {}", s.speak_half_hour);
        let _ = writeln!(out, "color of clock is 0x{:06X}", s.color_rgb());
        let _ = writeln!(out, "flashing separator is {}", s.flash_separator);
        let _ = writeln!(out, "volume is {}", s.volume);
        let _ = writeln!(out, "erase on exit is {}", s.erase_on_exit);
        let _ = writeln!(
            out,
            "menu is {}",
            if self.menu.is_open() { "open" } else { "closed" }
        );
        match self.scheduler.last_boundary() {
            Some((h, m)) => {
                let _ = writeln!(out, "last announced boundary {h:02}:{m:02}");
            }
            None => {
                let _ = writeln!(out, "last announced boundary none");
            }
        }
        out
    }

    fn handle_menu(&mut self, ev: &GestureEvent) -> Vec<Effect> {
        match self.menu.handle(ev, &self.store) {
            MenuOutcome::Updated(update) => {
                let mut effects = Vec::new();
                if let Some(sample) = update.preview.clone() {
                    effects.push(Effect::Speak(vec![sample]));
                }
                effects.push(Self::show(update));
                effects
            }
            MenuOutcome::Closed {
                record,
                erased,
                persisted,
            } => {
                self.settings = record;
                let effect = if erased {
                    Effect::message("ERASED!", COLOR_RED)
                } else if persisted {
                    Effect::message("SAVED", COLOR_GREEN)
                } else {
                    Effect::message("SAVE?", COLOR_RED)
                };
                vec![effect]
            }
            MenuOutcome::Ignored => Vec::new(),
        }
    }

    /// Once an hour, a 1% chance of offering toast.  Misses re-arm after a
    /// few minutes so the offer drifts rather than landing on a schedule.
    fn check_toast(&mut self, now: Instant) -> Vec<Effect> {
        let due = match self.toast_at {
            Some(at) => now >= at,
            None => {
                self.toast_at = Some(now + Duration::from_millis(TOAST_WINDOW_MS));
                false
            }
        };
        if !due {
            return Vec::new();
        }

        if rand::random::<f64>() < TOAST_CHANCE {
            log::info!("Would anyone like any toast");
            self.toast_at = Some(now + Duration::from_millis(TOAST_WINDOW_MS));
            let mut effects = vec![Effect::message("TOAST?", COLOR_GREEN)];
            if self.settings.speak_half_hour {
                effects.push(Effect::Speak(vec![SampleId::named(TOAST_SAMPLE)]));
            }
            effects
        } else {
            self.toast_at = Some(now + Duration::from_millis(TOAST_RETRY_MS));
            Vec::new()
        }
    }

    fn show(update: MenuUpdate) -> Effect {
        Effect::ShowMessage {
            text: update.text,
            color: update.color,
        }
    }
}
