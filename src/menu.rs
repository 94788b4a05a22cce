// TalkClock — Settings Menu State Machine
//
// Opened by a long press of button B; edits a staged copy of the settings
// and persists nothing until the closing long press.  Short B cycles
// through the category table, short C/D step the value under the cursor.
// If ERASE is armed when the menu closes, the store is wiped back to
// defaults and the staged values are discarded entirely.

use crate::config::{CLOCK_COLORS, COLOR_WHITE, VOLUME_MAX, VOLUME_MIN};
use crate::events::{ButtonId, GestureEvent, GestureKind};
use crate::phrase::{SampleId, GREETING_SAMPLE};
use crate::settings::{SettingsRecord, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Button C.
    Down,
    /// Button D.
    Up,
}

/// One entry of the fixed category table.  Adding a category means adding
/// a row here; the state machine itself never changes.
pub struct Category {
    pub name: &'static str,
    step: fn(&mut SettingsRecord, StepDirection),
    display: fn(&SettingsRecord) -> String,
    tint: fn(&SettingsRecord) -> u32,
    /// Sample spoken after a value change, for audible feedback.
    preview: Option<&'static str>,
}

fn yn(value: bool) -> &'static str {
    if value {
        "Y"
    } else {
        "N"
    }
}

fn white(_: &SettingsRecord) -> u32 {
    COLOR_WHITE
}

fn toggle_ampm(r: &mut SettingsRecord, _d: StepDirection) {
    r.ampm = !r.ampm;
}

fn step_color(r: &mut SettingsRecord, d: StepDirection) {
    let len = CLOCK_COLORS.len();
    r.color = match d {
        StepDirection::Up => (r.color + 1) % len,
        StepDirection::Down => (r.color + len - 1) % len,
    };
}

fn toggle_speak(r: &mut SettingsRecord, _d: StepDirection) {
    r.speak_half_hour = !r.speak_half_hour;
}

fn step_volume(r: &mut SettingsRecord, d: StepDirection) {
    r.volume = match d {
        StepDirection::Up => (r.volume + 1).min(VOLUME_MAX),
        StepDirection::Down => r.volume.saturating_sub(1).max(VOLUME_MIN),
    };
}

fn toggle_flash(r: &mut SettingsRecord, _d: StepDirection) {
    r.flash_separator = !r.flash_separator;
}

fn toggle_erase(r: &mut SettingsRecord, _d: StepDirection) {
    r.erase_on_exit = !r.erase_on_exit;
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "AMPM",
        step: toggle_ampm,
        display: |r| format!("AMPM {}", yn(r.ampm)),
        tint: white,
        preview: None,
    },
    Category {
        name: "COLOUR", // Change this if it bothers you so much
        step: step_color,
        display: |_| "COLOUR".to_string(),
        tint: SettingsRecord::color_rgb,
        preview: None,
    },
    Category {
        name: "SPEAK",
        step: toggle_speak,
        display: |r| format!("SPEAK {}", yn(r.speak_half_hour)),
        tint: white,
        preview: None,
    },
    Category {
        name: "VOL",
        step: step_volume,
        display: |r| format!("VOL {:01}", r.volume),
        tint: white,
        preview: Some(GREETING_SAMPLE),
    },
    Category {
        name: "FLASH",
        step: toggle_flash,
        display: |r| format!("FLASH {}", yn(r.flash_separator)),
        tint: white,
        preview: None,
    },
    Category {
        name: "ERASE",
        step: toggle_erase,
        display: |r| format!("ERASE? {}", yn(r.erase_on_exit)),
        tint: white,
        preview: None,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MenuState {
    #[default]
    Closed,
    /// Open on `index`, editing a staged copy of the settings.
    Browsing {
        index: usize,
        staged: SettingsRecord,
    },
}

/// What the display collaborator should show after a menu interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuUpdate {
    pub text: String,
    pub color: u32,
    pub preview: Option<SampleId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Still open; show the current category and value.
    Updated(MenuUpdate),
    /// Closed.  `record` is the new committed record (the defaults when
    /// `erased`); `persisted` is false when the store write failed.
    Closed {
        record: SettingsRecord,
        erased: bool,
        persisted: bool,
    },
    /// Not a menu gesture (or the menu is closed).
    Ignored,
}

#[derive(Default)]
pub struct MenuMachine {
    state: MenuState,
}

impl MenuMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state != MenuState::Closed
    }

    /// Enter the menu with a staged copy of the committed record.
    pub fn open(&mut self, current: SettingsRecord) -> MenuUpdate {
        self.state = MenuState::Browsing {
            index: 0,
            staged: current,
        };
        log::info!("Settings menu opened");
        Self::render(0, &current, None)
    }

    /// Route one gesture.  Only meaningful while open; every gesture is
    /// consumed (the dispatcher gets nothing back but the outcome).
    pub fn handle(&mut self, ev: &GestureEvent, store: &SettingsStore) -> MenuOutcome {
        let MenuState::Browsing { index, staged } = &mut self.state else {
            return MenuOutcome::Ignored;
        };

        match (ev.button, ev.kind) {
            (ButtonId::B, GestureKind::ShortPress) => {
                let next = (*index + 1) % CATEGORIES.len();
                *index = next;
                MenuOutcome::Updated(Self::render(next, staged, None))
            }
            (ButtonId::C, GestureKind::ShortPress) => {
                let category = &CATEGORIES[*index];
                (category.step)(staged, StepDirection::Down);
                MenuOutcome::Updated(Self::render(*index, staged, category.preview))
            }
            (ButtonId::D, GestureKind::ShortPress) => {
                let category = &CATEGORIES[*index];
                (category.step)(staged, StepDirection::Up);
                MenuOutcome::Updated(Self::render(*index, staged, category.preview))
            }
            (ButtonId::B, GestureKind::LongPress) => {
                let staged = *staged;
                self.state = MenuState::Closed;
                Self::close(staged, store)
            }
            _ => {
                log::debug!("Menu ignoring {:?} on button {}", ev.kind, ev.button);
                MenuOutcome::Ignored
            }
        }
    }

    /// The staged, uncommitted record (None while closed).
    pub fn staged(&self) -> Option<&SettingsRecord> {
        match &self.state {
            MenuState::Browsing { staged, .. } => Some(staged),
            MenuState::Closed => None,
        }
    }

    /// Commit-and-close.  Only this path ever writes to the store, so the
    /// whole session is atomic from the store's point of view.
    fn close(staged: SettingsRecord, store: &SettingsStore) -> MenuOutcome {
        if staged.erase_on_exit {
            match store.erase() {
                Ok(defaults) => MenuOutcome::Closed {
                    record: defaults,
                    erased: true,
                    persisted: true,
                },
                Err(e) => {
                    log::error!("Settings erase failed: {e:#}");
                    MenuOutcome::Closed {
                        record: SettingsRecord::default(),
                        erased: true,
                        persisted: false,
                    }
                }
            }
        } else {
            let persisted = match store.commit(&staged) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Settings save failed: {e:#}");
                    false
                }
            };
            MenuOutcome::Closed {
                record: staged,
                erased: false,
                persisted,
            }
        }
    }

    fn render(index: usize, staged: &SettingsRecord, preview: Option<&'static str>) -> MenuUpdate {
        let category = &CATEGORIES[index];
        MenuUpdate {
            text: (category.display)(staged),
            color: (category.tint)(staged),
            preview: preview.map(SampleId::named),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    fn gesture(button: ButtonId, kind: GestureKind) -> GestureEvent {
        GestureEvent {
            button,
            kind,
            at: Instant::now(),
        }
    }

    fn short(button: ButtonId) -> GestureEvent {
        gesture(button, GestureKind::ShortPress)
    }

    fn open_menu(dir: &TempDir) -> (MenuMachine, SettingsStore) {
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let mut menu = MenuMachine::new();
        menu.open(store.load());
        (menu, store)
    }

    fn expect_update(outcome: MenuOutcome) -> MenuUpdate {
        match outcome {
            MenuOutcome::Updated(update) => update,
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[test]
    fn opens_on_first_category() {
        let dir = TempDir::new().unwrap();
        let (menu, _store) = open_menu(&dir);
        assert!(menu.is_open());
        assert_eq!(menu.staged(), Some(&SettingsRecord::default()));
    }

    #[test]
    fn category_cursor_wraps_around() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);

        // N-1 short presses land on the last category...
        for _ in 0..CATEGORIES.len() - 1 {
            expect_update(menu.handle(&short(ButtonId::B), &store));
        }
        let update = expect_update(menu.handle(&short(ButtonId::B), &store));
        // ...and one more wraps back to AMPM.
        assert_eq!(update.text, "AMPM Y");
    }

    #[test]
    fn c_and_d_step_the_current_category() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);

        let update = expect_update(menu.handle(&short(ButtonId::C), &store));
        assert_eq!(update.text, "AMPM N");
        let update = expect_update(menu.handle(&short(ButtonId::D), &store));
        assert_eq!(update.text, "AMPM Y");
    }

    #[test]
    fn color_wraps_in_both_directions() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);
        expect_update(menu.handle(&short(ButtonId::B), &store)); // → COLOUR

        // Down from index 0 wraps to the end of the palette.
        let update = expect_update(menu.handle(&short(ButtonId::C), &store));
        assert_eq!(update.color, CLOCK_COLORS[CLOCK_COLORS.len() - 1]);
        let update = expect_update(menu.handle(&short(ButtonId::D), &store));
        assert_eq!(update.color, CLOCK_COLORS[0]);
    }

    #[test]
    fn volume_clamps_and_previews() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);
        for _ in 0..3 {
            expect_update(menu.handle(&short(ButtonId::B), &store)); // → VOL
        }

        for _ in 0..20 {
            let update = expect_update(menu.handle(&short(ButtonId::D), &store));
            assert!(update.preview.is_some());
        }
        assert_eq!(menu.staged().unwrap().volume, VOLUME_MAX);

        for _ in 0..20 {
            expect_update(menu.handle(&short(ButtonId::C), &store));
        }
        assert_eq!(menu.staged().unwrap().volume, VOLUME_MIN);
    }

    #[test]
    fn nothing_persists_until_commit() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);

        expect_update(menu.handle(&short(ButtonId::C), &store)); // AMPM → N
        assert_eq!(store.load(), SettingsRecord::default());

        let outcome = menu.handle(&gesture(ButtonId::B, GestureKind::LongPress), &store);
        let MenuOutcome::Closed {
            record,
            erased,
            persisted,
        } = outcome
        else {
            panic!("expected Closed");
        };
        assert!(!erased);
        assert!(persisted);
        assert!(!record.ampm);
        assert_eq!(store.load(), record);
        assert!(!menu.is_open());
        assert!(menu.staged().is_none());
    }

    #[test]
    fn erase_on_exit_wins_over_staged_values() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);

        // Stage a pile of changes...
        expect_update(menu.handle(&short(ButtonId::C), &store)); // AMPM → N
        expect_update(menu.handle(&short(ButtonId::B), &store)); // → COLOUR
        expect_update(menu.handle(&short(ButtonId::D), &store)); // color 1
        // ...then arm ERASE and close.
        for _ in 0..4 {
            expect_update(menu.handle(&short(ButtonId::B), &store)); // → ERASE
        }
        let update = expect_update(menu.handle(&short(ButtonId::D), &store));
        assert_eq!(update.text, "ERASE? Y");

        let outcome = menu.handle(&gesture(ButtonId::B, GestureKind::LongPress), &store);
        let MenuOutcome::Closed { record, erased, .. } = outcome else {
            panic!("expected Closed");
        };
        assert!(erased);
        assert_eq!(record, SettingsRecord::default());
        assert_eq!(store.load(), SettingsRecord::default());
    }

    #[test]
    fn unmapped_gestures_are_consumed() {
        let dir = TempDir::new().unwrap();
        let (mut menu, store) = open_menu(&dir);

        for ev in [
            short(ButtonId::A),
            gesture(ButtonId::B, GestureKind::DoubleShortPress),
            gesture(ButtonId::D, GestureKind::LongPress),
        ] {
            assert_eq!(menu.handle(&ev, &store), MenuOutcome::Ignored);
            assert!(menu.is_open());
        }
    }
}
