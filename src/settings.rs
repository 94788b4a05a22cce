// TalkClock — Persisted User Settings
//
// Settings live in a single TOML file under the platform config directory.
// Loading never fails: missing, corrupt, or partial data falls back to the
// static defaults.  Writes go through a temp file + rename so a crash
// mid-write leaves either the old record or the new one, never a torn file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CLOCK_COLORS, VOLUME_MAX, VOLUME_MIN};

/// The committed user preferences.  Always fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRecord {
    /// 12-hour display/speech with AM/PM, or 24-hour.
    pub ampm: bool,
    /// Index into [`CLOCK_COLORS`].
    pub color: usize,
    /// Announce the time at :00 and :30.
    pub speak_half_hour: bool,
    /// Flash the separator between the clock digits.
    pub flash_separator: bool,
    /// If set when the menu commits, the store is erased to defaults.
    pub erase_on_exit: bool,
    /// Playback level, 1–10 (mixer level = volume / 10).
    pub volume: u8,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            ampm: true,
            color: 0,
            speak_half_hour: true,
            flash_separator: true,
            erase_on_exit: false,
            volume: 5,
        }
    }
}

impl SettingsRecord {
    /// Current clock color as 0xRRGGBB.
    pub fn color_rgb(&self) -> u32 {
        CLOCK_COLORS[self.color % CLOCK_COLORS.len()]
    }

    /// Clamp persisted values back into their domains.  Applied on every
    /// load so a hand-edited or stale file cannot smuggle in an
    /// out-of-range index.
    fn sanitized(mut self) -> Self {
        if self.color >= CLOCK_COLORS.len() {
            self.color = 0;
        }
        self.volume = self.volume.clamp(VOLUME_MIN, VOLUME_MAX);
        self
    }
}

/// Owner of the persisted settings file.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Platform default: `<config dir>/talkclock/settings.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("No config directory on this platform")?;
        Ok(dir.join("talkclock").join("settings.toml"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the persisted record, falling back to defaults on any failure.
    /// This is a recovered failure, never fatal.
    pub fn load(&self) -> SettingsRecord {
        match fs::read_to_string(&self.path) {
            Ok(content) => match toml::from_str::<SettingsRecord>(&content) {
                Ok(record) => record.sanitized(),
                Err(e) => {
                    log::warn!(
                        "Corrupt settings in {} ({e}) — using defaults",
                        self.path.display()
                    );
                    SettingsRecord::default()
                }
            },
            Err(e) => {
                log::info!(
                    "No settings at {} ({e}) — using defaults",
                    self.path.display()
                );
                SettingsRecord::default()
            }
        }
    }

    /// Persist the whole record atomically (temp file + rename).
    pub fn commit(&self, record: &SettingsRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(record).context("Failed to serialize settings")?;

        let temp_path = self.path.with_extension("toml.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp settings file {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to move settings into place at {}", self.path.display())
        })?;

        log::info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    /// Reset to defaults and persist that reset.
    pub fn erase(&self) -> Result<SettingsRecord> {
        let defaults = SettingsRecord::default();
        self.commit(&defaults)?;
        log::info!("Settings erased — defaults restored");
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.toml"))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), SettingsRecord::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not even toml {{{").unwrap();
        assert_eq!(store.load(), SettingsRecord::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "ampm = false\n").unwrap();

        let loaded = store.load();
        assert!(!loaded.ampm);
        assert_eq!(loaded.volume, SettingsRecord::default().volume);
        assert_eq!(loaded.color, 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "color = 999\nvolume = 42\n").unwrap();

        let loaded = store.load();
        assert_eq!(loaded.color, 0);
        assert_eq!(loaded.volume, VOLUME_MAX);
    }

    #[test]
    fn commit_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let record = SettingsRecord {
            ampm: false,
            color: 3,
            speak_half_hour: false,
            flash_separator: false,
            erase_on_exit: true,
            volume: 9,
        };
        store.commit(&record).unwrap();
        assert_eq!(store.load(), record);
    }

    #[test]
    fn erase_then_load_is_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut record = SettingsRecord::default();
        record.ampm = false;
        record.volume = 10;
        store.commit(&record).unwrap();

        let erased = store.erase().unwrap();
        assert_eq!(erased, SettingsRecord::default());
        assert_eq!(store.load(), SettingsRecord::default());
    }

    #[test]
    fn commit_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.commit(&SettingsRecord::default()).unwrap();
        assert!(!store.path().with_extension("toml.tmp").exists());
    }
}
