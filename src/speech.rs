// TalkClock — Speech Scheduler
//
// Decides whether a tick produces an announcement.  User requests always
// speak; ambient half-hour announcements are gated on the SPEAK setting and
// fire at most once per (hour, minute) boundary no matter how often the
// loop polls within that minute.

use crate::events::{AnnouncementTrigger, TimeValue};
use crate::phrase::{self, PhraseSequence};
use crate::settings::SettingsRecord;

#[derive(Debug, Default)]
pub struct Scheduler {
    /// Last (hour, minute) boundary that produced an ambient announcement.
    last_boundary: Option<(u8, u8)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(
        &mut self,
        now: TimeValue,
        trigger: AnnouncementTrigger,
        settings: &SettingsRecord,
    ) -> Option<PhraseSequence> {
        match trigger {
            AnnouncementTrigger::UserRequested => Some(phrase::build(now, settings)),
            AnnouncementTrigger::HalfHourAmbient => {
                if !settings.speak_half_hour {
                    return None;
                }
                if now.minute != 0 && now.minute != 30 {
                    return None;
                }
                let boundary = (now.hour, now.minute);
                if self.last_boundary == Some(boundary) {
                    // Already announced this boundary.
                    return None;
                }
                self.last_boundary = Some(boundary);
                log::info!("Speaking time at {now}");
                Some(phrase::build(now, settings))
            }
        }
    }

    /// For the parameter dump.
    pub fn last_boundary(&self) -> Option<(u8, u8)> {
        self.last_boundary
    }
}
