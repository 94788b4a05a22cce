// TalkClock — Phrase Builder
//
// Pure mapping from a time value to an ordered voice-sample sequence.  The
// voice set has "0.wav" through "59.wav" plus a handful of word samples;
// "0.wav" says "oh" and not "zero" because whatever.

use std::fmt;

use crate::events::TimeValue;
use crate::settings::SettingsRecord;

/// Opaque identifier of one voice sample (the wav file name in the set).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleId(String);

impl SampleId {
    /// The number samples: "0.wav"–"59.wav".
    pub fn number(n: u8) -> Self {
        Self(format!("{n}.wav"))
    }

    /// A word sample, e.g. `named("pm")` → "pm.wav".
    pub fn named(name: &str) -> Self {
        Self(format!("{name}.wav"))
    }

    pub fn file_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One spoken utterance, in playback order.
pub type PhraseSequence = Vec<SampleId>;

/// Greeting spoken at startup.
pub const GREETING_SAMPLE: &str = "bling";
/// Would anyone like any toast?
pub const TOAST_SAMPLE: &str = "toast";

/// Assemble the spoken form of `now`.
///
/// 12-hour mode: hour (midnight speaks as 12), then the minutes (zero
/// minutes use the dedicated o'clock sample, single digits get a leading
/// "oh" filler), then am/pm.  24-hour mode: hours below ten get the "oh"
/// filler, zero minutes speak as "hundred".  Total over every (hour,
/// minute) combination in both modes.
pub fn build(now: TimeValue, settings: &SettingsRecord) -> PhraseSequence {
    let mut seq = PhraseSequence::new();

    // Hour
    if settings.ampm {
        let spoken = match now.hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        seq.push(SampleId::number(spoken));
    } else {
        if now.hour < 10 {
            seq.push(SampleId::number(0));
        }
        seq.push(SampleId::number(now.hour));
    }

    // Minute
    if now.minute != 0 {
        if now.minute < 10 {
            seq.push(SampleId::number(0));
        }
        seq.push(SampleId::number(now.minute));
    } else if settings.ampm {
        seq.push(SampleId::named("oclock"));
    } else {
        seq.push(SampleId::named("hundred"));
    }

    // Meridiem
    if settings.ampm {
        seq.push(SampleId::named(if now.hour >= 12 { "pm" } else { "am" }));
    }

    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ampm: bool) -> SettingsRecord {
        SettingsRecord {
            ampm,
            ..SettingsRecord::default()
        }
    }

    fn names(seq: &PhraseSequence) -> Vec<&str> {
        seq.iter().map(SampleId::file_name).collect()
    }

    #[test]
    fn one_pm_is_hour_zero_minute_meridiem() {
        let seq = build(TimeValue::new(13, 0), &settings(true));
        assert_eq!(names(&seq), vec!["1.wav", "oclock.wav", "pm.wav"]);
    }

    #[test]
    fn single_digit_minutes_get_leading_filler() {
        let seq = build(TimeValue::new(0, 5), &settings(false));
        assert_eq!(names(&seq), vec!["0.wav", "0.wav", "0.wav", "5.wav"]);

        // Minute 13 is two digits: no filler.
        let seq = build(TimeValue::new(9, 13), &settings(true));
        assert_eq!(names(&seq), vec!["9.wav", "13.wav", "am.wav"]);
    }

    #[test]
    fn on_the_hour_in_24h_mode_says_hundred() {
        let seq = build(TimeValue::new(19, 0), &settings(false));
        assert_eq!(names(&seq), vec!["19.wav", "hundred.wav"]);
    }

    #[test]
    fn midnight_and_noon_in_12h_mode() {
        let seq = build(TimeValue::new(0, 30), &settings(true));
        assert_eq!(names(&seq), vec!["12.wav", "30.wav", "am.wav"]);

        let seq = build(TimeValue::new(12, 0), &settings(true));
        assert_eq!(names(&seq), vec!["12.wav", "oclock.wav", "pm.wav"]);
    }

    #[test]
    fn afternoon_hours_fold_to_12h() {
        let seq = build(TimeValue::new(19, 45), &settings(true));
        assert_eq!(names(&seq), vec!["7.wav", "45.wav", "pm.wav"]);
    }

    #[test]
    fn total_and_deterministic_over_all_inputs() {
        for ampm in [true, false] {
            let s = settings(ampm);
            for hour in 0..24u8 {
                for minute in 0..60u8 {
                    let t = TimeValue::new(hour, minute);
                    let seq = build(t, &s);
                    assert!(!seq.is_empty(), "empty phrase for {t} ampm={ampm}");
                    assert_eq!(seq, build(t, &s), "non-deterministic for {t}");
                    if ampm {
                        assert!(names(&seq).last().unwrap().ends_with("m.wav"));
                    }
                }
            }
        }
    }
}
