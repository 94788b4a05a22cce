// TalkClock — Simulator Entry Point
//
// Host-side stand-in for the appliance firmware.  The control core is the
// same event loop the device runs: raw button edges go through the gesture
// detectors, classified gestures through the dispatcher, and the resulting
// effects out to the collaborators (playback, display, serial) — here the
// terminal plays all three roles.
//
// Button commands on stdin (one per line):
//   a            speak the current time
//   b / bb / B   button B short / double / long (long opens the menu)
//   c            print parameters
//   d / dd       button D short / double
//   q            quit

mod config;
mod dispatch;
mod events;
mod input;
mod menu;
mod phrase;
mod settings;
mod speech;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Timelike;
use clap::{Parser, Subcommand};

use crate::config::*;
use crate::dispatch::{Dispatcher, Effect};
use crate::events::{ButtonId, GestureKind, TimeValue};
use crate::input::GestureDetector;
use crate::phrase::{SampleId, GREETING_SAMPLE};
use crate::settings::{SettingsRecord, SettingsStore};

#[derive(Parser)]
#[command(name = "talkclock", version, about)]
struct Cli {
    /// Settings file path (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the clock loop (default)
    Run,
    /// Print the phrase sequences for a handful of test times
    SpeakTest,
    /// Print the parameter dump and exit
    Report,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let path = match cli.settings {
        Some(path) => path,
        None => SettingsStore::default_path()?,
    };
    let store = SettingsStore::new(path);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(store),
        Command::SpeakTest => speak_test(&store),
        Command::Report => {
            print!("{}", Dispatcher::new(store).dump_parameters());
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------
fn run(store: SettingsStore) -> Result<()> {
    log::info!("TalkClock starting");

    let mut dispatcher = Dispatcher::new(store);

    // One detector per button, all reporting into the same channel.
    let (gesture_tx, gesture_rx) = mpsc::channel();
    let mut detectors: Vec<GestureDetector> = ButtonId::ALL
        .iter()
        .map(|&b| GestureDetector::new(b, gesture_tx.clone()))
        .collect();

    // Stdin reader thread — the only other thread; it just forwards lines.
    let (cmd_tx, cmd_rx) = mpsc::channel();
    thread::Builder::new().name("stdin".into()).spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if cmd_tx.send(line).is_err() {
                break;
            }
        }
    })?;

    show_message("BLING", COLOR_GREEN);
    play(&[SampleId::named(GREETING_SAMPLE)], dispatcher.settings());
    log::info!("Commands: a, b, bb, B, c, d, dd, q");

    let poll_interval = Duration::from_millis(POLL_INTERVAL_MS);
    let mut next_clock_update = Instant::now();
    let mut separator_shown = true;

    loop {
        // 1. Translate typed commands into raw edges through the detectors.
        while let Ok(line) = cmd_rx.try_recv() {
            let cmd = line.trim();
            if cmd.is_empty() {
                continue;
            }
            if cmd == "q" || cmd == "quit" {
                log::info!("Bye");
                return Ok(());
            }
            match parse_command(cmd) {
                Some((button, kind)) => {
                    let detector = &mut detectors[button as usize];
                    synthesize(detector, kind);
                }
                None => log::warn!("Unknown command {cmd:?} (try: a, b, bb, B, c, d, dd, q)"),
            }
        }

        // 2. Drain completed gestures into the dispatcher.
        while let Ok(ev) = gesture_rx.try_recv() {
            let effects = dispatcher.handle_gesture(ev, read_clock());
            apply(&effects, &dispatcher);
        }

        // 3. Clock cadence: display refresh + ambient announcement check.
        let now = Instant::now();
        if now >= next_clock_update {
            next_clock_update = now + Duration::from_millis(CLOCK_UPDATE_MS);
            let clock = read_clock();

            if let Some(t) = clock {
                log::trace!("{}", render_clock(t, dispatcher.settings(), separator_shown));
                separator_shown = !separator_shown;
            }

            let effects = dispatcher.tick(clock, now);
            apply(&effects, &dispatcher);
        }

        thread::sleep(poll_interval);
    }
}

// ---------------------------------------------------------------------------
// Collaborator stand-ins
// ---------------------------------------------------------------------------
fn apply(effects: &[Effect], dispatcher: &Dispatcher) {
    for effect in effects {
        match effect {
            Effect::Speak(seq) => play(seq, dispatcher.settings()),
            Effect::ShowMessage { text, color } => show_message(text, *color),
            Effect::Report(text) => print!("{text}"),
        }
    }
}

fn play(seq: &[SampleId], settings: &SettingsRecord) {
    log::debug!("Mixer level {:.1}", f32::from(settings.volume) / 10.0);
    for sample in seq {
        log::info!("Speaking {sample}");
    }
}

fn show_message(text: &str, color: u32) {
    log::info!("display [0x{color:06X}]: {text}");
}

/// The wall-clock collaborator.  On the appliance this is the RTC; here it
/// is the host clock.
fn read_clock() -> Option<TimeValue> {
    let now = chrono::Local::now();
    Some(TimeValue::new(now.hour() as u8, now.minute() as u8))
}

fn render_clock(t: TimeValue, settings: &SettingsRecord, separator_shown: bool) -> String {
    let sep = if separator_shown || !settings.flash_separator {
        ':'
    } else {
        ' '
    };
    if settings.ampm {
        let hour = match t.hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        let suffix = if t.hour >= 12 { "pm" } else { "am" };
        format!("{hour:2}{sep}{:02}{suffix}", t.minute)
    } else {
        format!("{:02}{sep}{:02}", t.hour, t.minute)
    }
}

// ---------------------------------------------------------------------------
// Synthetic button edges
// ---------------------------------------------------------------------------
fn parse_command(cmd: &str) -> Option<(ButtonId, GestureKind)> {
    let gesture = match cmd {
        "a" => (ButtonId::A, GestureKind::ShortPress),
        "aa" => (ButtonId::A, GestureKind::DoubleShortPress),
        "A" => (ButtonId::A, GestureKind::LongPress),
        "b" => (ButtonId::B, GestureKind::ShortPress),
        "bb" => (ButtonId::B, GestureKind::DoubleShortPress),
        "B" => (ButtonId::B, GestureKind::LongPress),
        "c" => (ButtonId::C, GestureKind::ShortPress),
        "cc" => (ButtonId::C, GestureKind::DoubleShortPress),
        "C" => (ButtonId::C, GestureKind::LongPress),
        "d" => (ButtonId::D, GestureKind::ShortPress),
        "dd" => (ButtonId::D, GestureKind::DoubleShortPress),
        "D" => (ButtonId::D, GestureKind::LongPress),
        _ => return None,
    };
    Some(gesture)
}

/// Feed a full synthetic edge timeline for one gesture through the real
/// detector, so the simulator exercises the same debounce and window logic
/// as the device.
fn synthesize(detector: &mut GestureDetector, kind: GestureKind) {
    let base = Instant::now();
    match kind {
        GestureKind::ShortPress => {
            press(detector, base, 0, 100);
            // Let the double-press window lapse.
            detector.feed(false, base + Duration::from_millis(250 + DOUBLE_PRESS_WINDOW_MS));
        }
        GestureKind::DoubleShortPress => {
            press(detector, base, 0, 100);
            press(detector, base, 300, 100);
        }
        GestureKind::LongPress => {
            press(detector, base, 0, LONG_PRESS_MS + 100);
        }
    }
}

fn press(detector: &mut GestureDetector, base: Instant, start_ms: u64, hold_ms: u64) {
    let down = start_ms + DEBOUNCE_MS;
    detector.feed(true, base + Duration::from_millis(start_ms));
    detector.feed(true, base + Duration::from_millis(down));
    let up = down + hold_ms;
    detector.feed(false, base + Duration::from_millis(up));
    detector.feed(false, base + Duration::from_millis(up + DEBOUNCE_MS));
}

// ---------------------------------------------------------------------------
// Speak test (handy for auditioning a replacement voice set)
// ---------------------------------------------------------------------------
fn speak_test(store: &SettingsStore) -> Result<()> {
    let settings = store.load();
    let times = [
        (11, 0),
        (0, 30),
        (0, 0),
        (9, 13),
        (19, 45),
        (1, 0),
    ];
    for (hour, minute) in times {
        let t = TimeValue::new(hour, minute);
        let seq = phrase::build(t, &settings);
        let files: Vec<&str> = seq.iter().map(SampleId::file_name).collect();
        println!("{t} → {}", files.join(" "));
    }
    Ok(())
}
