use std::sync::mpsc;
use std::time::Duration;

use assert_matches::assert_matches;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use pomo::alert::CountingAlert;
use pomo::clock::{SessionClock, TickOutcome, Transition};
use pomo::runtime::{PomoEvent, Runner, SecondTimer, TestEventSource, TickSource};
use pomo::session::{SessionType, Settings};

fn fast_clock(settings: Settings) -> SessionClock<SecondTimer, CountingAlert> {
    // one "second" per millisecond keeps a one-minute session under a tenth of a second
    SessionClock::new(
        settings,
        SecondTimer::with_period(Duration::from_millis(1)),
        CountingAlert::default(),
    )
}

// Headless run of a full work session through the Runner without a TTY
#[test]
fn headless_work_session_runs_to_short_break() {
    let mut clock = fast_clock(Settings::new(1, 1, 1, 4));

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    clock.start();
    let mut finished = None;
    for _ in 0..1_000u32 {
        match runner.step(clock.timer().deadline()) {
            PomoEvent::Tick => {
                if let TickOutcome::Finished(t) = clock.tick() {
                    finished = Some(t);
                    break;
                }
            }
            PomoEvent::Idle => panic!("timer should be armed while running"),
            _ => {}
        }
    }

    assert_matches!(
        finished,
        Some(Transition {
            from: SessionType::Work,
            to: SessionType::ShortBreak,
            completed_work_sessions: 1,
            alerted: true,
        })
    );
    assert!(!clock.is_running());
    assert_eq!(clock.timer().deadline(), None);
    assert_eq!(clock.seconds_left(), 60);
    assert_eq!(clock.alert().played, 1);

    // with the timer cancelled the runner only idles
    assert_matches!(runner.step(clock.timer().deadline()), PomoEvent::Idle);
}

#[test]
fn headless_key_events_drive_the_clock() {
    let mut clock = fast_clock(Settings::default());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    for c in [' ', 's', 's', 's'] {
        tx.send(PomoEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    let mut keys_seen = 0;
    while keys_seen < 4 {
        match runner.step(clock.timer().deadline()) {
            PomoEvent::Key(key) => {
                keys_seen += 1;
                match key.code {
                    KeyCode::Char(' ') => {
                        clock.toggle();
                    }
                    KeyCode::Char('s') => {
                        clock.skip();
                    }
                    _ => {}
                }
            }
            PomoEvent::Tick => {
                clock.tick();
            }
            PomoEvent::Closed => break,
            _ => {}
        }
    }

    // work -> short break -> work -> short break
    assert_eq!(keys_seen, 4);
    assert_eq!(clock.completed_work_sessions(), 2);
    assert_eq!(clock.session_type(), SessionType::ShortBreak);
    assert!(!clock.is_running());
    assert_eq!(clock.alert().played, 0);
}

#[test]
fn headless_stop_cancels_pending_tick() {
    let mut clock = fast_clock(Settings::default());
    clock.start();
    assert!(clock.timer().is_armed());
    clock.stop();
    assert!(!clock.timer().is_armed());

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
    assert_matches!(runner.step(clock.timer().deadline()), PomoEvent::Idle);
    assert_eq!(clock.tick(), TickOutcome::Ignored);
    assert_eq!(clock.seconds_left(), 1500);
}

#[test]
fn headless_reconfigure_between_sessions() {
    let mut clock = fast_clock(Settings::default());
    clock.skip();
    clock
        .apply_settings(Settings::new(25, 10, 15, 4))
        .expect("stopped clock accepts settings");
    assert_eq!(clock.session_type(), SessionType::ShortBreak);
    assert_eq!(clock.seconds_left(), 600);
    assert_eq!(clock.display_time(), "10:00");
}
