use thiserror::Error;
use tracing::{debug, info};

use crate::alert::Alert;
use crate::runtime::TickSource;
use crate::session::{SessionType, SettingField, Settings};
use crate::util::{elapsed_fraction, format_minutes_seconds};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("settings cannot change while the timer is running")]
    Running,
}

/// A completed move from one session to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionType,
    pub to: SessionType,
    pub completed_work_sessions: u32,
    /// false when the move came from `skip`
    pub alerted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was stopped; nothing changed
    Ignored,
    Counting { seconds_left: u32 },
    Finished(Transition),
}

/// Read-only view of the clock for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ClockSnapshot {
    pub session_type: SessionType,
    pub seconds_left: u32,
    pub total_seconds: u32,
    pub is_running: bool,
    pub completed_work_sessions: u32,
    pub sessions_until_long_break: u32,
    pub progress: f64,
    pub display_time: String,
}

/// Pomodoro session state machine.
///
/// Owns the countdown and the single timer source that drives it. The timer is
/// armed exactly while the clock is running and is cancelled on every path
/// that stops it, including drop.
#[derive(Debug)]
pub struct SessionClock<T: TickSource, A: Alert> {
    settings: Settings,
    session_type: SessionType,
    seconds_left: u32,
    is_running: bool,
    completed_work_sessions: u32,
    timer: T,
    alert: A,
}

impl<T: TickSource, A: Alert> SessionClock<T, A> {
    pub fn new(settings: Settings, timer: T, alert: A) -> Self {
        Self {
            seconds_left: settings.duration_of(SessionType::Work),
            settings,
            session_type: SessionType::Work,
            is_running: false,
            completed_work_sessions: 0,
            timer,
            alert,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn alert(&self) -> &A {
        &self.alert
    }

    pub fn total_seconds(&self) -> u32 {
        self.settings.duration_of(self.session_type)
    }

    pub fn progress(&self) -> f64 {
        elapsed_fraction(self.total_seconds(), self.seconds_left)
    }

    pub fn display_time(&self) -> String {
        format_minutes_seconds(self.seconds_left)
    }

    /// Work completions still needed before the next long break
    pub fn sessions_until_long_break(&self) -> u32 {
        let every = self.settings.long_break_every();
        every - self.completed_work_sessions % every
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            session_type: self.session_type,
            seconds_left: self.seconds_left,
            total_seconds: self.total_seconds(),
            is_running: self.is_running,
            completed_work_sessions: self.completed_work_sessions,
            sessions_until_long_break: self.sessions_until_long_break(),
            progress: self.progress(),
            display_time: self.display_time(),
        }
    }

    /// Starts counting down. Returns a transition only in the degenerate case
    /// where the countdown was already at zero.
    pub fn start(&mut self) -> Option<Transition> {
        if self.is_running {
            return None;
        }
        self.is_running = true;
        self.timer.arm();
        debug!(session = %self.session_type, seconds_left = self.seconds_left, "started");
        if self.seconds_left == 0 {
            return Some(self.on_zero());
        }
        None
    }

    pub fn stop(&mut self) {
        self.halt();
        debug!(session = %self.session_type, seconds_left = self.seconds_left, "stopped");
    }

    pub fn toggle(&mut self) -> Option<Transition> {
        if self.is_running {
            self.stop();
            None
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) {
        self.halt();
        self.seconds_left = self.total_seconds();
        debug!(session = %self.session_type, "reset");
    }

    pub fn skip(&mut self) -> Transition {
        self.halt();
        let transition = self.advance(false);
        info!(
            from = %transition.from,
            to = %transition.to,
            completed = transition.completed_work_sessions,
            "session skipped"
        );
        transition
    }

    /// One elapsed second. The zero edge is handled here, so a running clock
    /// is never observed at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Ignored;
        }
        self.timer.acknowledge();
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            return TickOutcome::Finished(self.on_zero());
        }
        TickOutcome::Counting {
            seconds_left: self.seconds_left,
        }
    }

    pub fn reconfigure(&mut self, field: SettingField, value: u32) -> Result<(), ClockError> {
        let mut settings = self.settings;
        settings.set(field, value);
        self.apply_settings(settings)
    }

    /// Replaces the configuration and re-baselines the countdown for the
    /// current session type. Elapsed progress is discarded.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), ClockError> {
        if self.is_running {
            return Err(ClockError::Running);
        }
        self.settings = settings;
        self.seconds_left = self.total_seconds();
        debug!(?settings, "reconfigured");
        Ok(())
    }

    fn halt(&mut self) {
        self.timer.cancel();
        self.is_running = false;
    }

    fn on_zero(&mut self) -> Transition {
        self.halt();
        self.alert.play();
        let transition = self.advance(true);
        info!(
            from = %transition.from,
            to = %transition.to,
            completed = transition.completed_work_sessions,
            "session finished"
        );
        transition
    }

    fn advance(&mut self, alerted: bool) -> Transition {
        let from = self.session_type;
        let next = match from {
            SessionType::Work => {
                self.completed_work_sessions += 1;
                let n = self.completed_work_sessions;
                if n > 0 && n % self.settings.long_break_every() == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
        };
        self.session_type = next;
        self.seconds_left = self.settings.duration_of(next);
        Transition {
            from,
            to: next,
            completed_work_sessions: self.completed_work_sessions,
            alerted,
        }
    }
}

impl<T: TickSource, A: Alert> Drop for SessionClock<T, A> {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}
