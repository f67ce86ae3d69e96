use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum PomoEvent {
    Key(KeyEvent),
    Resize,
    /// The armed timer reached its deadline
    Tick,
    /// Nothing happened within the idle interval and no timer is armed
    Idle,
    /// The event source went away; the host should shut down
    Closed,
}

/// Periodic timer source driving the clock.
///
/// At most one source is active at a time: `arm` on an armed source is a no-op,
/// `cancel` takes effect immediately.
pub trait TickSource {
    fn arm(&mut self);
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
    /// Called once per delivered tick so the source can schedule the next one.
    fn acknowledge(&mut self) {}
}

/// Production one-second timer, represented as the next deadline
#[derive(Debug, Clone)]
pub struct SecondTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl SecondTimer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }
}

impl Default for SecondTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SecondTimer {
    fn arm(&mut self) {
        if self.next_due.is_none() {
            self.next_due = Some(Instant::now() + self.period);
        }
    }

    fn cancel(&mut self) {
        self.next_due = None;
    }

    fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    fn acknowledge(&mut self) {
        // keep cadence relative to the previous deadline, not to "now"
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.period);
        }
    }
}

/// Timer with no notion of wall time; ticks are delivered by hand.
/// Records how it was driven so tests can check source bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct ManualTimer {
    armed: bool,
    pub sources_created: usize,
    pub cancellations: usize,
}

impl TickSource for ManualTimer {
    fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.sources_created += 1;
        }
    }

    fn cancel(&mut self) {
        if self.armed {
            self.armed = false;
            self.cancellations += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait PomoEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<PomoEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(PomoEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PomoEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PomoEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<PomoEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PomoEvent>) -> Self {
        Self { rx }
    }
}

impl PomoEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PomoEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that multiplexes terminal events with the timer deadline
pub struct Runner<E: PomoEventSource> {
    event_source: E,
    idle: Duration,
}

impl<E: PomoEventSource> Runner<E> {
    pub fn new(event_source: E, idle: Duration) -> Self {
        Self { event_source, idle }
    }

    /// Blocks until the next event, or until `deadline` passes (yielding Tick).
    /// Without a deadline it waits at most the idle interval.
    ///
    /// An overdue deadline is reported before any queued input, so a burst of
    /// key repeats cannot hold back the countdown.
    pub fn step(&self, deadline: Option<Instant>) -> PomoEvent {
        let timeout = match deadline {
            Some(due) => {
                let now = Instant::now();
                if due <= now {
                    return PomoEvent::Tick;
                }
                due - now
            }
            None => self.idle,
        };
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) if deadline.is_some() => PomoEvent::Tick,
            Err(RecvTimeoutError::Timeout) => PomoEvent::Idle,
            Err(RecvTimeoutError::Disconnected) => PomoEvent::Closed,
        }
    }
}
