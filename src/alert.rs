use std::io::{self, Write};

/// Fire-and-forget notification played when a session runs out.
///
/// Implementations must never fail loudly: if the environment cannot play the
/// cue, the call simply does nothing.
pub trait Alert {
    fn play(&mut self);
}

impl<A: Alert + ?Sized> Alert for Box<A> {
    fn play(&mut self) {
        (**self).play()
    }
}

/// Rings the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Alert for TerminalBell {
    fn play(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
    }
}

/// Plays nothing (`--mute`)
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl Alert for Muted {
    fn play(&mut self) {}
}

/// Counts how many times it was asked to play; for tests and headless hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAlert {
    pub played: usize,
}

impl Alert for CountingAlert {
    fn play(&mut self) {
        self.played += 1;
    }
}
