use std::num::IntErrorKind;

/// Kind of interval the clock is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionType {
    #[strum(to_string = "Work")]
    Work,
    #[strum(to_string = "Short Break")]
    ShortBreak,
    #[strum(to_string = "Long Break")]
    LongBreak,
}

impl SessionType {
    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Work)
    }
}

/// One user-adjustable settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SettingField {
    #[strum(to_string = "Work (min)")]
    WorkMinutes,
    #[strum(to_string = "Short break (min)")]
    ShortBreakMinutes,
    #[strum(to_string = "Long break (min)")]
    LongBreakMinutes,
    #[strum(to_string = "Long break every")]
    LongBreakEvery,
}

impl SettingField {
    pub const ALL: [SettingField; 4] = [
        SettingField::WorkMinutes,
        SettingField::ShortBreakMinutes,
        SettingField::LongBreakMinutes,
        SettingField::LongBreakEvery,
    ];

    /// Inclusive (min, max) accepted for this field
    pub fn range(&self) -> (u32, u32) {
        match self {
            SettingField::WorkMinutes => (1, 120),
            SettingField::ShortBreakMinutes => (1, 60),
            SettingField::LongBreakMinutes => (1, 90),
            SettingField::LongBreakEvery => (2, 10),
        }
    }

    pub fn default_value(&self) -> u32 {
        match self {
            SettingField::WorkMinutes => 25,
            SettingField::ShortBreakMinutes => 5,
            SettingField::LongBreakMinutes => 15,
            SettingField::LongBreakEvery => 4,
        }
    }

    pub fn clamp(&self, value: u32) -> u32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    /// Clamp-on-input: anything out of range is pulled to the nearest bound,
    /// anything that is not a number at all lands on the minimum.
    pub fn parse_input(&self, input: &str) -> u32 {
        let (min, max) = self.range();
        match input.trim().parse::<i64>() {
            Ok(v) if v < min as i64 => min,
            Ok(v) if v > max as i64 => max,
            Ok(v) => v as u32,
            // too many digits is still a number, just a very large one
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => max,
            Err(_) => min,
        }
    }

    pub fn next(&self) -> SettingField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> SettingField {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Clock configuration, always held in clamped form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    work_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
    long_break_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: SettingField::WorkMinutes.default_value(),
            short_break_minutes: SettingField::ShortBreakMinutes.default_value(),
            long_break_minutes: SettingField::LongBreakMinutes.default_value(),
            long_break_every: SettingField::LongBreakEvery.default_value(),
        }
    }
}

impl Settings {
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        long_break_every: u32,
    ) -> Self {
        let mut settings = Self::default();
        settings.set(SettingField::WorkMinutes, work_minutes);
        settings.set(SettingField::ShortBreakMinutes, short_break_minutes);
        settings.set(SettingField::LongBreakMinutes, long_break_minutes);
        settings.set(SettingField::LongBreakEvery, long_break_every);
        settings
    }

    pub fn get(&self, field: SettingField) -> u32 {
        match field {
            SettingField::WorkMinutes => self.work_minutes,
            SettingField::ShortBreakMinutes => self.short_break_minutes,
            SettingField::LongBreakMinutes => self.long_break_minutes,
            SettingField::LongBreakEvery => self.long_break_every,
        }
    }

    pub fn set(&mut self, field: SettingField, value: u32) {
        let value = field.clamp(value);
        match field {
            SettingField::WorkMinutes => self.work_minutes = value,
            SettingField::ShortBreakMinutes => self.short_break_minutes = value,
            SettingField::LongBreakMinutes => self.long_break_minutes = value,
            SettingField::LongBreakEvery => self.long_break_every = value,
        }
    }

    pub fn long_break_every(&self) -> u32 {
        self.long_break_every
    }

    /// Length of a session of the given type, in seconds
    pub fn duration_of(&self, session_type: SessionType) -> u32 {
        let minutes = match session_type {
            SessionType::Work => self.work_minutes,
            SessionType::ShortBreak => self.short_break_minutes,
            SessionType::LongBreak => self.long_break_minutes,
        };
        minutes * 60
    }
}
