use chrono::{Duration as ChronoDuration, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use pomo::session::{SessionType, SettingField};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub fn session_color(session_type: SessionType) -> Color {
    match session_type {
        SessionType::Work => Color::Red,
        SessionType::ShortBreak => Color::Green,
        SessionType::LongBreak => Color::Blue,
    }
}

/// Wall-clock time at which the current countdown reaches zero
pub fn ends_at(seconds_left: u32) -> String {
    (Local::now() + ChronoDuration::seconds(seconds_left as i64))
        .format("%H:%M")
        .to_string()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.clock.snapshot();
        let settings = self.clock.settings();

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let session_style = Style::default()
            .patch(bold_style)
            .fg(session_color(snapshot.session_type));
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1),
                Constraint::Length(1), // session label
                Constraint::Length(1), // MM:SS
                Constraint::Length(1), // status
                Constraint::Length(1),
                Constraint::Length(3), // progress gauge
                Constraint::Length(1), // counters
                Constraint::Length(1),
                Constraint::Length(6), // settings
                Constraint::Length(1), // notice
                Constraint::Min(0),
                Constraint::Length(2), // help
            ])
            .split(area);

        Paragraph::new(Span::styled("pomo", dim_style.patch(bold_style)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            snapshot.session_type.to_string().to_uppercase(),
            session_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(snapshot.display_time.clone(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let status = if snapshot.is_running {
            Span::styled(
                format!("● running · ends at {}", ends_at(snapshot.seconds_left)),
                Style::default().fg(Color::Green),
            )
        } else {
            Span::styled("⏸ stopped", Style::default().fg(Color::Yellow))
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(session_color(snapshot.session_type)))
            .ratio(snapshot.progress)
            .label(format!("{:.0}%", snapshot.progress * 100.0))
            .render(chunks[6], buf);

        let long_break_hint = match snapshot.sessions_until_long_break {
            1 => "long break after this one".to_string(),
            n => format!("long break in {} sessions", n),
        };
        Paragraph::new(Span::styled(
            format!(
                "completed {} · {}",
                snapshot.completed_work_sessions, long_break_hint
            ),
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

        let lines: Vec<Line> = SettingField::ALL
            .iter()
            .map(|field| {
                let selected = *field == self.selected;
                let value = match (&self.edit_buffer, selected) {
                    (Some(input), true) => format!("{}_", input),
                    _ => settings.get(*field).to_string(),
                };
                let (min, max) = field.range();
                let marker = if selected { ">" } else { " " };
                let text = format!(
                    "{} {:<20}{:>5}   [{}-{}]",
                    marker,
                    field.to_string(),
                    value,
                    min,
                    max
                );
                let style = if selected {
                    Style::default().fg(Color::Yellow).patch(bold_style)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        let settings_title = if snapshot.is_running {
            "Settings (locked while running)"
        } else {
            "Settings"
        };
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(settings_title))
            .render(chunks[9], buf);

        if let Some(notice) = &self.notice {
            Paragraph::new(Span::styled(
                notice.as_str(),
                Style::default().fg(Color::Cyan),
            ))
            .alignment(Alignment::Center)
            .render(chunks[10], buf);
        }

        let help = Paragraph::new(vec![
            Line::from("(space) start/stop  (r)eset  (s)kip  (q)uit"),
            Line::from("(tab/↑/↓) select  (←/→) adjust  (0-9) type a value, (enter) apply"),
        ])
        .style(italic_style.patch(dim_style))
        .alignment(Alignment::Center);
        help.render(chunks[12], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_colors_differ() {
        assert_ne!(
            session_color(SessionType::Work),
            session_color(SessionType::ShortBreak)
        );
        assert_ne!(
            session_color(SessionType::ShortBreak),
            session_color(SessionType::LongBreak)
        );
    }

    #[test]
    fn test_ends_at_format() {
        let s = ends_at(0);
        assert_eq!(s.len(), 5);
        assert_eq!(&s[2..3], ":");
    }
}
