use cup_api::RoundKey;
use cup_api::rounds::{FINAL, QUARTER_FINAL, ROUND_OF_16, ROUND_OF_32, ROUND_OF_64, SEMI_FINAL};
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeColor {
    Primary,
    Accent,
    Dim,
    Leader,
    Placeholder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Theme {
    #[default]
    Dark,
}

pub fn resolve(color: ThemeColor, _theme: Theme) -> Style {
    match color {
        ThemeColor::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        ThemeColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ThemeColor::Dim => Style::default().fg(Color::Indexed(240)),
        ThemeColor::Leader => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ThemeColor::Placeholder => Style::default().fg(Color::Indexed(244)).add_modifier(Modifier::ITALIC),
    }
}

/// Short column heading for a round. Unranked rounds keep their own label.
pub fn short_round_label(key: &RoundKey) -> String {
    match key.rank {
        FINAL => "F".to_string(),
        SEMI_FINAL => "SF".to_string(),
        QUARTER_FINAL => "QF".to_string(),
        ROUND_OF_16 if key.label.to_lowercase().contains("play") => "PO".to_string(),
        ROUND_OF_16 => "R16".to_string(),
        ROUND_OF_32 => "R32".to_string(),
        ROUND_OF_64 => "R64".to_string(),
        _ => key.label.chars().take(6).collect(),
    }
}
