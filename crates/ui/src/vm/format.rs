use chrono::{DateTime, Utc};
use quiz_core::model::{Difficulty, FigureNumber};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// CSS modifier for a percentage: `>= 80`, `>= 60`, `>= 40`, below.
#[must_use]
pub fn tone_class(percentage: u32) -> &'static str {
    match percentage {
        80.. => "tone-excellent",
        60..=79 => "tone-good",
        40..=59 => "tone-fair",
        _ => "tone-poor",
    }
}

#[must_use]
pub fn figure_label(figure: Option<&FigureNumber>) -> Option<String> {
    let raw = figure?.as_str();
    if raw.to_ascii_lowercase().starts_with("fig") {
        Some(raw.to_owned())
    } else {
        Some(format!("Figure {raw}"))
    }
}

#[must_use]
pub fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
    }
}
