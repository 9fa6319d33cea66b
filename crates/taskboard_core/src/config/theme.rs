use super::canonical_key;
use crate::model::{Priority, Status};

pub const PLAIN_THEME: &str = "plain";
pub const COLOR_THEME: &str = "color";
pub const BADGE_THEME: &str = "badge";

const RESET: &str = "\x1b[0m";

/// Escape sequences for the list heading and the priority/status badges.
/// Every sequence of the plain palette is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub heading: &'static str,
    pub high: &'static str,
    pub medium: &'static str,
    pub low: &'static str,
    pub to_do: &'static str,
    pub in_progress: &'static str,
    pub done: &'static str,
}

impl Palette {
    pub const PLAIN: Palette = Palette {
        heading: "",
        high: "",
        medium: "",
        low: "",
        to_do: "",
        in_progress: "",
        done: "",
    };

    /// Foreground colours only.
    pub const COLOR: Palette = Palette {
        heading: "\x1b[1m",
        high: "\x1b[31m",
        medium: "\x1b[33m",
        low: "\x1b[32m",
        to_do: "\x1b[90m",
        in_progress: "\x1b[34m",
        done: "\x1b[32m",
    };

    /// Light background with dark text of the same hue.
    pub const BADGE: Palette = Palette {
        heading: "\x1b[1m",
        high: "\x1b[48;5;224;38;5;88m",
        medium: "\x1b[48;5;230;38;5;94m",
        low: "\x1b[48;5;194;38;5;22m",
        to_do: "\x1b[48;5;255;38;5;236m",
        in_progress: "\x1b[48;5;189;38;5;18m",
        done: "\x1b[48;5;194;38;5;22m",
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    pub fn heading(&self, text: &str) -> String {
        paint(self.heading, text)
    }

    pub fn priority(&self, priority: Priority) -> String {
        let code = match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        };
        paint(code, priority.label())
    }

    pub fn status(&self, status: Status) -> String {
        let code = match status {
            Status::ToDo => self.to_do,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        };
        paint(code, status.label())
    }
}

fn paint(code: &str, text: &str) -> String {
    if code.is_empty() {
        text.to_string()
    } else {
        format!("{code}{text}{RESET}")
    }
}

/// Unknown theme names render without colour.
pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.map(canonical_theme_name).as_deref() {
        Some(COLOR_THEME) => Palette::COLOR,
        Some(BADGE_THEME) => Palette::BADGE,
        _ => Palette::PLAIN,
    }
}

pub fn canonical_theme_name(raw: &str) -> String {
    let cleaned = canonical_key(raw);
    match cleaned.as_str() {
        "" | "default" | "none" | "no_color" | "mono" => PLAIN_THEME.to_string(),
        "colour" | "colors" | "colours" | "ansi" => COLOR_THEME.to_string(),
        "badges" | "pill" | "pills" => BADGE_THEME.to_string(),
        _ => cleaned,
    }
}
