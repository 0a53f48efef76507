//! Color and style definitions for the picker
//!
//! A [`Theme`] is chosen once from configuration and handed to the
//! renderer; there is no process-wide theme.

use ratatui::style::{Color, Modifier, Style};

/// Picker theme with all color definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // === Items ===
    /// Session with at least one attached client
    pub attached: Color,
    /// Session with no attached client
    pub detached: Color,

    // === UI Elements ===
    /// Primary accent color (headers, titles)
    pub accent: Color,
    /// Text color for normal content
    pub text: Color,
    /// Text color for paths, counts and help
    pub text_muted: Color,
    /// Color for the row under the cursor
    pub selected: Color,
    /// Color for the text input line
    pub input_prompt: Color,

    // === Banners ===
    /// Info banner foreground
    pub info_fg: Color,
    /// Error banner background
    pub error_bg: Color,
    /// Error banner foreground
    pub error_fg: Color,

    // === Borders ===
    /// Normal border color
    pub border: Color,
    /// Border of the focused panel
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            attached: Color::Green,
            detached: Color::DarkGray,

            accent: Color::Cyan,
            text: Color::White,
            text_muted: Color::DarkGray,
            selected: Color::White,
            input_prompt: Color::Magenta,

            info_fg: Color::Green,
            error_bg: Color::Red,
            error_fg: Color::White,

            border: Color::Gray,
            border_focused: Color::Cyan,
        }
    }

    /// Light theme for bright terminal backgrounds
    pub fn light() -> Self {
        Self {
            attached: Color::Green,
            detached: Color::Gray,

            accent: Color::Blue,
            text: Color::Black,
            text_muted: Color::Gray,
            selected: Color::Black,
            input_prompt: Color::Magenta,

            info_fg: Color::Blue,
            error_bg: Color::Red,
            error_fg: Color::White,

            border: Color::DarkGray,
            border_focused: Color::Blue,
        }
    }

    /// Look up a preset by name (case-insensitive)
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Color of the attached indicator
    pub fn attached_color(&self, attached: bool) -> Color {
        if attached {
            self.attached
        } else {
            self.detached
        }
    }

    // === Style Builders ===

    /// Style for headers/titles
    pub fn header_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for plain item text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for muted text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for selected items
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input prompts
    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_prompt)
    }

    /// Style for info banners
    pub fn info_banner_style(&self) -> Style {
        Style::default().fg(self.info_fg).add_modifier(Modifier::BOLD)
    }

    /// Style for error banners
    pub fn error_banner_style(&self) -> Style {
        Style::default().fg(self.error_fg).bg(self.error_bg)
    }

    /// Border style for a panel
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default() {
        let theme = Theme::default();
        assert_eq!(theme, Theme::dark());
        assert_eq!(theme.accent, Color::Cyan);
    }

    #[test]
    fn test_from_preset() {
        assert_eq!(Theme::from_preset("Light"), Some(Theme::light()));
        assert_eq!(Theme::from_preset(" dark "), Some(Theme::dark()));
        assert_eq!(Theme::from_preset("solarized"), None);
    }

    #[test]
    fn test_attached_color() {
        let theme = Theme::dark();
        assert_eq!(theme.attached_color(true), Color::Green);
        assert_eq!(theme.attached_color(false), Color::DarkGray);
    }
}
