//! Terminal capability detection and output styling

use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// The styles commands print with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Green; a clean result.
    Success,
    /// Amber; cycles, broken references and placeholder nodes.
    Warning,
    /// Blue; recommended prerequisites.
    Info,
    /// Dimmed; headings, group nodes and course codes.
    Dim,
}

impl Style {
    /// Styles `text` when `colored` is set and returns it unchanged otherwise.
    pub fn paint(self, text: &str, colored: bool) -> String {
        if !colored {
            return text.to_string();
        }
        match self {
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Warning => text.fg::<css::Orange>().to_string(),
            Self::Info => text.fg::<css::LightBlue>().to_string(),
            Self::Dim => text.dimmed().to_string(),
        }
    }
}

/// Styles text for stdout, honouring [`supports_color`].
pub trait Colorize: AsRef<str> {
    /// Styles as [`Style::Success`].
    fn success(&self) -> String {
        Style::Success.paint(self.as_ref(), supports_color())
    }

    /// Styles as [`Style::Warning`].
    fn warning(&self) -> String {
        Style::Warning.paint(self.as_ref(), supports_color())
    }

    /// Styles as [`Style::Dim`].
    fn dim(&self) -> String {
        Style::Dim.paint(self.as_ref(), supports_color())
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {}
