//! Colouring for terminal output

use owo_colors::{colors::css, OwoColorize};

/// Detects whether coloured output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// What a piece of output represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A check passed (green)
    Success,
    /// A check failed or nothing was found (amber)
    Failure,
    /// A record identifier (blue)
    Identifier,
    /// A section heading or field label (dimmed)
    Label,
}

/// Colours text by what it represents, or leaves it plain when colour is
/// unavailable
pub trait Paint {
    /// Renders the text in the given tone
    fn paint(&self, tone: Tone) -> String;
}

impl<T: AsRef<str> + ?Sized> Paint for T {
    fn paint(&self, tone: Tone) -> String {
        let text = self.as_ref();
        if !supports_color() {
            return text.to_string();
        }
        match tone {
            Tone::Success => text.fg::<css::Green>().to_string(),
            Tone::Failure => text.fg::<css::Orange>().to_string(),
            Tone::Identifier => text.fg::<css::LightBlue>().to_string(),
            Tone::Label => text.dimmed().to_string(),
        }
    }
}
