//! Styling for plan summaries and skipped-file reports

use std::sync::LazyLock;

use owo_colors::{OwoColorize, Style};

static COLOUR: LazyLock<bool> =
    LazyLock::new(|| supports_color::on(supports_color::Stream::Stdout).is_some());

/// How a line of output should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Work that is planned and ready to go.
    Ready,
    /// A file left alone for an unremarkable reason.
    Aside,
    /// A file the user probably meant to be processed.
    Trouble,
    /// Already done; shown for completeness.
    Quiet,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Ready => Style::new().green().bold(),
            Self::Aside => Style::new().yellow(),
            Self::Trouble => Style::new().red(),
            Self::Quiet => Style::new().dimmed(),
        }
    }

    /// Renders `text` in this tone when stdout supports colour.
    pub fn paint(self, text: &str) -> String {
        self.render(text, *COLOUR)
    }

    fn render(self, text: &str, colour: bool) -> String {
        if colour {
            text.style(self.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_without_colour() {
        for tone in [Tone::Ready, Tone::Aside, Tone::Trouble, Tone::Quiet] {
            assert_eq!(tone.render("JB001A.jpg", false), "JB001A.jpg");
        }
    }

    #[test]
    fn tones_are_distinct_with_colour() {
        let ready = Tone::Ready.render("x", true);
        let trouble = Tone::Trouble.render("x", true);
        assert!(ready.starts_with('\u{1b}'));
        assert!(ready.contains('x'));
        assert_ne!(ready, trouble);
    }
}
