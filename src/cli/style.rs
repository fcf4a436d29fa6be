//! Terminal styling for publish output
//!
//! Every colored fragment carries a [`Tone`] and the stream it is written to;
//! `owo-colors` decides per stream whether color is emitted (`NO_COLOR`,
//! `CLICOLOR`, TTY).

use content_publish::types::PullRequest;
use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};
use std::fmt;

/// Role of a fragment of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Branch names, repository coordinates, counts
    Accent,
    /// Finished stages and the final result
    Good,
    /// Failed stage and error text
    Bad,
    /// State a failed run left behind on the remote
    Caution,
    /// File lists and hints
    Quiet,
    /// Stage names
    Strong,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Accent => Style::new().cyan(),
            Self::Good => Style::new().green(),
            Self::Bad => Style::new().red(),
            Self::Caution => Style::new().yellow(),
            Self::Quiet => Style::new().dimmed(),
            Self::Strong => Style::new().bold(),
        }
    }
}

/// A value rendered in its tone when the target stream supports color
#[derive(Debug, Clone)]
pub struct Toned<T> {
    value: T,
    tone: Tone,
    stream: Stream,
}

impl<T: fmt::Display> fmt::Display for Toned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.tone.style();
        let painted = self
            .value
            .if_supports_color(self.stream, |v| v.style(style));
        write!(f, "{painted}")
    }
}

/// Tone anything displayable, for stdout (`out`) or stderr (`err`)
pub trait Tint: fmt::Display {
    /// Styled for stdout
    fn out(&self, tone: Tone) -> Toned<&Self> {
        Toned {
            value: self,
            tone,
            stream: Stream::Stdout,
        }
    }

    /// Styled for stderr
    fn err(&self, tone: Tone) -> Toned<&Self> {
        Toned {
            value: self,
            tone,
            stream: Stream::Stderr,
        }
    }
}

impl<T: fmt::Display + ?Sized> Tint for T {}

/// Marker for a finished stage
pub fn done_mark() -> Toned<&'static str> {
    Toned {
        value: "✓",
        tone: Tone::Good,
        stream: Stream::Stdout,
    }
}

/// Marker for a failed stage (stderr)
pub fn fail_mark() -> Toned<&'static str> {
    Toned {
        value: "✗",
        tone: Tone::Bad,
        stream: Stream::Stderr,
    }
}

/// `#N` linked to the pull request when the terminal supports OSC 8,
/// otherwise `#N (url)`
pub fn pr_link(stream: Stream, pr: &PullRequest) -> String {
    let label = format!("#{}", pr.number);
    if pr.html_url.is_empty() {
        return label;
    }

    let target = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };
    if supports_hyperlinks::on(target) {
        terminal_link::Link::new(&label, &pr.html_url).to_string()
    } else {
        format!("{label} ({})", pr.html_url)
    }
}

/// Spinner shown while a stage runs, with elapsed time
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
